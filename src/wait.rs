//! Condition polling with a fixed budget.
//!
//! [`Wait`] polls a condition until it holds or the budget runs out. The
//! budget defaults to the session's configured explicit timeout; both the
//! budget and the poll interval can be overridden per instance. A missing
//! element during a poll is an unmet condition, not an error; any other
//! remote failure aborts the wait immediately.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo(session: appdriver::Session) -> appdriver::Result<()> {
//! use std::time::Duration;
//!
//! use appdriver::{By, Wait};
//!
//! let button = Wait::from_session(&session)
//!     .until_clickable(&session, By::accessibility_id("submit"))
//!     .await?;
//! button.click().await?;
//!
//! Wait::new(Duration::from_secs(5))
//!     .until_invisible(&session, By::id("spinner"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::locator::By;
use crate::session::Session;

// ============================================================================
// Constants
// ============================================================================

/// Default interval between condition probes.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// Wait
// ============================================================================

/// A bounded condition poller.
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    poll_interval: Duration,
}

impl Wait {
    /// Creates a wait with an explicit budget and the default 500 ms poll
    /// interval.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, poll_interval: DEFAULT_POLL_INTERVAL }
    }

    /// Creates a wait with the session's configured explicit timeout.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self::new(session.default_timeout())
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns the configured budget.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ------------------------------------------------------------------
    // Conditions
    // ------------------------------------------------------------------

    /// Waits until the element is present in the tree, displayed or not.
    pub async fn until_present(&self, session: &Session, by: By) -> Result<Element> {
        let description = format!("presence of {by}");
        self.poll(&description, async || {
            match session.find_element(by.clone()).await {
                Ok(element) => Ok(Some(element)),
                Err(e) if e.is_element_missing() => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Waits until the element is present and displayed.
    pub async fn until_visible(&self, session: &Session, by: By) -> Result<Element> {
        let description = format!("visibility of {by}");
        self.poll(&description, async || {
            match session.find_element(by.clone()).await {
                Ok(element) => {
                    if element.is_displayed().await? {
                        Ok(Some(element))
                    } else {
                        Ok(None)
                    }
                }
                Err(e) if e.is_element_missing() => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Waits until the element is displayed and enabled.
    pub async fn until_clickable(&self, session: &Session, by: By) -> Result<Element> {
        let description = format!("clickability of {by}");
        self.poll(&description, async || {
            match session.find_element(by.clone()).await {
                Ok(element) => {
                    if element.is_displayed().await? && element.is_enabled().await? {
                        Ok(Some(element))
                    } else {
                        Ok(None)
                    }
                }
                Err(e) if e.is_element_missing() => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Waits until the element is gone from the tree or no longer
    /// displayed.
    pub async fn until_invisible(&self, session: &Session, by: By) -> Result<()> {
        let description = format!("invisibility of {by}");
        self.poll(&description, async || {
            match session.find_element(by.clone()).await {
                Ok(element) => match element.is_displayed().await {
                    Ok(false) => Ok(Some(())),
                    Ok(true) => Ok(None),
                    Err(e) if e.is_element_missing() => Ok(Some(())),
                    Err(e) => Err(e),
                },
                Err(e) if e.is_element_missing() => Ok(Some(())),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Waits until the element's text contains `needle`.
    pub async fn until_text_present(
        &self,
        session: &Session,
        by: By,
        needle: &str,
    ) -> Result<Element> {
        let description = format!("text {needle:?} in {by}");
        self.poll(&description, async || {
            match session.find_element(by.clone()).await {
                Ok(element) => {
                    if element.text().await?.contains(needle) {
                        Ok(Some(element))
                    } else {
                        Ok(None)
                    }
                }
                Err(e) if e.is_element_missing() => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    // ------------------------------------------------------------------
    // Poll loop
    // ------------------------------------------------------------------

    /// Probes until `probe` yields a value or the budget elapses.
    ///
    /// The condition is probed at least once even with a zero budget.
    /// Element-not-found errors leaking from a probe count as unmet.
    async fn poll<T>(
        &self,
        description: &str,
        mut probe: impl AsyncFnMut() -> Result<Option<T>>,
    ) -> Result<T> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match probe().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => trace!(condition = description, "condition unmet"),
                Err(e) if e.is_element_missing() => {
                    trace!(condition = description, "element missing")
                }
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(Error::wait_timeout(description, self.timeout.as_millis() as u64));
            }
            sleep(self.poll_interval).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
