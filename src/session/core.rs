//! The per-device session handle.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::from_value;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::capabilities::Platform;
use crate::element::{Element, Rect};
use crate::error::{Error, Result};
use crate::identifiers::{ElementId, SessionId};
use crate::locator::By;
use crate::protocol::{Command, Orientation, parse_element_ref};
use crate::transport::Wire;

// ============================================================================
// Session
// ============================================================================

/// A handle to one remote automation session.
///
/// Cloning is cheap; every clone drives the same remote session. Once
/// [`quit`](Session::quit) runs, every clone observes the closed state and
/// further commands fail with [`Error::SessionClosed`].
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: SessionId,
    server: Url,
    platform: Platform,
    app_id: Option<String>,
    wire: Arc<dyn Wire>,
    closed: AtomicBool,
    default_timeout: Duration,
}

impl Session {
    pub(crate) fn bind(
        id: SessionId,
        server: Url,
        platform: Platform,
        app_id: Option<String>,
        wire: Arc<dyn Wire>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id,
                server,
                platform,
                app_id,
                wire,
                closed: AtomicBool::new(false),
                default_timeout,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the server-assigned session ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.inner.id
    }

    /// Returns the platform the session was created for.
    #[inline]
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.inner.platform
    }

    /// Returns the resolved app ID (package or bundle), when known.
    #[inline]
    #[must_use]
    pub fn app_id(&self) -> Option<&str> {
        self.inner.app_id.as_deref()
    }

    /// Returns the default wait budget inherited from configuration.
    #[inline]
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.inner.default_timeout
    }

    /// Returns whether the session has been quit.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------
    // Command dispatch
    // ------------------------------------------------------------------

    pub(crate) async fn execute(&self, command: Command) -> Result<serde_json::Value> {
        if self.is_closed() {
            return Err(Error::session_closed(self.inner.id.as_str()));
        }
        trace!(session_id = %self.inner.id, endpoint = %command.endpoint(), "dispatching command");
        self.inner
            .wire
            .execute(&self.inner.server, &self.inner.id, command)
            .await
    }

    /// Quits the remote session. Idempotent: the remote delete is issued
    /// at most once, later calls are no-ops.
    pub async fn quit(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        info!(session_id = %self.inner.id, "quitting session");
        self.inner
            .wire
            .execute(&self.inner.server, &self.inner.id, Command::DeleteSession)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Element lookup
    // ------------------------------------------------------------------

    /// Finds the first element matching the locator.
    pub async fn find_element(&self, by: By) -> Result<Element> {
        let value = self
            .execute(Command::FindElement {
                using: by.using().to_string(),
                value: by.value().to_string(),
            })
            .await?;
        let id = parse_element_ref(&value)
            .ok_or_else(|| Error::remote("no such element", "malformed element reference"))?;
        Ok(Element::new(id, self.clone()))
    }

    /// Finds every element matching the locator. An empty result is not
    /// an error.
    pub async fn find_elements(&self, by: By) -> Result<Vec<Element>> {
        let value = self
            .execute(Command::FindElements {
                using: by.using().to_string(),
                value: by.value().to_string(),
            })
            .await?;
        let refs = value.as_array().cloned().unwrap_or_default();
        Ok(refs
            .iter()
            .filter_map(parse_element_ref)
            .map(|id: ElementId| Element::new(id, self.clone()))
            .collect())
    }

    // ------------------------------------------------------------------
    // Window and navigation
    // ------------------------------------------------------------------

    /// Returns the viewport rectangle.
    pub async fn window_rect(&self) -> Result<Rect> {
        let value = self.execute(Command::WindowRect).await?;
        from_value(value).map_err(Error::from)
    }

    /// Navigates to a URL (webview or browser contexts).
    pub async fn navigate(&self, url: impl Into<String>) -> Result<()> {
        self.execute(Command::Navigate { url: url.into() }).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Screenshots
    // ------------------------------------------------------------------

    /// Captures a screenshot and returns the decoded PNG bytes.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let value = self.execute(Command::Screenshot).await?;
        let encoded = value.as_str().unwrap_or_default();
        BASE64
            .decode(encoded)
            .map_err(|e| Error::remote("invalid screenshot payload", e.to_string()))
    }

    /// Best-effort screenshot for failure reporting: logs and returns an
    /// empty buffer when capture fails instead of propagating the error.
    pub async fn try_screenshot(&self) -> Vec<u8> {
        match self.screenshot().await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(session_id = %self.inner.id, %error, "screenshot capture failed");
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // App lifecycle
    // ------------------------------------------------------------------

    /// Brings an app to the foreground.
    pub async fn activate_app(&self, app_id: impl Into<String>) -> Result<()> {
        self.execute(Command::ActivateApp { app_id: app_id.into() }).await?;
        Ok(())
    }

    /// Terminates an app. Returns whether the app was actually running.
    pub async fn terminate_app(&self, app_id: impl Into<String>) -> Result<bool> {
        let value = self.execute(Command::TerminateApp { app_id: app_id.into() }).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Installs an app binary from a local path or URL.
    pub async fn install_app(&self, path: impl Into<String>) -> Result<()> {
        self.execute(Command::InstallApp { path: path.into() }).await?;
        Ok(())
    }

    /// Removes an app from the device.
    pub async fn remove_app(&self, app_id: impl Into<String>) -> Result<()> {
        self.execute(Command::RemoveApp { app_id: app_id.into() }).await?;
        Ok(())
    }

    /// Returns whether an app is installed on the device.
    pub async fn is_app_installed(&self, app_id: impl Into<String>) -> Result<bool> {
        let value = self.execute(Command::IsAppInstalled { app_id: app_id.into() }).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Sends the app under test to the background for `seconds`, or
    /// indefinitely when `None`.
    pub async fn background_app(&self, seconds: Option<u64>) -> Result<()> {
        self.execute(Command::BackgroundApp { seconds }).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Device
    // ------------------------------------------------------------------

    /// Injects a key event (Android keycode).
    pub async fn press_key(&self, keycode: u32) -> Result<()> {
        self.execute(Command::PressKey { keycode }).await?;
        Ok(())
    }

    /// Locks the device screen for `seconds`, or until unlocked when
    /// `None`.
    pub async fn lock(&self, seconds: Option<u64>) -> Result<()> {
        self.execute(Command::Lock { seconds }).await?;
        Ok(())
    }

    /// Returns the device orientation.
    pub async fn orientation(&self) -> Result<Orientation> {
        let value = self.execute(Command::GetOrientation).await?;
        value.as_str().unwrap_or_default().parse()
    }

    /// Rotates the device.
    pub async fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        debug!(session_id = %self.inner.id, orientation = %orientation, "setting orientation");
        self.execute(Command::SetOrientation { orientation }).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Contexts
    // ------------------------------------------------------------------

    /// Lists the available automation contexts.
    pub async fn contexts(&self) -> Result<Vec<String>> {
        let value = self.execute(Command::GetContexts).await?;
        Ok(value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Returns the current automation context.
    pub async fn context(&self) -> Result<String> {
        let value = self.execute(Command::GetContext).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Switches to a named automation context.
    pub async fn switch_context(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        debug!(session_id = %self.inner.id, context = %name, "switching context");
        self.execute(Command::SetContext { name }).await?;
        Ok(())
    }
}

#[cfg(test)]
impl Session {
    /// Creates a live session against a [`MockWire`] for unit tests.
    ///
    /// [`MockWire`]: crate::transport::mock::MockWire
    pub(crate) async fn for_tests(wire: Arc<crate::transport::mock::MockWire>) -> Self {
        let server = Url::parse("http://127.0.0.1:4723").unwrap();
        let caps = crate::capabilities::CapabilityBuilder::new()
            .platform(Platform::Android)
            .device_name("Pixel 6")
            .build()
            .unwrap();
        let id = wire.create_session(&server, &caps).await.unwrap();
        Session::bind(
            id,
            server,
            Platform::Android,
            Some("com.demo.app".to_string()),
            wire,
            Duration::from_secs(15),
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("platform", &self.inner.platform)
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockElement, MockWire};

    #[tokio::test]
    async fn test_quit_issues_remote_delete_once() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        session.quit().await.unwrap();
        session.quit().await.unwrap();
        session.quit().await.unwrap();

        let deletes = wire
            .commands()
            .iter()
            .filter(|(_, cmd)| matches!(cmd, Command::DeleteSession))
            .count();
        assert_eq!(deletes, 1);
        assert!(!wire.is_alive(session.id()));
    }

    #[tokio::test]
    async fn test_commands_after_quit_fail_closed() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;
        session.quit().await.unwrap();

        let err = session.window_rect().await.unwrap_err();
        assert!(matches!(err, Error::SessionClosed { .. }));
    }

    #[tokio::test]
    async fn test_find_element_binds_handle_to_session() {
        let wire = Arc::new(
            MockWire::new().with_element("login", MockElement {
                id: "el-login".to_string(),
                text: "Sign in".to_string(),
                ..MockElement::default()
            }),
        );
        let session = Session::for_tests(Arc::clone(&wire)).await;

        let element = session.find_element(By::accessibility_id("login")).await.unwrap();
        assert_eq!(element.id().as_str(), "el-login");
        assert_eq!(element.text().await.unwrap(), "Sign in");
        assert!(element.is_displayed().await.unwrap());
    }

    #[tokio::test]
    async fn test_find_element_missing_surfaces_remote_error() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        let err = session.find_element(By::id("absent")).await.unwrap_err();
        assert!(err.is_element_missing());
    }

    #[tokio::test]
    async fn test_find_elements_empty_is_ok() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        let elements = session.find_elements(By::css(".row")).await.unwrap();
        assert!(elements.is_empty());
    }

    #[tokio::test]
    async fn test_screenshot_decodes_base64() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        let bytes = session.screenshot().await.unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_try_screenshot_swallows_failures() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;
        session.quit().await.unwrap();

        assert!(session.try_screenshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_app_and_device_commands_hit_the_wire() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        session.activate_app("com.demo.app").await.unwrap();
        assert!(session.is_app_installed("com.demo.app").await.unwrap());
        assert!(!session.terminate_app("com.demo.app").await.unwrap());
        session.background_app(Some(5)).await.unwrap();
        session.press_key(4).await.unwrap();
        session.lock(None).await.unwrap();
        session.navigate("https://example.com").await.unwrap();

        let commands: Vec<Command> =
            wire.commands().into_iter().map(|(_, cmd)| cmd).collect();
        assert!(commands.contains(&Command::ActivateApp {
            app_id: "com.demo.app".to_string()
        }));
        assert!(commands.contains(&Command::BackgroundApp { seconds: Some(5) }));
        assert!(commands.contains(&Command::PressKey { keycode: 4 }));
        assert!(commands.contains(&Command::Lock { seconds: None }));
        assert!(commands.contains(&Command::Navigate {
            url: "https://example.com".to_string()
        }));
    }

    #[tokio::test]
    async fn test_contexts_and_orientation() {
        let wire = Arc::new(MockWire::new());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        assert_eq!(session.contexts().await.unwrap(), vec!["NATIVE_APP"]);
        assert_eq!(session.context().await.unwrap(), "NATIVE_APP");
        assert_eq!(session.orientation().await.unwrap(), Orientation::Portrait);
    }
}
