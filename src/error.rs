//! Error types for the automation client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use appdriver::{Result, By};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let element = session.find_element(By::id("submit")).await?;
//!     element.click().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::ConfigNotFound`], [`Error::Config`], [`Error::MissingSelector`] |
//! | Capabilities | [`Error::InvalidPlatform`], [`Error::AppNotFound`], [`Error::PlatformNotFound`] |
//! | Session | [`Error::InvalidServerUrl`], [`Error::SessionClosed`] |
//! | Caller | [`Error::InvalidDirection`], [`Error::InvalidLocatorStrategy`] |
//! | Timing | [`Error::WaitTimeout`] |
//! | Remote | [`Error::Remote`] (opaque, propagated unchanged) |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Yaml`], [`Error::Http`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging. Setup errors
/// (capabilities, selectors, URLs) are fatal to the current test unit and
/// never retried internally; [`Error::WaitTimeout`] is an expected,
/// recoverable-by-caller condition; [`Error::Remote`] carries the remote
/// end's error verbatim.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration source not found.
    ///
    /// Non-fatal during bootstrap: callers may fall back to an empty map.
    #[error("Config file not found: {path}")]
    ConfigNotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration error.
    ///
    /// Returned when a configuration source is malformed or a required
    /// value has the wrong shape.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Required selector missing from process-wide settings.
    ///
    /// Returned by environment-driven session creation when `platform`
    /// or `app` is absent.
    #[error("Required selector [{key}] is not set")]
    MissingSelector {
        /// The missing selector key.
        key: String,
    },

    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// Platform is unset, empty, or not one of the supported platforms.
    #[error("Invalid platform: [{value}] (expected android|ios)")]
    InvalidPlatform {
        /// The offending platform string.
        value: String,
    },

    /// Application not found in the app registry.
    #[error("App [{app}] not found in registry. Available: {available}")]
    AppNotFound {
        /// The requested application name.
        app: String,
        /// Comma-separated list of registered applications.
        available: String,
    },

    /// Platform entry not found for an application in the app registry.
    #[error("Platform [{platform}] not found for app [{app}] in registry")]
    PlatformNotFound {
        /// The requested platform name.
        platform: String,
        /// The application whose entry was searched.
        app: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Automation server URL cannot be parsed.
    #[error("Invalid server URL: {url}")]
    InvalidServerUrl {
        /// The malformed URL string.
        url: String,
    },

    /// Operation attempted on a session that has already quit.
    #[error("Session {session_id} is closed")]
    SessionClosed {
        /// The closed session's ID.
        session_id: String,
    },

    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// Unrecognized swipe direction.
    #[error("Invalid swipe direction: [{value}] (expected up|down|left|right)")]
    InvalidDirection {
        /// The offending direction string.
        value: String,
    },

    /// Unrecognized locator strategy.
    #[error("Not a valid selector strategy: [{strategy}]")]
    InvalidLocatorStrategy {
        /// The offending strategy name.
        strategy: String,
    },

    // ========================================================================
    // Timing Errors
    // ========================================================================
    /// An explicit wait deadline elapsed before the condition held.
    #[error("Wait timed out after {timeout_ms}ms: {condition}")]
    WaitTimeout {
        /// Description of the awaited condition.
        condition: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// Error reported by the remote automation server.
    ///
    /// Propagated unchanged; this crate performs no protocol-level retries.
    #[error("Remote error [{error}]: {message}")]
    Remote {
        /// W3C error code (e.g. `no such element`, `invalid session id`).
        error: String,
        /// Human-readable message from the remote end.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a config-not-found error.
    #[inline]
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a missing-selector error.
    #[inline]
    pub fn missing_selector(key: impl Into<String>) -> Self {
        Self::MissingSelector { key: key.into() }
    }

    /// Creates an invalid-platform error.
    #[inline]
    pub fn invalid_platform(value: impl Into<String>) -> Self {
        Self::InvalidPlatform {
            value: value.into(),
        }
    }

    /// Creates an app-not-found error.
    #[inline]
    pub fn app_not_found(app: impl Into<String>, available: impl Into<String>) -> Self {
        Self::AppNotFound {
            app: app.into(),
            available: available.into(),
        }
    }

    /// Creates a platform-not-found error.
    #[inline]
    pub fn platform_not_found(platform: impl Into<String>, app: impl Into<String>) -> Self {
        Self::PlatformNotFound {
            platform: platform.into(),
            app: app.into(),
        }
    }

    /// Creates an invalid-server-URL error.
    #[inline]
    pub fn invalid_server_url(url: impl Into<String>) -> Self {
        Self::InvalidServerUrl { url: url.into() }
    }

    /// Creates a session-closed error.
    #[inline]
    pub fn session_closed(session_id: impl Into<String>) -> Self {
        Self::SessionClosed {
            session_id: session_id.into(),
        }
    }

    /// Creates an invalid-direction error.
    #[inline]
    pub fn invalid_direction(value: impl Into<String>) -> Self {
        Self::InvalidDirection {
            value: value.into(),
        }
    }

    /// Creates an invalid-locator-strategy error.
    #[inline]
    pub fn invalid_locator_strategy(strategy: impl Into<String>) -> Self {
        Self::InvalidLocatorStrategy {
            strategy: strategy.into(),
        }
    }

    /// Creates a wait-timeout error.
    #[inline]
    pub fn wait_timeout(condition: impl Into<String>, timeout_ms: u64) -> Self {
        Self::WaitTimeout {
            condition: condition.into(),
            timeout_ms,
        }
    }

    /// Creates a remote error.
    #[inline]
    pub fn remote(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            error: error.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a wait timeout.
    #[inline]
    #[must_use]
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }

    /// Returns `true` if this is a capability/session setup error.
    ///
    /// Setup errors are fatal to the current test unit and never retried
    /// internally.
    #[inline]
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPlatform { .. }
                | Self::AppNotFound { .. }
                | Self::PlatformNotFound { .. }
                | Self::MissingSelector { .. }
                | Self::InvalidServerUrl { .. }
        )
    }

    /// Returns `true` if the remote end reported a missing element.
    ///
    /// Used by the wait engine to treat absence as an unmet condition
    /// rather than a failure.
    #[inline]
    #[must_use]
    pub fn is_element_missing(&self) -> bool {
        matches!(
            self,
            Self::Remote { error, .. }
                if error == "no such element" || error == "stale element reference"
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
