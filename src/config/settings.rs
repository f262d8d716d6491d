//! Typed process-wide settings.
//!
//! [`Settings`] wraps the merged [`Config`] with a flat string override
//! layer standing in for the launcher's command-line properties
//! (`platform`, `app`, `deviceName`, ...). Overrides take precedence over
//! configured values, which take precedence over built-in defaults.
//!
//! Settings are read at session-creation or retry-counter-construction
//! time only; they are never polled.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use rustc_hash::FxHashMap;

use super::Config;

// ============================================================================
// Constants
// ============================================================================

/// Default automation server URL.
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723";

/// Default implicit wait budget in seconds.
const DEFAULT_IMPLICIT_TIMEOUT_SECS: u64 = 10;

/// Default explicit wait budget in seconds.
const DEFAULT_EXPLICIT_TIMEOUT_SECS: u64 = 15;

/// Default maximum test retries on failure.
const DEFAULT_RETRY_MAX: u32 = 2;

/// Default delay between retries in milliseconds.
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Selector override key for the target platform.
pub const SELECTOR_PLATFORM: &str = "platform";

/// Selector override key for the app-registry entry.
pub const SELECTOR_APP: &str = "app";

/// Selector override key for the device name.
pub const SELECTOR_DEVICE_NAME: &str = "deviceName";

/// Selector override key for the platform version.
pub const SELECTOR_PLATFORM_VERSION: &str = "platformVersion";

/// Selector override key for the application binary path.
pub const SELECTOR_APP_PATH: &str = "appPath";

/// Selector override key for the automation server URL.
pub const SELECTOR_SERVER_URL: &str = "serverUrl";

// ============================================================================
// Settings
// ============================================================================

/// Immutable process-wide settings.
///
/// Constructed once at startup and shared by `Arc`; all reads after
/// construction are lock-free.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Merged configuration tree.
    config: Config,
    /// Flat string overrides (launcher properties).
    overrides: FxHashMap<String, String>,
}

// ============================================================================
// Settings - Construction
// ============================================================================

impl Settings {
    /// Wraps a merged configuration with no overrides.
    #[inline]
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            overrides: FxHashMap::default(),
        }
    }

    /// Adds a flat string override.
    ///
    /// Override keys mirror the launcher's property names
    /// (`platform`, `app`, `deviceName`, `platformVersion`, `appPath`,
    /// `serverUrl`, `retry.max`, ...).
    #[must_use]
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Returns the underlying configuration tree.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// ============================================================================
// Settings - Accessors
// ============================================================================

impl Settings {
    /// Returns a non-empty override value, if one is set.
    #[must_use]
    pub fn selector(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Returns the automation server URL.
    ///
    /// Precedence: `serverUrl` override, then `appium.url` configuration,
    /// then the built-in default.
    #[must_use]
    pub fn server_url(&self) -> String {
        self.selector(SELECTOR_SERVER_URL)
            .map(String::from)
            .unwrap_or_else(|| self.config.get_str_or("appium.url", DEFAULT_SERVER_URL))
    }

    /// Returns the implicit wait budget.
    #[must_use]
    pub fn implicit_timeout(&self) -> Duration {
        Duration::from_secs(
            self.config
                .get_u64("timeout.implicit")
                .unwrap_or(DEFAULT_IMPLICIT_TIMEOUT_SECS),
        )
    }

    /// Returns the explicit wait budget used as the wait engine default.
    #[must_use]
    pub fn explicit_timeout(&self) -> Duration {
        Duration::from_secs(
            self.config
                .get_u64("timeout.explicit")
                .unwrap_or(DEFAULT_EXPLICIT_TIMEOUT_SECS),
        )
    }

    /// Returns the maximum number of test retries on failure.
    ///
    /// Precedence: `retry.max` override, then configuration, then the
    /// built-in default of 2.
    #[must_use]
    pub fn retry_max(&self) -> u32 {
        self.selector("retry.max")
            .and_then(|v| v.parse().ok())
            .or_else(|| {
                self.config
                    .get_u64("retry.max")
                    .and_then(|v| u32::try_from(v).ok())
            })
            .unwrap_or(DEFAULT_RETRY_MAX)
    }

    /// Returns the delay between test retries.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(
            self.config
                .get_u64("retry.delayMs")
                .unwrap_or(DEFAULT_RETRY_DELAY_MS),
        )
    }

    /// Returns whether a screenshot should be captured on test failure.
    #[must_use]
    pub fn screenshot_on_failure(&self) -> bool {
        self.config.get_bool("screenshot.onFailure").unwrap_or(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
