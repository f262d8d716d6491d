//! Capability resolution for session creation.
//!
//! Builds the platform-specific capability set sent to the automation
//! server when a session is created. The builder accumulates typed fields
//! plus a generic key/value overlay; [`CapabilityBuilder::build`] freezes
//! them into an immutable [`Capabilities`] value at a single call site.
//!
//! # Example
//!
//! ```ignore
//! use appdriver::{CapabilityBuilder, Platform};
//!
//! let caps = CapabilityBuilder::new()
//!     .platform(Platform::Android)
//!     .device_name("Pixel 6")
//!     .platform_version("13.0")
//!     .capability("noReset", true)
//!     .build()?;
//!
//! assert_eq!(caps.platform(), Platform::Android);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Registry keys routed to dedicated builder fields.
const KEY_DEVICE_NAME: &str = "deviceName";
const KEY_PLATFORM_VERSION: &str = "platformVersion";
const KEY_APP: &str = "app";

/// W3C-standard capability names that must not be vendor-prefixed.
const W3C_CAPABILITIES: &[&str] = &[
    "platformName",
    "browserName",
    "browserVersion",
    "acceptInsecureCerts",
    "pageLoadStrategy",
    "proxy",
    "setWindowRect",
    "timeouts",
    "unhandledPromptBehavior",
];

// ============================================================================
// Platform
// ============================================================================

/// Target automation platform.
///
/// A closed two-variant union: every platform-dependent decision in the
/// crate is an exhaustive match, so an unsupported platform can only be
/// rejected at the string-parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Android, automated via UiAutomator2.
    Android,
    /// iOS, automated via XCUITest.
    Ios,
}

impl Platform {
    /// Returns the lowercase platform name (`"android"` / `"ios"`).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }

    /// Returns the W3C `platformName` capability value.
    #[inline]
    #[must_use]
    pub fn platform_name(&self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
        }
    }

    /// Returns the automation engine name for this platform's schema.
    #[inline]
    #[must_use]
    pub fn automation_name(&self) -> &'static str {
        match self {
            Self::Android => "UiAutomator2",
            Self::Ios => "XCUITest",
        }
    }

    /// Returns the registry key holding the application identifier.
    ///
    /// App package on Android, bundle ID on iOS.
    #[inline]
    #[must_use]
    pub fn app_id_key(&self) -> &'static str {
        match self {
            Self::Android => "appPackage",
            Self::Ios => "bundleId",
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    /// Parses a platform string, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlatform`] for anything other than
    /// `android` or `ios`.
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("android") {
            Ok(Self::Android)
        } else if s.eq_ignore_ascii_case("ios") {
            Ok(Self::Ios)
        } else {
            Err(Error::invalid_platform(s))
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CapabilityBuilder
// ============================================================================

/// Fluent builder for a session [`Capabilities`] set.
///
/// Dedicated setters exist for the well-known fields (device name,
/// platform version, app reference); everything else goes through
/// [`CapabilityBuilder::capability`]. Explicit setters win over extras
/// targeting the same slot.
#[derive(Debug, Default, Clone)]
pub struct CapabilityBuilder {
    /// Target platform; required before build.
    platform: Option<Platform>,
    /// Device or emulator name.
    device_name: Option<String>,
    /// Platform OS version.
    platform_version: Option<String>,
    /// Path or URL to the application binary.
    app: Option<String>,
    /// Arbitrary extra capabilities.
    extras: Map<String, Value>,
}

impl CapabilityBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target platform.
    #[inline]
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the device or emulator name.
    #[inline]
    #[must_use]
    pub fn device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    /// Sets the platform OS version.
    #[inline]
    #[must_use]
    pub fn platform_version(mut self, version: impl Into<String>) -> Self {
        self.platform_version = Some(version.into());
        self
    }

    /// Sets the application path or URL.
    #[inline]
    #[must_use]
    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Adds an arbitrary extra capability.
    #[inline]
    #[must_use]
    pub fn capability(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Copies all keys from a platform registry section into the builder.
    ///
    /// The three well-known keys (`deviceName`, `platformVersion`, `app`)
    /// are routed to their dedicated fields; everything else lands in
    /// extras. Non-primitive values (arrays, objects) are stringified.
    #[must_use]
    pub fn from_registry(mut self, section: &Map<String, Value>) -> Self {
        for (key, value) in section {
            match key.as_str() {
                KEY_DEVICE_NAME => self.device_name = Some(value_to_string(value)),
                KEY_PLATFORM_VERSION => self.platform_version = Some(value_to_string(value)),
                KEY_APP => self.app = Some(value_to_string(value)),
                _ => {
                    self.extras.insert(key.clone(), stringify_compound(value));
                }
            }
        }
        self
    }

    /// Freezes the builder into an immutable capability set.
    ///
    /// Extras are inserted first and the well-known fields last, so a
    /// dedicated setter always wins over an extra targeting the same key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlatform`] if no platform was set.
    pub fn build(self) -> Result<Capabilities> {
        let Some(platform) = self.platform else {
            return Err(Error::invalid_platform("unset"));
        };

        let mut values = Map::new();

        for (key, value) in self.extras {
            values.insert(wire_key(&key), value);
        }

        values.insert(
            "platformName".to_string(),
            Value::String(platform.platform_name().to_string()),
        );
        values.insert(
            "appium:automationName".to_string(),
            Value::String(platform.automation_name().to_string()),
        );
        if let Some(device_name) = self.device_name {
            values.insert("appium:deviceName".to_string(), Value::String(device_name));
        }
        if let Some(version) = self.platform_version {
            values.insert("appium:platformVersion".to_string(), Value::String(version));
        }
        if let Some(app) = self.app {
            values.insert("appium:app".to_string(), Value::String(app));
        }

        Ok(Capabilities { platform, values })
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Immutable capability set tagged with its platform.
///
/// Produced by [`CapabilityBuilder::build`] and consumed by session
/// creation; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Platform discriminant.
    platform: Platform,
    /// Wire-form capability map (vendor-prefixed keys).
    values: Map<String, Value>,
}

impl Capabilities {
    /// Returns the platform this set was built for.
    #[inline]
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns a capability value by its wire key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the full wire-form capability map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Applies the `appium:` vendor prefix to non-standard, unprefixed keys.
fn wire_key(key: &str) -> String {
    if key.contains(':') || W3C_CAPABILITIES.contains(&key) {
        key.to_string()
    } else {
        format!("appium:{key}")
    }
}

/// Stringifies arrays and objects; primitives pass through unchanged.
fn stringify_compound(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

/// Renders any value as the plain string the well-known fields expect.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
