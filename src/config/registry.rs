//! App/platform registry.
//!
//! A nested `appName -> platform -> { deviceName, platformVersion, app,
//! ... }` mapping supplied by the external configuration-loading
//! collaborator. Missing app or platform entries are reported as named
//! errors, never silently defaulted.

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;

use serde_json::{Map, Value};

use crate::capabilities::Platform;
use crate::error::{Error, Result};

use super::Config;

// ============================================================================
// AppRegistry
// ============================================================================

/// Read-only registry of per-app, per-platform capability entries.
///
/// Immutable after construction; safe to share across execution contexts
/// without synchronization.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    /// `appName -> platform -> entry` tree.
    apps: Map<String, Value>,
}

impl AppRegistry {
    /// Wraps an already-parsed registry tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `value` is not a map.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(apps) => Ok(Self { apps }),
            Value::Null => Ok(Self::default()),
            other => Err(Error::config(format!(
                "expected a map at the registry root, got: {other}"
            ))),
        }
    }

    /// Loads the registry from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist, or a
    /// parse error if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::load(path)?;
        Ok(Self {
            apps: config.as_map().clone(),
        })
    }

    /// Returns the platform entry for an application.
    ///
    /// # Errors
    ///
    /// - [`Error::AppNotFound`] if `app` is not registered (the message
    ///   names the available apps)
    /// - [`Error::PlatformNotFound`] if the app has no entry for
    ///   `platform`
    pub fn platform_entry(&self, app: &str, platform: Platform) -> Result<&Map<String, Value>> {
        let app_entry = self
            .apps
            .get(app)
            .and_then(Value::as_object)
            .ok_or_else(|| Error::app_not_found(app, self.available()))?;

        app_entry
            .get(platform.as_str())
            .and_then(Value::as_object)
            .ok_or_else(|| Error::platform_not_found(platform.as_str(), app))
    }

    /// Extracts the application identifier from a platform entry.
    ///
    /// App package on Android, bundle ID on iOS; `None` when the entry
    /// does not carry one.
    #[must_use]
    pub fn app_id(entry: &Map<String, Value>, platform: Platform) -> Option<String> {
        entry
            .get(platform.app_id_key())
            .and_then(Value::as_str)
            .map(String::from)
    }

    /// Returns the registered application names, comma-separated.
    #[must_use]
    pub fn available(&self) -> String {
        self.apps.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ============================================================================
// Tests
// ============================================================================
