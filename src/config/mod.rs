//! Configuration resolution.
//!
//! Loads YAML/JSON configuration sources into a dot-path addressable value
//! tree ([`Config`]), merges a base map with environment-specific
//! overrides, and exposes typed process-wide settings ([`Settings`]) plus
//! the app/platform registry ([`AppRegistry`]).
//!
//! Configuration is resolved once at startup and treated as read-only
//! afterwards: components receive the finished values by `Arc`, so no
//! lock-guarded lazy globals are involved.
//!
//! # Example
//!
//! ```ignore
//! use appdriver::{Config, Settings};
//!
//! let config = Config::load_environment("config", "staging");
//! let settings = Settings::new(config)
//!     .with_override("platform", "android")
//!     .with_override("app", "demo");
//!
//! let url = settings.server_url();
//! ```

// ============================================================================
// Modules
// ============================================================================

/// Application registry lookup.
pub mod registry;
/// Resolved runtime settings and selector keys.
pub mod settings;

pub use registry::AppRegistry;
pub use settings::Settings;

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Config
// ============================================================================

/// A configuration map addressable by dot-separated key paths.
///
/// Backed by a JSON value tree regardless of the source file format.
/// Immutable once merged; [`Config::merge`] exists for the startup merge
/// step only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Root key/value tree.
    root: Map<String, Value>,
}

// ============================================================================
// Config - Constructors
// ============================================================================

impl Config {
    /// Creates an empty configuration map.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an already-parsed value tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `value` is not a map.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::empty()),
            other => Err(Error::config(format!(
                "expected a map at the configuration root, got: {other}"
            ))),
        }
    }

    /// Loads a configuration file, choosing the parser by extension.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML; everything else as JSON.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] if the file does not exist
    /// - [`Error::Yaml`] / [`Error::Json`] if parsing fails
    /// - [`Error::Config`] if the document root is not a map
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config_not_found(path));
        }

        let text = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let value: Value = if is_yaml {
            serde_yaml::from_str(&text)?
        } else {
            serde_json::from_str(&text)?
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_value(value)
    }

    /// Loads and merges `default.yaml` with `{env}.yaml` from `dir`.
    ///
    /// Environment values override defaults. A missing file falls back to
    /// an empty map; this is the only silent fallback in the crate and
    /// applies to configuration bootstrap only. Malformed files still
    /// fail.
    ///
    /// # Errors
    ///
    /// Returns parse errors from either file.
    pub fn load_environment(dir: impl AsRef<Path>, env: &str) -> Result<Self> {
        let dir = dir.as_ref();

        let mut merged = Self::load_or_empty(dir.join("default.yaml"))?;
        let overrides = Self::load_or_empty(dir.join(format!("{env}.yaml")))?;
        merged.merge(&overrides);

        debug!(env, dir = %dir.display(), "Resolved environment configuration");
        Ok(merged)
    }

    /// Loads a file, treating absence as an empty map.
    fn load_or_empty(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(Error::ConfigNotFound { .. }) => Ok(Self::empty()),
            Err(err) => Err(err),
        }
    }
}

// ============================================================================
// Config - Lookup
// ============================================================================

impl Config {
    /// Resolves a dot-separated key path to a value.
    ///
    /// Returns `None` if any path segment is missing or a segment other
    /// than the last points at a non-map value.
    #[must_use]
    pub fn get(&self, dot_path: &str) -> Option<&Value> {
        let mut parts = dot_path.split('.');
        let mut current = self.root.get(parts.next()?)?;

        for part in parts {
            current = current.as_object()?.get(part)?;
        }

        Some(current)
    }

    /// Resolves a dot-path to a string.
    ///
    /// Scalar values are rendered as strings; maps and arrays yield
    /// `None`.
    #[must_use]
    pub fn get_str(&self, dot_path: &str) -> Option<String> {
        match self.get(dot_path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Resolves a dot-path to a string, falling back to a default.
    #[must_use]
    pub fn get_str_or(&self, dot_path: &str, default: &str) -> String {
        self.get_str(dot_path)
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolves a dot-path to an unsigned integer.
    ///
    /// Accepts native numbers and numeric strings.
    #[must_use]
    pub fn get_u64(&self, dot_path: &str) -> Option<u64> {
        match self.get(dot_path)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Resolves a dot-path to a boolean.
    ///
    /// Accepts native booleans and `"true"`/`"false"` strings.
    #[must_use]
    pub fn get_bool(&self, dot_path: &str) -> Option<bool> {
        match self.get(dot_path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Resolves a dot-path to a nested section.
    ///
    /// Returns `None` if the path is missing or points at a non-map value.
    #[must_use]
    pub fn section(&self, dot_path: &str) -> Option<&Map<String, Value>> {
        match self.get(dot_path)? {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the root key/value tree.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }
}

// ============================================================================
// Config - Merge
// ============================================================================

impl Config {
    /// Recursively merges `overrides` into this map.
    ///
    /// For each override key: if both sides hold nested maps they are
    /// merged recursively, otherwise the override value replaces the base
    /// value. The override map is never mutated; this map is mutated in
    /// place. Idempotent: merging the same overrides twice yields the
    /// same result as merging once.
    pub fn merge(&mut self, overrides: &Config) {
        deep_merge(&mut self.root, &overrides.root);
    }
}

/// Recursive merge of `overrides` into `base`, override-wins.
fn deep_merge(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, override_value) in overrides {
        match (base.get_mut(key), override_value) {
            (Some(Value::Object(base_child)), Value::Object(override_child)) => {
                deep_merge(base_child, override_child);
            }
            _ => {
                base.insert(key.clone(), override_value.clone());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use serde_json::json;

    fn config(value: Value) -> Config {
        Config::from_value(value).unwrap()
    }

    #[test]
    fn test_get_nested_path() {
        let cfg = config(json!({ "appium": { "url": "http://h:4723" } }));
        assert_eq!(cfg.get("appium.url"), Some(&json!("http://h:4723")));
        assert_eq!(cfg.get_str("appium.url").as_deref(), Some("http://h:4723"));
    }

    #[test]
    fn test_get_missing_path() {
        let cfg = config(json!({ "appium": { "url": "x" } }));
        assert_eq!(cfg.get("appium.port"), None);
        assert_eq!(cfg.get("timeout.explicit"), None);
    }

    #[test]
    fn test_get_past_scalar_is_none() {
        let cfg = config(json!({ "appium": { "url": "x" } }));
        assert_eq!(cfg.get("appium.url.deeper"), None);
    }

    #[test]
    fn test_get_str_renders_scalars() {
        let cfg = config(json!({ "timeout": { "explicit": 15 }, "flag": true }));
        assert_eq!(cfg.get_str("timeout.explicit").as_deref(), Some("15"));
        assert_eq!(cfg.get_str("flag").as_deref(), Some("true"));
        assert_eq!(cfg.get_str("timeout"), None);
    }

    #[test]
    fn test_get_str_or_default() {
        let cfg = config(json!({}));
        assert_eq!(cfg.get_str_or("appium.url", "fallback"), "fallback");
    }

    #[test]
    fn test_get_u64_accepts_numeric_strings() {
        let cfg = config(json!({ "retry": { "max": "3" }, "timeout": { "explicit": 15 } }));
        assert_eq!(cfg.get_u64("retry.max"), Some(3));
        assert_eq!(cfg.get_u64("timeout.explicit"), Some(15));
        assert_eq!(cfg.get_u64("retry.missing"), None);
    }

    #[test]
    fn test_section_of_map() {
        let cfg = config(json!({ "apps": { "demo": { "android": {} } } }));
        let section = cfg.section("apps.demo").unwrap();
        assert!(section.contains_key("android"));
    }

    #[test]
    fn test_section_of_scalar_is_none() {
        let cfg = config(json!({ "appium": { "url": "x" } }));
        assert_eq!(cfg.section("appium.url"), None);
    }

    #[test]
    fn test_merge_override_wins() {
        let mut base = config(json!({
            "appium": { "url": "http://base:4723", "keep": "yes" },
            "timeout": { "explicit": 15 },
        }));
        let overrides = config(json!({
            "appium": { "url": "http://override:4723" },
        }));

        base.merge(&overrides);

        assert_eq!(
            base.get_str("appium.url").as_deref(),
            Some("http://override:4723")
        );
        assert_eq!(base.get_str("appium.keep").as_deref(), Some("yes"));
        assert_eq!(base.get_u64("timeout.explicit"), Some(15));
    }

    #[test]
    fn test_merge_replaces_map_with_scalar() {
        let mut base = config(json!({ "retry": { "max": 2 } }));
        let overrides = config(json!({ "retry": "off" }));

        base.merge(&overrides);

        assert_eq!(base.get_str("retry").as_deref(), Some("off"));
    }

    #[test]
    fn test_merge_does_not_mutate_overrides() {
        let mut base = config(json!({ "a": { "b": 1 } }));
        let overrides = config(json!({ "a": { "c": 2 } }));
        let snapshot = overrides.clone();

        base.merge(&overrides);

        assert_eq!(overrides, snapshot);
    }

    #[test]
    fn test_from_value_rejects_scalar_root() {
        let err = Config::from_value(json!(42)).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_missing_file_is_config_not_found() {
        let err = Config::load("/nonexistent/default.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    // Small nested value trees for the merge idempotence property.
    fn value_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::from),
            any::<u32>().prop_map(Value::from),
            "[a-z]{1,6}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::btree_map("[a-d]{1}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(
            base in prop::collection::btree_map("[a-d]{1}", value_tree(), 0..4),
            overrides in prop::collection::btree_map("[a-d]{1}", value_tree(), 0..4),
        ) {
            let base = config(Value::Object(base.into_iter().collect()));
            let overrides = config(Value::Object(overrides.into_iter().collect()));

            let mut once = base.clone();
            once.merge(&overrides);

            let mut twice = once.clone();
            twice.merge(&overrides);

            prop_assert_eq!(once, twice);
        }
    }
}
