//! Type-safe identifiers for automation entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time:
//! a [`SessionId`] can never be passed where an [`ElementId`] is expected.
//!
//! [`SessionId`] and [`ElementId`] are assigned by the remote end and
//! treated as opaque strings. [`ContextId`] is generated locally, one per
//! execution context (test unit / task), and keys the session registry.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// SessionId
// ============================================================================

/// Identifier of a remote automation session.
///
/// Assigned by the server on session creation; opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw session ID string.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// ElementId
// ============================================================================

/// Identifier of an element within a remote session.
///
/// Assigned by the server when an element is located; only valid for the
/// session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wraps a raw element ID string.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// ContextId
// ============================================================================

/// Identifier of an execution context (one test unit / worker task).
///
/// Keys the session registry: each context owns at most one session at a
/// time and never sees another context's session. Callers create one per
/// test unit and pass it to every [`crate::SessionManager`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Generates a fresh context ID.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::new("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(id.to_string(), "abc-123");
    }

    #[test]
    fn test_element_id_from_string() {
        let id: ElementId = String::from("el-7").into();
        assert_eq!(id.as_str(), "el-7");
    }

    #[test]
    fn test_context_ids_are_unique() {
        let a = ContextId::new();
        let b = ContextId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_serde_transparent() {
        let id = SessionId::new("s1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"s1\"");

        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
