//! W3C pointer-action sequences.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::{Value, json};

// ============================================================================
// PointerAction
// ============================================================================

/// One event on a virtual finger's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerAction {
    /// Move to absolute viewport coordinates over `duration`.
    Move {
        /// Target x coordinate.
        x: i64,
        /// Target y coordinate.
        y: i64,
        /// Travel time; zero teleports the pointer.
        duration: Duration,
    },
    /// Press the pointer down at its current position.
    Down,
    /// Release the pointer.
    Up,
    /// Hold still for `duration`.
    Pause {
        /// Hold time.
        duration: Duration,
    },
}

// ============================================================================
// PointerTrack
// ============================================================================

/// A named virtual finger and its ordered event timeline.
///
/// Tracks dispatched together in one `perform` call run concurrently on
/// the device; multi-finger gestures are built from several tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTrack {
    id: String,
    actions: Vec<PointerAction>,
}

impl PointerTrack {
    /// Creates an empty track for the named finger.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), actions: Vec::new() }
    }

    /// Appends a move to absolute coordinates.
    #[must_use]
    pub fn move_to(mut self, x: i64, y: i64, duration: Duration) -> Self {
        self.actions.push(PointerAction::Move { x, y, duration });
        self
    }

    /// Appends a press.
    #[must_use]
    pub fn down(mut self) -> Self {
        self.actions.push(PointerAction::Down);
        self
    }

    /// Appends a release.
    #[must_use]
    pub fn up(mut self) -> Self {
        self.actions.push(PointerAction::Up);
        self
    }

    /// Appends a hold.
    #[must_use]
    pub fn pause(mut self, duration: Duration) -> Self {
        self.actions.push(PointerAction::Pause { duration });
        self
    }

    /// Serializes the track as one W3C pointer input source.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let actions: Vec<Value> = self
            .actions
            .iter()
            .map(|action| match action {
                PointerAction::Move { x, y, duration } => json!({
                    "type": "pointerMove",
                    "duration": duration.as_millis() as u64,
                    "x": x,
                    "y": y,
                }),
                PointerAction::Down => json!({ "type": "pointerDown", "button": 0 }),
                PointerAction::Up => json!({ "type": "pointerUp", "button": 0 }),
                PointerAction::Pause { duration } => json!({
                    "type": "pause",
                    "duration": duration.as_millis() as u64,
                }),
            })
            .collect();

        json!({
            "type": "pointer",
            "id": self.id,
            "parameters": { "pointerType": "touch" },
            "actions": actions,
        })
    }
}

/// Serializes a set of concurrent tracks as a W3C `actions` payload.
#[must_use]
pub fn perform_payload(tracks: &[PointerTrack]) -> Value {
    Value::Array(tracks.iter().map(PointerTrack::to_value).collect())
}

// ============================================================================
// Tests
// ============================================================================
