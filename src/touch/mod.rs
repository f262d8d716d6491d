//! Touch gestures over W3C pointer actions.
//!
//! [`PointerTrack`] models one virtual finger's timeline; [`Gestures`]
//! composes tracks into taps, long presses, swipes, and two-finger
//! pinch/zoom, with timings from [`GestureConfig`]. Multi-finger gestures
//! ship all tracks in a single dispatch so the device plays them
//! concurrently.

// ============================================================================
// Modules
// ============================================================================

mod gestures;
mod track;

pub use gestures::{Direction, GestureConfig, Gestures};
pub use track::{PointerAction, PointerTrack, perform_payload};
