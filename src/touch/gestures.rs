//! High-level touch gestures.

// ============================================================================
// Imports
// ============================================================================

use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::element::{Element, Point};
use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::session::Session;
use crate::touch::track::{PointerTrack, perform_payload};

// ============================================================================
// Direction
// ============================================================================

/// Swipe direction, named for the finger's travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Finger travels right to left.
    Left,
    /// Finger travels left to right.
    Right,
    /// Finger travels bottom to top.
    Up,
    /// Finger travels top to bottom.
    Down,
}

impl Direction {
    /// Returns the lowercase direction name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(Error::invalid_direction(s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GestureConfig
// ============================================================================

/// Timing defaults for the gesture engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Drag time for a swipe.
    pub swipe_duration: Duration,
    /// Hold time for a long press.
    pub long_press_duration: Duration,
    /// Travel time for each pinch/zoom finger.
    pub pinch_duration: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_duration: Duration::from_millis(500),
            long_press_duration: Duration::from_millis(1000),
            pinch_duration: Duration::from_millis(500),
        }
    }
}

// ============================================================================
// Gestures
// ============================================================================

/// Builds and dispatches touch gestures on one session.
///
/// Coordinates are computed from live geometry at dispatch time: swipes
/// from the viewport rectangle, element gestures from the element's
/// center.
///
/// # Example
///
/// ```no_run
/// # async fn demo(session: appdriver::Session) -> appdriver::Result<()> {
/// use appdriver::touch::{Direction, Gestures};
///
/// let gestures = Gestures::new(&session);
/// gestures.swipe(Direction::Left).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gestures {
    session: Session,
    config: GestureConfig,
}

impl Gestures {
    /// Creates a gesture engine with default timings.
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self::with_config(session, GestureConfig::default())
    }

    /// Creates a gesture engine with explicit timings.
    #[must_use]
    pub fn with_config(session: &Session, config: GestureConfig) -> Self {
        Self { session: session.clone(), config }
    }

    // ------------------------------------------------------------------
    // Single-finger gestures
    // ------------------------------------------------------------------

    /// Taps the center of an element.
    pub async fn tap(&self, element: &Element) -> Result<()> {
        let center = element.rect().await?.center();
        self.tap_at(center.x, center.y).await
    }

    /// Taps absolute viewport coordinates.
    pub async fn tap_at(&self, x: i64, y: i64) -> Result<()> {
        let track = PointerTrack::new("finger-1")
            .move_to(x, y, Duration::ZERO)
            .down()
            .up();
        self.perform(&[track]).await
    }

    /// Long-presses the center of an element with the configured hold
    /// time.
    pub async fn long_press(&self, element: &Element) -> Result<()> {
        self.long_press_for(element, self.config.long_press_duration).await
    }

    /// Long-presses the center of an element for an explicit hold time.
    pub async fn long_press_for(&self, element: &Element, duration: Duration) -> Result<()> {
        let center = element.rect().await?.center();
        let track = PointerTrack::new("finger-1")
            .move_to(center.x, center.y, Duration::ZERO)
            .down()
            .pause(duration)
            .up();
        self.perform(&[track]).await
    }

    /// Swipes across the viewport.
    ///
    /// Horizontal swipes travel between 80% and 20% of the width at half
    /// height; vertical swipes between 70% and 30% of the height at half
    /// width.
    pub async fn swipe(&self, direction: Direction) -> Result<()> {
        let viewport = self.session.window_rect().await?;
        let width = viewport.width;
        let height = viewport.height;

        let (start, end) = match direction {
            Direction::Left => (
                point(width * 0.8, height * 0.5),
                point(width * 0.2, height * 0.5),
            ),
            Direction::Right => (
                point(width * 0.2, height * 0.5),
                point(width * 0.8, height * 0.5),
            ),
            Direction::Up => (
                point(width * 0.5, height * 0.7),
                point(width * 0.5, height * 0.3),
            ),
            Direction::Down => (
                point(width * 0.5, height * 0.3),
                point(width * 0.5, height * 0.7),
            ),
        };

        debug!(
            session_id = %self.session.id(),
            direction = %direction,
            from_x = start.x, from_y = start.y,
            to_x = end.x, to_y = end.y,
            "swiping"
        );
        let track = PointerTrack::new("finger-1")
            .move_to(start.x, start.y, Duration::ZERO)
            .down()
            .move_to(end.x, end.y, self.config.swipe_duration)
            .up();
        self.perform(&[track]).await
    }

    // ------------------------------------------------------------------
    // Two-finger gestures
    // ------------------------------------------------------------------

    /// Pinches an element closed: both fingers start a quarter of the
    /// element's height from its center and converge on it.
    pub async fn pinch(&self, element: &Element) -> Result<()> {
        let rect = element.rect().await?;
        let center = rect.center();
        let offset = (rect.height / 4.0).round() as i64;
        let duration = self.config.pinch_duration;

        let upper = PointerTrack::new("finger-1")
            .move_to(center.x, center.y - offset, Duration::ZERO)
            .down()
            .move_to(center.x, center.y, duration)
            .up();
        let lower = PointerTrack::new("finger-2")
            .move_to(center.x, center.y + offset, Duration::ZERO)
            .down()
            .move_to(center.x, center.y, duration)
            .up();
        self.perform(&[upper, lower]).await
    }

    /// Zooms an element open: both fingers start at its center and spread
    /// to a quarter of the element's height away.
    pub async fn zoom(&self, element: &Element) -> Result<()> {
        let rect = element.rect().await?;
        let center = rect.center();
        let offset = (rect.height / 4.0).round() as i64;
        let duration = self.config.pinch_duration;

        let upper = PointerTrack::new("finger-1")
            .move_to(center.x, center.y, Duration::ZERO)
            .down()
            .move_to(center.x, center.y - offset, duration)
            .up();
        let lower = PointerTrack::new("finger-2")
            .move_to(center.x, center.y, Duration::ZERO)
            .down()
            .move_to(center.x, center.y + offset, duration)
            .up();
        self.perform(&[upper, lower]).await
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Releases any depressed virtual input state.
    pub async fn release(&self) -> Result<()> {
        self.session.execute(Command::ReleaseActions).await?;
        Ok(())
    }

    async fn perform(&self, tracks: &[PointerTrack]) -> Result<()> {
        self.session
            .execute(Command::PerformActions { actions: perform_payload(tracks) })
            .await?;
        Ok(())
    }
}

fn point(x: f64, y: f64) -> Point {
    Point { x: x.round() as i64, y: y.round() as i64 }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;

    use super::*;
    use crate::transport::mock::{MockElement, MockWire};

    fn moves(track: &Value) -> Vec<(i64, i64, u64)> {
        track["actions"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|a| a["type"] == "pointerMove")
            .map(|a| {
                (
                    a["x"].as_i64().unwrap(),
                    a["y"].as_i64().unwrap(),
                    a["duration"].as_u64().unwrap(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_swipe_left_uses_width_fractions() {
        let wire = Arc::new(MockWire::new().with_window(1000, 2000));
        let session = Session::for_tests(Arc::clone(&wire)).await;

        Gestures::new(&session).swipe(Direction::Left).await.unwrap();

        let payload = wire.performed_actions().remove(0);
        let tracks = payload.as_array().unwrap();
        assert_eq!(tracks.len(), 1);
        let moves = moves(&tracks[0]);
        assert_eq!(moves[0], (800, 1000, 0));
        assert_eq!(moves[1], (200, 1000, 500));
    }

    #[tokio::test]
    async fn test_swipe_up_uses_height_fractions() {
        let wire = Arc::new(MockWire::new().with_window(1000, 2000));
        let session = Session::for_tests(Arc::clone(&wire)).await;

        Gestures::new(&session).swipe(Direction::Up).await.unwrap();

        let payload = wire.performed_actions().remove(0);
        let moves = moves(&payload.as_array().unwrap()[0]);
        assert_eq!(moves[0], (500, 1400, 0));
        assert_eq!(moves[1], (500, 600, 500));
    }

    #[tokio::test]
    async fn test_swipe_down_mirrors_up() {
        let wire = Arc::new(MockWire::new().with_window(1000, 2000));
        let session = Session::for_tests(Arc::clone(&wire)).await;

        Gestures::new(&session).swipe(Direction::Down).await.unwrap();

        let payload = wire.performed_actions().remove(0);
        let moves = moves(&payload.as_array().unwrap()[0]);
        assert_eq!(moves[0], (500, 600, 0));
        assert_eq!(moves[1], (500, 1400, 500));
    }

    #[tokio::test]
    async fn test_swipe_duration_is_configurable() {
        let wire = Arc::new(MockWire::new().with_window(1000, 2000));
        let session = Session::for_tests(Arc::clone(&wire)).await;
        let config = GestureConfig {
            swipe_duration: Duration::from_millis(250),
            ..GestureConfig::default()
        };

        Gestures::with_config(&session, config)
            .swipe(Direction::Right)
            .await
            .unwrap();

        let payload = wire.performed_actions().remove(0);
        let moves = moves(&payload.as_array().unwrap()[0]);
        assert_eq!(moves[1].2, 250);
    }

    #[tokio::test]
    async fn test_tap_targets_element_center() {
        let wire = Arc::new(MockWire::new().with_element("card", MockElement {
            id: "el-card".to_string(),
            rect: (100.0, 200.0, 200.0, 100.0),
            ..MockElement::default()
        }));
        let session = Session::for_tests(Arc::clone(&wire)).await;
        let element = session.find_element(crate::locator::By::id("card")).await.unwrap();

        Gestures::new(&session).tap(&element).await.unwrap();

        let payload = wire.performed_actions().remove(0);
        let actions = payload.as_array().unwrap()[0]["actions"].as_array().unwrap().clone();
        assert_eq!(actions[0]["x"], 200);
        assert_eq!(actions[0]["y"], 250);
        assert_eq!(actions[1]["type"], "pointerDown");
        assert_eq!(actions[2]["type"], "pointerUp");
    }

    #[tokio::test]
    async fn test_long_press_holds_for_configured_duration() {
        let wire = Arc::new(MockWire::new().with_element("card", MockElement::default()));
        let session = Session::for_tests(Arc::clone(&wire)).await;
        let element = session.find_element(crate::locator::By::id("card")).await.unwrap();

        Gestures::new(&session).long_press(&element).await.unwrap();

        let payload = wire.performed_actions().remove(0);
        let actions = payload.as_array().unwrap()[0]["actions"].as_array().unwrap().clone();
        assert_eq!(actions[2]["type"], "pause");
        assert_eq!(actions[2]["duration"], 1000);
    }

    #[tokio::test]
    async fn test_pinch_dispatches_two_concurrent_tracks() {
        let wire = Arc::new(MockWire::new().with_element("map", MockElement {
            id: "el-map".to_string(),
            rect: (0.0, 0.0, 400.0, 400.0),
            ..MockElement::default()
        }));
        let session = Session::for_tests(Arc::clone(&wire)).await;
        let element = session.find_element(crate::locator::By::id("map")).await.unwrap();

        Gestures::new(&session).pinch(&element).await.unwrap();

        let payloads = wire.performed_actions();
        assert_eq!(payloads.len(), 1);
        let tracks = payloads[0].as_array().unwrap();
        assert_eq!(tracks.len(), 2);

        // Both fingers converge on the center from quarter offsets.
        let upper = moves(&tracks[0]);
        let lower = moves(&tracks[1]);
        assert_eq!(upper[0], (200, 100, 0));
        assert_eq!(upper[1], (200, 200, 500));
        assert_eq!(lower[0], (200, 300, 0));
        assert_eq!(lower[1], (200, 200, 500));
    }

    #[tokio::test]
    async fn test_zoom_spreads_from_center() {
        let wire = Arc::new(MockWire::new().with_element("map", MockElement {
            id: "el-map".to_string(),
            rect: (0.0, 0.0, 400.0, 400.0),
            ..MockElement::default()
        }));
        let session = Session::for_tests(Arc::clone(&wire)).await;
        let element = session.find_element(crate::locator::By::id("map")).await.unwrap();

        Gestures::new(&session).zoom(&element).await.unwrap();

        let tracks = wire.performed_actions().remove(0).as_array().unwrap().clone();
        let upper = moves(&tracks[0]);
        let lower = moves(&tracks[1]);
        assert_eq!(upper[0], (200, 200, 0));
        assert_eq!(upper[1], (200, 100, 500));
        assert_eq!(lower[1], (200, 300, 500));
    }

    #[tokio::test]
    async fn test_remote_rejection_propagates() {
        let wire = Arc::new(MockWire::new().with_failing_actions());
        let session = Session::for_tests(Arc::clone(&wire)).await;

        let err = Gestures::new(&session).tap_at(10, 10).await.unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
    }

    #[test]
    fn test_direction_parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("Down".parse::<Direction>().unwrap(), Direction::Down);
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert!(matches!(err, Error::InvalidDirection { ref value } if value == "sideways"));
    }
}
