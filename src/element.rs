//! Remote element handles.
//!
//! An [`Element`] is a cheap clone-able reference to an element the remote
//! end has already resolved. All interaction methods go back over the wire,
//! so a handle can turn stale if the app re-renders; callers that need
//! robustness against that wrap interactions in a retry (see
//! [`RetryPolicy`](crate::retry::RetryPolicy)).
//!
//! # Example
//!
//! ```no_run
//! # async fn demo(session: appdriver::Session) -> appdriver::Result<()> {
//! use appdriver::By;
//!
//! let field = session.find_element(By::accessibility_id("username")).await?;
//! field.clear().await?;
//! field.send_keys("ada").await?;
//! assert!(field.is_displayed().await?);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde_json::from_value;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::protocol::Command;
use crate::session::Session;

// ============================================================================
// Geometry
// ============================================================================

/// An element's bounding rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Returns the center point, rounded to whole pixels.
    #[must_use]
    pub fn center(&self) -> Point {
        Point {
            x: (self.x + self.width / 2.0).round() as i64,
            y: (self.y + self.height / 2.0).round() as i64,
        }
    }
}

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

// ============================================================================
// Element
// ============================================================================

/// A handle to an element resolved by the remote end.
#[derive(Clone)]
pub struct Element {
    id: ElementId,
    session: Session,
}

impl Element {
    pub(crate) fn new(id: ElementId, session: Session) -> Self {
        Self { id, session }
    }

    /// Returns the server-assigned element ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Clicks the element.
    pub async fn click(&self) -> Result<()> {
        self.session
            .execute(Command::ElementClick { element: self.id.clone() })
            .await?;
        Ok(())
    }

    /// Clears the element's text content.
    pub async fn clear(&self) -> Result<()> {
        self.session
            .execute(Command::ElementClear { element: self.id.clone() })
            .await?;
        Ok(())
    }

    /// Types text into the element.
    pub async fn send_keys(&self, text: impl Into<String>) -> Result<()> {
        self.session
            .execute(Command::ElementSendKeys {
                element: self.id.clone(),
                text: text.into(),
            })
            .await?;
        Ok(())
    }

    /// Returns the element's visible text.
    pub async fn text(&self) -> Result<String> {
        let value = self
            .session
            .execute(Command::ElementText { element: self.id.clone() })
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Returns an attribute value, or `None` when the attribute is unset.
    pub async fn attribute(&self, name: impl Into<String>) -> Result<Option<String>> {
        let value = self
            .session
            .execute(Command::ElementAttribute {
                element: self.id.clone(),
                name: name.into(),
            })
            .await?;
        Ok(value.as_str().map(String::from))
    }

    /// Returns the element's bounding rectangle.
    pub async fn rect(&self) -> Result<Rect> {
        let value = self
            .session
            .execute(Command::ElementRect { element: self.id.clone() })
            .await?;
        from_value(value).map_err(Error::from)
    }

    /// Returns whether the element is currently displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        let value = self
            .session
            .execute(Command::ElementDisplayed { element: self.id.clone() })
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Returns whether the element accepts interaction.
    pub async fn is_enabled(&self) -> Result<bool> {
        let value = self
            .session
            .execute(Command::ElementEnabled { element: self.id.clone() })
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element").field("id", &self.id).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center_rounds_to_whole_pixels() {
        let rect = Rect { x: 10.0, y: 20.0, width: 101.0, height: 51.0 };
        let center = rect.center();
        assert_eq!(center.x, 61);
        assert_eq!(center.y, 46);
    }

    #[test]
    fn test_rect_deserializes_from_wire_shape() {
        let rect: Rect =
            serde_json::from_value(serde_json::json!({ "x": 0, "y": 5, "width": 320, "height": 48 }))
                .unwrap();
        assert_eq!(rect.center(), Point { x: 160, y: 29 });
    }
}
