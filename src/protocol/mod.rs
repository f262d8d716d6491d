//! Wire protocol command and envelope types.
//!
//! The automation server speaks the W3C WebDriver protocol with the
//! Appium mobile extensions: synchronous HTTP request/response, JSON
//! bodies, and a `{"value": ...}` response envelope. This module maps
//! each session-scoped operation to its verb, endpoint, and body; the
//! [`crate::transport`] layer owns the actual HTTP exchange.
//!
//! # Endpoint Mapping
//!
//! | Command | Verb | Endpoint |
//! |---------|------|----------|
//! | `DeleteSession` | DELETE | `/session/{id}` |
//! | `FindElement` | POST | `/session/{id}/element` |
//! | `PerformActions` | POST | `/session/{id}/actions` |
//! | `ActivateApp` | POST | `/session/{id}/appium/device/activate_app` |
//! | ... | | |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::identifiers::ElementId;

// ============================================================================
// Constants
// ============================================================================

/// W3C element identifier key in wire payloads.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a852-e4f7529ccfbe";

// ============================================================================
// Verb
// ============================================================================

/// HTTP verb of a wire command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Idempotent read.
    Get,
    /// State-changing call with a JSON body.
    Post,
    /// Resource teardown.
    Delete,
}

// ============================================================================
// Orientation
// ============================================================================

/// Device screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Portrait orientation.
    #[serde(rename = "PORTRAIT")]
    Portrait,
    /// Landscape orientation.
    #[serde(rename = "LANDSCAPE")]
    Landscape,
}

impl Orientation {
    /// Returns the wire-protocol orientation string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "PORTRAIT",
            Self::Landscape => "LANDSCAPE",
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("portrait") {
            Ok(Self::Portrait)
        } else if s.eq_ignore_ascii_case("landscape") {
            Ok(Self::Landscape)
        } else {
            Err(Error::config(format!("unknown orientation: {s}")))
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Command
// ============================================================================

/// A session-scoped wire command.
///
/// Endpoints are relative to `/session/{session_id}`; the transport
/// prepends the session prefix.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Terminate the remote session.
    DeleteSession,

    /// Navigate to a URL (webview / browser contexts).
    Navigate {
        /// Target URL.
        url: String,
    },

    /// Locate the first matching element.
    FindElement {
        /// Locator strategy (wire `using` string).
        using: String,
        /// Locator value.
        value: String,
    },

    /// Locate all matching elements.
    FindElements {
        /// Locator strategy (wire `using` string).
        using: String,
        /// Locator value.
        value: String,
    },

    /// Click an element.
    ElementClick {
        /// Target element.
        element: ElementId,
    },

    /// Clear an editable element.
    ElementClear {
        /// Target element.
        element: ElementId,
    },

    /// Type text into an element.
    ElementSendKeys {
        /// Target element.
        element: ElementId,
        /// Text to type.
        text: String,
    },

    /// Read an element's visible text.
    ElementText {
        /// Target element.
        element: ElementId,
    },

    /// Read an element attribute.
    ElementAttribute {
        /// Target element.
        element: ElementId,
        /// Attribute name.
        name: String,
    },

    /// Read an element's bounding rectangle.
    ElementRect {
        /// Target element.
        element: ElementId,
    },

    /// Query element visibility.
    ElementDisplayed {
        /// Target element.
        element: ElementId,
    },

    /// Query element enabled state.
    ElementEnabled {
        /// Target element.
        element: ElementId,
    },

    /// Read the window (viewport) rectangle.
    WindowRect,

    /// Dispatch one or more pointer-event tracks.
    PerformActions {
        /// W3C `actions` array, one entry per pointer track.
        actions: Value,
    },

    /// Release any depressed virtual input state.
    ReleaseActions,

    /// Capture a screenshot (base64 PNG).
    Screenshot,

    /// Apply the session's implicit wait timeout.
    SetTimeouts {
        /// Implicit wait in milliseconds.
        implicit_ms: u64,
    },

    /// Activate (foreground) an application.
    ActivateApp {
        /// App package / bundle ID.
        app_id: String,
    },

    /// Terminate an application.
    TerminateApp {
        /// App package / bundle ID.
        app_id: String,
    },

    /// Install an application binary.
    InstallApp {
        /// Path or URL to the binary.
        path: String,
    },

    /// Remove an application.
    RemoveApp {
        /// App package / bundle ID.
        app_id: String,
    },

    /// Query whether an application is installed.
    IsAppInstalled {
        /// App package / bundle ID.
        app_id: String,
    },

    /// Send the app under test to the background.
    BackgroundApp {
        /// Seconds to background; `None` backgrounds indefinitely.
        seconds: Option<u64>,
    },

    /// Lock the device screen.
    Lock {
        /// Seconds to keep locked; `None` locks until unlocked.
        seconds: Option<u64>,
    },

    /// Inject a key event (Android keycode).
    PressKey {
        /// Android keycode.
        keycode: u32,
    },

    /// List available automation contexts.
    GetContexts,

    /// Read the current automation context.
    GetContext,

    /// Switch automation context (e.g. `NATIVE_APP`, `WEBVIEW_...`).
    SetContext {
        /// Context name.
        name: String,
    },

    /// Read the device orientation.
    GetOrientation,

    /// Set the device orientation.
    SetOrientation {
        /// Target orientation.
        orientation: Orientation,
    },
}

impl Command {
    /// Returns the HTTP verb for this command.
    #[must_use]
    pub fn verb(&self) -> Verb {
        match self {
            Self::DeleteSession | Self::ReleaseActions => Verb::Delete,

            Self::ElementText { .. }
            | Self::ElementAttribute { .. }
            | Self::ElementRect { .. }
            | Self::ElementDisplayed { .. }
            | Self::ElementEnabled { .. }
            | Self::WindowRect
            | Self::Screenshot
            | Self::GetContexts
            | Self::GetContext
            | Self::GetOrientation => Verb::Get,

            _ => Verb::Post,
        }
    }

    /// Returns the endpoint path relative to `/session/{id}`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        match self {
            Self::DeleteSession => String::new(),
            Self::Navigate { .. } => "url".to_string(),
            Self::FindElement { .. } => "element".to_string(),
            Self::FindElements { .. } => "elements".to_string(),
            Self::ElementClick { element } => format!("element/{element}/click"),
            Self::ElementClear { element } => format!("element/{element}/clear"),
            Self::ElementSendKeys { element, .. } => format!("element/{element}/value"),
            Self::ElementText { element } => format!("element/{element}/text"),
            Self::ElementAttribute { element, name } => {
                format!("element/{element}/attribute/{name}")
            }
            Self::ElementRect { element } => format!("element/{element}/rect"),
            Self::ElementDisplayed { element } => format!("element/{element}/displayed"),
            Self::ElementEnabled { element } => format!("element/{element}/enabled"),
            Self::WindowRect => "window/rect".to_string(),
            Self::PerformActions { .. } | Self::ReleaseActions => "actions".to_string(),
            Self::Screenshot => "screenshot".to_string(),
            Self::SetTimeouts { .. } => "timeouts".to_string(),
            Self::ActivateApp { .. } => "appium/device/activate_app".to_string(),
            Self::TerminateApp { .. } => "appium/device/terminate_app".to_string(),
            Self::InstallApp { .. } => "appium/device/install_app".to_string(),
            Self::RemoveApp { .. } => "appium/device/remove_app".to_string(),
            Self::IsAppInstalled { .. } => "appium/device/app_installed".to_string(),
            Self::BackgroundApp { .. } => "appium/app/background".to_string(),
            Self::Lock { .. } => "appium/device/lock".to_string(),
            Self::PressKey { .. } => "appium/device/press_keycode".to_string(),
            Self::GetContexts => "contexts".to_string(),
            Self::GetContext | Self::SetContext { .. } => "context".to_string(),
            Self::GetOrientation | Self::SetOrientation { .. } => "orientation".to_string(),
        }
    }

    /// Returns the JSON request body, if the verb carries one.
    #[must_use]
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Navigate { url } => Some(json!({ "url": url })),
            Self::FindElement { using, value } | Self::FindElements { using, value } => {
                Some(json!({ "using": using, "value": value }))
            }
            Self::ElementClick { .. } | Self::ElementClear { .. } => Some(json!({})),
            Self::ElementSendKeys { text, .. } => Some(json!({ "text": text })),
            Self::PerformActions { actions } => Some(json!({ "actions": actions })),
            Self::SetTimeouts { implicit_ms } => Some(json!({ "implicit": implicit_ms })),
            Self::ActivateApp { app_id } | Self::TerminateApp { app_id } => {
                Some(json!({ "appId": app_id }))
            }
            Self::InstallApp { path } => Some(json!({ "appPath": path })),
            Self::RemoveApp { app_id } => Some(json!({ "appId": app_id })),
            Self::IsAppInstalled { app_id } => Some(json!({ "bundleId": app_id })),
            Self::BackgroundApp { seconds } => Some(json!({
                "seconds": seconds.map_or(-1, |s| s as i64)
            })),
            Self::Lock { seconds } => Some(json!({ "seconds": seconds })),
            Self::PressKey { keycode } => Some(json!({ "keycode": keycode })),
            Self::SetContext { name } => Some(json!({ "name": name })),
            Self::SetOrientation { orientation } => {
                Some(json!({ "orientation": orientation.as_str() }))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Response Envelope
// ============================================================================

/// W3C response envelope: every response wraps its payload in `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse {
    /// Response payload (command-specific shape).
    pub value: Value,
}

/// Extracts the element ID from a find-element response value.
#[must_use]
pub fn parse_element_ref(value: &Value) -> Option<ElementId> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(ElementId::from)
}

/// Extracts a W3C error payload, if the response value is one.
///
/// Error responses carry `{"error": code, "message": text, ...}`.
#[must_use]
pub fn parse_wire_error(value: &Value) -> Option<(String, String)> {
    let error = value.get("error")?.as_str()?.to_string();
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((error, message))
}

// ============================================================================
// Tests
// ============================================================================
