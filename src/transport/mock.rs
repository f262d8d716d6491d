//! In-process wire double for unit tests.
//!
//! Simulates just enough of the remote end to exercise session lifecycle,
//! waits, and gesture dispatch: a configurable viewport, a set of scripted
//! elements keyed by locator value, and a command log that tests can
//! assert against.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value, json};
use url::Url;

use crate::capabilities::Capabilities;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::{Command, ELEMENT_KEY};

use super::Wire;

// ============================================================================
// MockElement
// ============================================================================

/// A scripted element the mock server can resolve.
#[derive(Debug, Clone)]
pub(crate) struct MockElement {
    /// Server-assigned element ID.
    pub id: String,
    /// Reported visibility.
    pub displayed: bool,
    /// Reported enabled state.
    pub enabled: bool,
    /// Reported text content.
    pub text: String,
    /// Bounding rectangle `(x, y, width, height)`.
    pub rect: (f64, f64, f64, f64),
    /// Number of find calls that miss before the element appears.
    pub found_after: u32,
    /// Number of displayed queries that report false before true.
    pub displayed_after: u32,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            id: "el-1".to_string(),
            displayed: true,
            enabled: true,
            text: String::new(),
            rect: (0.0, 0.0, 100.0, 50.0),
            found_after: 0,
            displayed_after: 0,
        }
    }
}

// ============================================================================
// MockWire
// ============================================================================

/// Scriptable [`Wire`] double.
pub(crate) struct MockWire {
    state: Mutex<MockState>,
}

struct MockState {
    next_session: u64,
    alive: FxHashMap<SessionId, ()>,
    window: (u64, u64),
    elements: FxHashMap<String, MockElement>,
    commands: Vec<(SessionId, Command)>,
    created: Vec<Map<String, Value>>,
    fail_actions: bool,
}

impl MockWire {
    /// Creates a mock with a 1080x1920 viewport and no elements.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_session: 0,
                alive: FxHashMap::default(),
                window: (1080, 1920),
                elements: FxHashMap::default(),
                commands: Vec::new(),
                created: Vec::new(),
                fail_actions: false,
            }),
        }
    }

    /// Sets the viewport size reported by `WindowRect`.
    pub fn with_window(self, width: u64, height: u64) -> Self {
        self.state.lock().window = (width, height);
        self
    }

    /// Registers an element resolvable by locator value.
    pub fn with_element(self, locator_value: impl Into<String>, element: MockElement) -> Self {
        self.state.lock().elements.insert(locator_value.into(), element);
        self
    }

    /// Makes every `PerformActions` dispatch fail.
    pub fn with_failing_actions(self) -> Self {
        self.state.lock().fail_actions = true;
        self
    }

    /// Returns the full command log.
    pub fn commands(&self) -> Vec<(SessionId, Command)> {
        self.state.lock().commands.clone()
    }

    /// Returns every dispatched `PerformActions` payload.
    pub fn performed_actions(&self) -> Vec<Value> {
        self.state
            .lock()
            .commands
            .iter()
            .filter_map(|(_, cmd)| match cmd {
                Command::PerformActions { actions } => Some(actions.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns how many sessions were created.
    pub fn created_sessions(&self) -> usize {
        self.state.lock().created.len()
    }

    /// Returns the capability map of the most recent session.
    pub fn last_capabilities(&self) -> Option<Map<String, Value>> {
        self.state.lock().created.last().cloned()
    }

    /// Returns whether a session is still alive on the remote end.
    pub fn is_alive(&self, session: &SessionId) -> bool {
        self.state.lock().alive.contains_key(session)
    }
}

// ============================================================================
// MockWire - Wire
// ============================================================================

#[async_trait]
impl Wire for MockWire {
    async fn create_session(
        &self,
        _server: &Url,
        capabilities: &Capabilities,
    ) -> Result<SessionId> {
        let mut state = self.state.lock();
        state.next_session += 1;
        let id = SessionId::new(format!("mock-session-{}", state.next_session));
        state.alive.insert(id.clone(), ());
        state.created.push(capabilities.as_map().clone());
        Ok(id)
    }

    async fn execute(&self, _server: &Url, session: &SessionId, command: Command) -> Result<Value> {
        let mut state = self.state.lock();

        if !state.alive.contains_key(session) {
            return Err(Error::remote("invalid session id", "session not started"));
        }
        state.commands.push((session.clone(), command.clone()));

        match command {
            Command::DeleteSession => {
                state.alive.remove(session);
                Ok(Value::Null)
            }

            Command::WindowRect => {
                let (width, height) = state.window;
                Ok(json!({ "x": 0, "y": 0, "width": width, "height": height }))
            }

            Command::FindElement { value, .. } => match state.elements.get_mut(&value) {
                Some(el) if el.found_after > 0 => {
                    el.found_after -= 1;
                    Err(Error::remote("no such element", "not yet rendered"))
                }
                Some(el) => Ok(json!({ ELEMENT_KEY: el.id })),
                None => Err(Error::remote("no such element", "unable to locate")),
            },

            Command::FindElements { value, .. } => match state.elements.get(&value) {
                Some(el) if el.found_after == 0 => Ok(json!([{ ELEMENT_KEY: el.id }])),
                _ => Ok(json!([])),
            },

            Command::ElementDisplayed { element } => {
                let el = find_by_id_mut(&mut state.elements, element.as_str())?;
                if el.displayed_after > 0 {
                    el.displayed_after -= 1;
                    Ok(json!(false))
                } else {
                    Ok(json!(el.displayed))
                }
            }

            Command::ElementEnabled { element } => {
                let el = find_by_id_mut(&mut state.elements, element.as_str())?;
                Ok(json!(el.enabled))
            }

            Command::ElementText { element } => {
                let el = find_by_id_mut(&mut state.elements, element.as_str())?;
                Ok(json!(el.text))
            }

            Command::ElementRect { element } => {
                let el = find_by_id_mut(&mut state.elements, element.as_str())?;
                let (x, y, width, height) = el.rect;
                Ok(json!({ "x": x, "y": y, "width": width, "height": height }))
            }

            Command::ElementAttribute { .. } => Ok(Value::Null),

            Command::PerformActions { .. } => {
                if state.fail_actions {
                    Err(Error::remote("invalid argument", "action sequence rejected"))
                } else {
                    Ok(Value::Null)
                }
            }

            // Base64 PNG header; enough for decode tests.
            Command::Screenshot => Ok(json!("iVBORw0KGgo=")),

            Command::GetContexts => Ok(json!(["NATIVE_APP"])),
            Command::GetContext => Ok(json!("NATIVE_APP")),
            Command::GetOrientation => Ok(json!("PORTRAIT")),
            Command::IsAppInstalled { .. } => Ok(json!(true)),

            _ => Ok(Value::Null),
        }
    }
}

/// Looks up a scripted element by its server-assigned ID.
fn find_by_id_mut<'a>(
    elements: &'a mut FxHashMap<String, MockElement>,
    id: &str,
) -> Result<&'a mut MockElement> {
    elements
        .values_mut()
        .find(|el| el.id == id)
        .ok_or_else(|| Error::remote("stale element reference", "element is gone"))
}
