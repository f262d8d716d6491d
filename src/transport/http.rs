//! HTTP implementation of the [`Wire`] transport.
//!
//! One shared [`reqwest::Client`] serves all sessions; connection pooling
//! is the client's concern. Server URLs vary per session, so every call
//! takes the target server explicitly.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::capabilities::Capabilities;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::{Command, Verb, WireResponse, parse_wire_error};

use super::Wire;

// ============================================================================
// Constants
// ============================================================================

/// Per-request timeout.
///
/// Generous: session creation installs and launches the app under test,
/// which routinely takes tens of seconds on emulators.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// HttpWire
// ============================================================================

/// HTTP wire client for the W3C/Appium protocol.
pub struct HttpWire {
    /// Shared HTTP client.
    client: reqwest::Client,
}

impl HttpWire {
    /// Creates a wire client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Joins a server base URL with a relative endpoint path.
    fn endpoint(server: &Url, path: &str) -> String {
        let base = server.as_str().trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Sends one request and unwraps the W3C response envelope.
    async fn round_trip(&self, verb: Verb, url: &str, body: Option<Value>) -> Result<Value> {
        trace!(%url, ?verb, "Wire request");

        let request = match verb {
            Verb::Get => self.client.get(url),
            // W3C requires a JSON body on every POST, even when empty.
            Verb::Post => self.client.post(url).json(&body.unwrap_or_else(|| json!({}))),
            Verb::Delete => self.client.delete(url),
        };

        let response = request.send().await?;
        let status = response.status();
        let envelope: WireResponse = response.json().await?;

        if let Some((error, message)) = parse_wire_error(&envelope.value) {
            return Err(Error::remote(error, message));
        }
        if !status.is_success() {
            return Err(Error::remote(
                "unknown error",
                format!("HTTP {status} with no error payload"),
            ));
        }

        Ok(envelope.value)
    }
}

// ============================================================================
// HttpWire - Wire
// ============================================================================

#[async_trait]
impl Wire for HttpWire {
    async fn create_session(
        &self,
        server: &Url,
        capabilities: &Capabilities,
    ) -> Result<SessionId> {
        let url = Self::endpoint(server, "session");
        let body = json!({
            "capabilities": {
                "alwaysMatch": capabilities.as_map(),
                "firstMatch": [{}],
            }
        });

        let value = self.round_trip(Verb::Post, &url, Some(body)).await?;
        let session_id = extract_session_id(&value)?;

        debug!(session_id = %session_id, server = %server, "Remote session created");
        Ok(session_id)
    }

    async fn execute(&self, server: &Url, session: &SessionId, command: Command) -> Result<Value> {
        let path = command.endpoint();
        let prefix = format!("session/{session}");
        let full = if path.is_empty() {
            prefix
        } else {
            format!("{prefix}/{path}")
        };

        let url = Self::endpoint(server, &full);
        self.round_trip(command.verb(), &url, command.body()).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Pulls the session ID out of a new-session response value.
fn extract_session_id(value: &Value) -> Result<SessionId> {
    value
        .get("sessionId")
        .and_then(Value::as_str)
        .map(SessionId::from)
        .ok_or_else(|| {
            Error::remote(
                "session not created",
                format!("new-session response carried no sessionId: {value}"),
            )
        })
}

// ============================================================================
// Tests
// ============================================================================
