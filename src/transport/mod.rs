//! HTTP wire transport.
//!
//! The automation server is a plain HTTP endpoint; every operation is a
//! synchronous request/response round-trip. [`Wire`] is the seam between
//! session logic and the network: production code uses [`HttpWire`],
//! tests substitute an in-process double.
//!
//! Protocol failures surface as [`crate::Error::Remote`] and are never
//! retried here; retry is a test-level policy owned by the caller.

// ============================================================================
// Submodules
// ============================================================================

/// HTTP client implementation.
mod http;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpWire;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::identifiers::SessionId;
use crate::protocol::Command;

// ============================================================================
// Wire
// ============================================================================

/// Transport seam to the remote automation server.
///
/// Implementations must be safe to share across execution contexts: the
/// same wire instance serves every session concurrently.
#[async_trait]
pub trait Wire: Send + Sync {
    /// Creates a remote session and returns its server-assigned ID.
    async fn create_session(&self, server: &Url, capabilities: &Capabilities)
    -> Result<SessionId>;

    /// Executes a session-scoped command and returns the response value.
    async fn execute(&self, server: &Url, session: &SessionId, command: Command) -> Result<Value>;
}
