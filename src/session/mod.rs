//! Session lifecycle and the per-context registry.
//!
//! A [`Session`] is the handle to one live remote automation session; the
//! [`SessionManager`] creates sessions and keys them by [`ContextId`] so
//! concurrently running scenarios never touch each other's devices.
//!
//! # Example
//!
//! ```no_run
//! use appdriver::config::{AppRegistry, Settings};
//! use appdriver::{Config, ContextId, SessionManager};
//!
//! # async fn demo() -> appdriver::Result<()> {
//! let settings = Settings::new(Config::load("config/default.yaml")?)
//!     .with_override("platform", "android")
//!     .with_override("app", "demo");
//! let registry = AppRegistry::load("config/apps.yaml")?;
//! let manager = SessionManager::new(settings, registry)?;
//!
//! let ctx = ContextId::new();
//! let session = manager.create_from_environment(ctx).await?;
//! // ... drive the app ...
//! manager.teardown(ctx).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`ContextId`]: crate::identifiers::ContextId

// ============================================================================
// Modules
// ============================================================================

mod core;
mod manager;

pub use core::Session;
pub use manager::SessionManager;
