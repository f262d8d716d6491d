//! appdriver - Appium-compatible mobile automation client.
//!
//! This library drives Android and iOS apps through an Appium server
//! speaking the W3C WebDriver wire protocol over HTTP.
//!
//! # Architecture
//!
//! The client follows a session-per-context model:
//!
//! - **[`SessionManager`]**: Resolves configuration into capabilities and
//!   keys live sessions by [`ContextId`], so concurrent scenarios never
//!   share a device
//! - **[`Session`]**: One remote automation session; element lookup, app
//!   lifecycle, contexts, orientation, screenshots
//! - **[`Wait`]** / **[`Gestures`]** / **[`RetryPolicy`]**: Polling,
//!   touch input, and flake budgets layered on top of the session
//!
//! Key design principles:
//!
//! - Platform is a closed union ([`Platform`]); invalid names fail at the
//!   parse boundary, everything past it is infallible
//! - All remote I/O goes through one transport seam ([`transport::Wire`]),
//!   so session logic is testable without a device
//! - Sessions quit exactly once, no matter how many handles exist
//!
//! # Quick Start
//!
//! ```no_run
//! use appdriver::config::{AppRegistry, Settings};
//! use appdriver::{By, Config, ContextId, Gestures, Result, SessionManager, Wait};
//! use appdriver::touch::Direction;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::new(Config::load_environment("config", "staging")?)
//!         .with_override("platform", "android")
//!         .with_override("app", "demo");
//!     let registry = AppRegistry::load("config/apps.yaml")?;
//!     let manager = SessionManager::new(settings, registry)?;
//!
//!     let ctx = ContextId::new();
//!     let session = manager.create_from_environment(ctx).await?;
//!
//!     // Wait, interact, swipe
//!     let login = Wait::from_session(&session)
//!         .until_clickable(&session, By::accessibility_id("login"))
//!         .await?;
//!     login.click().await?;
//!     Gestures::new(&session).swipe(Direction::Left).await?;
//!
//!     manager.teardown(ctx).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`capabilities`] | [`Platform`] union and capability resolution |
//! | [`config`] | Layered configuration, [`config::Settings`], app registry |
//! | [`element`] | Remote element handles and geometry |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`locator`] | Locator strategies ([`By`]) |
//! | [`protocol`] | Wire command/response types (internal shape) |
//! | [`retry`] | Per-scenario retry budgets |
//! | [`session`] | Session handle and per-context registry |
//! | [`touch`] | W3C pointer tracks and gestures |
//! | [`transport`] | HTTP transport layer |
//! | [`wait`] | Bounded condition polling |

// ============================================================================
// Modules
// ============================================================================

/// Platform union and capability resolution.
///
/// [`CapabilityBuilder`] merges registry entries, selector overrides, and
/// explicit values into a W3C capability map.
pub mod capabilities;

/// Layered configuration, runtime settings, and the app registry.
///
/// [`Config`] merges environment files over defaults;
/// [`config::Settings`] layers flat launcher overrides on top.
pub mod config;

/// Remote element handles and geometry.
pub mod element;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for sessions, elements, and contexts.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Locator strategies.
///
/// [`By`] covers the closed strategy set; unknown strategy names fail at
/// construction.
pub mod locator;

/// Wire protocol command and response types.
///
/// Defines the verb/endpoint/body mapping for every supported command.
pub mod protocol;

/// Per-scenario retry budgets.
pub mod retry;

/// Session handle and the per-context session registry.
pub mod session;

/// W3C pointer tracks and high-level gestures.
pub mod touch;

/// HTTP transport layer.
///
/// [`transport::Wire`] is the seam between session logic and the network.
pub mod transport;

/// Bounded condition polling.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Capability types
pub use capabilities::{Capabilities, CapabilityBuilder, Platform};

// Configuration types
pub use config::{AppRegistry, Config, Settings};

// Element types
pub use element::{Element, Point, Rect};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ContextId, ElementId, SessionId};

// Locator types
pub use locator::By;

// Protocol types
pub use protocol::Orientation;

// Retry types
pub use retry::RetryPolicy;

// Session types
pub use session::{Session, SessionManager};

// Touch types
pub use touch::{Direction, GestureConfig, Gestures, PointerTrack};

// Wait types
pub use wait::Wait;
