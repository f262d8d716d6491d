//! Context-scoped session registry.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{info, warn};
use url::Url;

use crate::capabilities::{Capabilities, CapabilityBuilder, Platform};
use crate::config::registry::AppRegistry;
use crate::config::settings::{
    SELECTOR_APP, SELECTOR_APP_PATH, SELECTOR_DEVICE_NAME, SELECTOR_PLATFORM,
    SELECTOR_PLATFORM_VERSION, Settings,
};
use crate::error::{Error, Result};
use crate::identifiers::ContextId;
use crate::protocol::Command;
use crate::session::Session;
use crate::transport::{HttpWire, Wire};

// ============================================================================
// SessionManager
// ============================================================================

/// Creates sessions and tracks them per execution context.
///
/// Each [`ContextId`] owns at most one live session; contexts never see each
/// other's sessions. The only state shared across contexts is the read-only
/// [`Settings`] and [`AppRegistry`].
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    settings: Arc<Settings>,
    registry: AppRegistry,
    wire: Arc<dyn Wire>,
    sessions: RwLock<FxHashMap<ContextId, Session>>,
}

impl SessionManager {
    /// Creates a manager backed by the HTTP transport.
    pub fn new(settings: Settings, registry: AppRegistry) -> Result<Self> {
        let wire = Arc::new(HttpWire::new()?);
        Ok(Self::with_wire(settings, registry, wire))
    }

    pub(crate) fn with_wire(
        settings: Settings,
        registry: AppRegistry,
        wire: Arc<dyn Wire>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                settings: Arc::new(settings),
                registry,
                wire,
                sessions: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// Returns the settings the manager resolves sessions against.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    // ------------------------------------------------------------------
    // Session creation
    // ------------------------------------------------------------------

    /// Creates a session for `ctx` from the environment selectors.
    ///
    /// Requires the `platform` and `app` selectors; looks the app up in the
    /// registry, applies the device/version/app-path selector overrides,
    /// and connects to the overridden or configured server URL.
    pub async fn create_from_environment(&self, ctx: ContextId) -> Result<Session> {
        let settings = &self.inner.settings;

        let platform: Platform = settings
            .selector(SELECTOR_PLATFORM)
            .ok_or_else(|| Error::missing_selector(SELECTOR_PLATFORM))?
            .parse()?;
        let app = settings
            .selector(SELECTOR_APP)
            .ok_or_else(|| Error::missing_selector(SELECTOR_APP))?;

        let entry = self.inner.registry.platform_entry(app, platform)?;
        let app_id = AppRegistry::app_id(entry, platform);

        let mut builder = CapabilityBuilder::new().platform(platform).from_registry(entry);
        if let Some(device) = settings.selector(SELECTOR_DEVICE_NAME) {
            builder = builder.device_name(device);
        }
        if let Some(version) = settings.selector(SELECTOR_PLATFORM_VERSION) {
            builder = builder.platform_version(version);
        }
        if let Some(path) = settings.selector(SELECTOR_APP_PATH) {
            builder = builder.app(path);
        }
        let capabilities = builder.build()?;

        let server = settings.server_url();
        self.bind(ctx, capabilities, &server, app_id).await
    }

    /// Creates a session for `ctx` with explicit device coordinates.
    pub async fn create(
        &self,
        ctx: ContextId,
        platform: Platform,
        device_name: impl Into<String>,
        platform_version: impl Into<String>,
        server: &str,
    ) -> Result<Session> {
        let capabilities = CapabilityBuilder::new()
            .platform(platform)
            .device_name(device_name)
            .platform_version(platform_version)
            .build()?;
        self.bind(ctx, capabilities, server, None).await
    }

    /// Creates a session for `ctx` installing the app binary at `app_path`.
    pub async fn create_with_app(
        &self,
        ctx: ContextId,
        platform: Platform,
        device_name: impl Into<String>,
        platform_version: impl Into<String>,
        app_path: impl Into<String>,
        server: &str,
    ) -> Result<Session> {
        let capabilities = CapabilityBuilder::new()
            .platform(platform)
            .device_name(device_name)
            .platform_version(platform_version)
            .app(app_path)
            .build()?;
        self.bind(ctx, capabilities, server, None).await
    }

    /// Creates a session for `ctx` from fully resolved capabilities.
    pub async fn create_with_capabilities(
        &self,
        ctx: ContextId,
        capabilities: Capabilities,
        server: &str,
    ) -> Result<Session> {
        self.bind(ctx, capabilities, server, None).await
    }

    async fn bind(
        &self,
        ctx: ContextId,
        capabilities: Capabilities,
        server: &str,
        app_id: Option<String>,
    ) -> Result<Session> {
        let server: Url = Url::parse(server).map_err(|_| Error::invalid_server_url(server))?;

        info!(
            context_id = %ctx,
            platform = %capabilities.platform(),
            server = %server,
            "creating session"
        );
        let session_id = self
            .inner
            .wire
            .create_session(&server, &capabilities)
            .await?;

        let session = Session::bind(
            session_id,
            server,
            capabilities.platform(),
            app_id,
            Arc::clone(&self.inner.wire),
            self.inner.settings.explicit_timeout(),
        );

        let implicit_ms = self.inner.settings.implicit_timeout().as_millis() as u64;
        if let Err(error) = session
            .execute(Command::SetTimeouts { implicit_ms })
            .await
        {
            // A session that rejects its timeouts is unusable; do not leak it.
            if let Err(quit_error) = session.quit().await {
                warn!(session_id = %session.id(), %quit_error, "failed to quit broken session");
            }
            return Err(error);
        }

        let previous = self.inner.sessions.write().insert(ctx, session.clone());
        if let Some(stale) = previous {
            warn!(context_id = %ctx, session_id = %stale.id(), "replacing live session");
            if let Err(error) = stale.quit().await {
                warn!(context_id = %ctx, %error, "failed to quit replaced session");
            }
        }

        info!(context_id = %ctx, session_id = %session.id(), "session created");
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Lookup and teardown
    // ------------------------------------------------------------------

    /// Returns the session bound to `ctx`, if any. Never creates.
    #[must_use]
    pub fn current(&self, ctx: ContextId) -> Option<Session> {
        self.inner.sessions.read().get(&ctx).cloned()
    }

    /// Quits and unbinds the session for `ctx`. A context without a
    /// session is a no-op.
    pub async fn teardown(&self, ctx: ContextId) -> Result<()> {
        let session = self.inner.sessions.write().remove(&ctx);
        match session {
            Some(session) => {
                info!(context_id = %ctx, session_id = %session.id(), "tearing down session");
                session.quit().await
            }
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
