//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Utc;
use tower_sessions::Session;

use crate::config::SiteConfig;
use crate::services::{
    AuthService, ContactTransport, Inbox, InboxTransport, MediaLibrary, SessionSettingsStore,
    TransportError, WebhookTransport,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    auth: AuthService,
    media: MediaLibrary,
    inbox: Inbox,
    transport: Arc<dyn ContactTransport>,
}

impl AppState {
    /// Create the application state with seeded demo content.
    ///
    /// Contact submissions go to the webhook when `CONTACT_WEBHOOK_URL` is
    /// set and to the in-memory inbox otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook HTTP client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, TransportError> {
        let inbox = Inbox::seeded(Utc::now());
        let transport: Arc<dyn ContactTransport> = match &config.contact_webhook_url {
            Some(url) => {
                tracing::info!(url = %url, "Contact submissions forwarded to webhook");
                Arc::new(WebhookTransport::new(url.clone())?)
            }
            None => Arc::new(InboxTransport::new(inbox.clone(), config.simulated_latency)),
        };

        let media = MediaLibrary::seeded().with_capacity_bytes(config.media_library_bytes);
        Ok(Self::with_parts(config, media, inbox, transport))
    }

    /// Create the application state from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: SiteConfig,
        media: MediaLibrary,
        inbox: Inbox,
        transport: Arc<dyn ContactTransport>,
    ) -> Self {
        let auth = AuthService::new(&config.admin);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                media,
                inbox,
                transport,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn media(&self) -> &MediaLibrary {
        &self.inner.media
    }

    #[must_use]
    pub fn inbox(&self) -> &Inbox {
        &self.inner.inbox
    }

    #[must_use]
    pub fn transport(&self) -> &dyn ContactTransport {
        self.inner.transport.as_ref()
    }

    /// The settings store for the visitor owning `session`.
    #[must_use]
    pub fn settings_for(&self, session: Session) -> SessionSettingsStore {
        SessionSettingsStore::new(session, self.inner.config.settings_quota_bytes)
    }
}
