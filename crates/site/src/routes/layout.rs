//! Data shared by every rendered page.

use tower_sessions::Session;

use crate::middleware::CspNonce;
use crate::models::AdminSession;
use crate::services::SiteSettings;
use crate::state::AppState;

/// Layout data for public pages.
///
/// `nonce` goes on the inline theme `<style>` block in `layouts/base.html`.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub nonce: String,
    pub site: SiteSettings,
}

impl PageContext {
    /// Hydrate the layout from the visitor's settings record.
    pub async fn load(state: &AppState, session: Session, nonce: CspNonce) -> Self {
        let store = state.settings_for(session);
        Self {
            nonce: nonce.0,
            site: SiteSettings::load(&store).await,
        }
    }
}

/// Sidebar data for admin pages, rendered by `layouts/admin.html`.
#[derive(Debug, Clone)]
pub struct AdminNav {
    pub admin: AdminSession,
    /// Sidebar entry to highlight.
    pub active: &'static str,
}

impl AdminNav {
    #[must_use]
    pub const fn new(admin: AdminSession, active: &'static str) -> Self {
        Self { admin, active }
    }
}
