//! About, gallery and donate pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::{MediaItem, MediaKind};

use super::layout::PageContext;
use crate::filters;
use crate::middleware::CspNonce;
use crate::services::PaymentSettings;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub page: PageContext,
    pub photos: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
}

/// Donate page template.
///
/// Bank and mobile banking details come from the visitor's settings record,
/// falling back to the foundation's defaults.
#[derive(Template, WebTemplate)]
#[template(path = "donate.html")]
pub struct DonateTemplate {
    pub page: PageContext,
    pub payment: PaymentSettings,
}

/// GET /about
#[instrument(skip_all)]
pub async fn about(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    AboutTemplate {
        page: PageContext::load(&state, session, nonce).await,
    }
}

/// GET /gallery
#[instrument(skip_all)]
pub async fn gallery(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    GalleryTemplate {
        page: PageContext::load(&state, session, nonce).await,
        photos: state.media().list_kind(MediaKind::Photo).await,
        videos: state.media().list_kind(MediaKind::Video).await,
    }
}

/// GET /donate
#[instrument(skip_all)]
pub async fn donate(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    let store = state.settings_for(session.clone());
    DonateTemplate {
        payment: PaymentSettings::load(&store).await,
        page: PageContext::load(&state, session, nonce).await,
    }
}

/// Create the static pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/gallery", get(gallery))
        .route("/donate", get(donate))
}
