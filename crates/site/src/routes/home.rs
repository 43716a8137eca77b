//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::{MediaItem, MediaKind};

use super::layout::PageContext;
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Photos featured on the home page.
const FEATURED_PHOTOS: usize = 3;

/// A program card on the home page.
pub struct Program {
    pub title: &'static str,
    pub summary: &'static str,
}

const PROGRAMS: &[Program] = &[
    Program {
        title: "Education",
        summary: "Scholarships, school supplies and tutoring for children who would otherwise go without.",
    },
    Program {
        title: "Healthcare",
        summary: "Free medical camps and medicine for families in underserved communities.",
    },
    Program {
        title: "Relief",
        summary: "Food, clean water and shelter when disaster strikes.",
    },
];

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub programs: &'static [Program],
    pub featured: Vec<MediaItem>,
}

/// GET /
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    let mut featured = state.media().list_kind(MediaKind::Photo).await;
    featured.truncate(FEATURED_PHOTOS);

    HomeTemplate {
        page: PageContext::load(&state, session, nonce).await,
        programs: PROGRAMS,
        featured,
    }
}
