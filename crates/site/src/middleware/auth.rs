//! Authentication extractors for the admin area.
//!
//! Both extractors resolve the session fully before the handler runs, so a
//! handler never sees an unresolved [`SessionState`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::models::AdminSession;
use crate::services::gate::{self, GateDecision, GatedRoute, SessionState};

/// Neutral placeholder rendered while the gate can't decide.
#[derive(Template, WebTemplate)]
#[template(path = "loading.html")]
pub struct LoadingTemplate;

/// Extractor that requires an authenticated admin.
///
/// Anonymous visitors are redirected to the login page.
///
/// ```rust,ignore
/// async fn dashboard(RequireAdminAuth(admin): RequireAdminAuth) -> impl IntoResponse {
///     format!("Welcome, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminSession);

/// Rejection for [`RequireAdminAuth`].
#[derive(Debug)]
pub enum AdminAuthRejection {
    Redirect(&'static str),
    Loading,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(target) => Redirect::to(target).into_response(),
            Self::Loading => LoadingTemplate.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = gate::resolve_session(parts.extensions.get::<Session>(), Utc::now()).await;

        match gate::decide(state, GatedRoute::Protected, request_path(parts)) {
            GateDecision::Allow(admin) => Ok(Self(admin)),
            GateDecision::Redirect(target) => Err(AdminAuthRejection::Redirect(target)),
            GateDecision::Loading | GateDecision::ShowLogin => Err(AdminAuthRejection::Loading),
        }
    }
}

/// The full request path, including any prefix stripped by `Router::nest`.
pub fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.path())
}

/// Extractor that resolves the admin session without rejecting.
pub struct OptionalAdminAuth(pub SessionState);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            gate::resolve_session(parts.extensions.get::<Session>(), Utc::now()).await,
        ))
    }
}
