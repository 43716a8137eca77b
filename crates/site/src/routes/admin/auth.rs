//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{CspNonce, LoadingTemplate, OptionalAdminAuth, login_rate_limiter};
use crate::routes::layout::PageContext;
use crate::services::AuthError;
use crate::services::gate::{self, DASHBOARD_PATH, GateDecision, GatedRoute, LOGIN_PATH};
use crate::state::AppState;

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub error: Option<&'static str>,
}

/// Login form data. The password is never logged or stored.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Render the login page, or send a signed-in admin to the dashboard.
///
/// GET /admin/login
#[instrument(skip_all)]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    OriginalUri(uri): OriginalUri,
    OptionalAdminAuth(session_state): OptionalAdminAuth,
) -> Response {
    match gate::decide(session_state, GatedRoute::Login, uri.path()) {
        GateDecision::ShowLogin => LoginTemplate {
            page: PageContext::load(&state, session, nonce).await,
            email: String::new(),
            error: None,
        }
        .into_response(),
        GateDecision::Redirect(target) => Redirect::to(target).into_response(),
        GateDecision::Loading | GateDecision::Allow(_) => LoadingTemplate.into_response(),
    }
}

/// Check credentials and open an admin session.
///
/// POST /admin/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state
        .auth()
        .authenticate(&form.email, &form.password, Utc::now())
    {
        Ok(admin) => {
            gate::establish(&session, &admin).await?;
            set_sentry_user(&admin.subject, admin.email.as_str());
            tracing::info!(subject = %admin.subject, "Admin signed in");
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Rejected admin login attempt");
            let template = LoginTemplate {
                page: PageContext::load(&state, session, nonce).await,
                email: form.email.trim().to_owned(),
                error: Some(INVALID_CREDENTIALS_MESSAGE),
            };
            Ok((StatusCode::UNAUTHORIZED, template).into_response())
        }
    }
}

/// End the admin session. Site settings stay in the visitor's session.
///
/// POST /admin/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    gate::terminate(&session).await?;
    clear_sentry_user();
    tracing::info!("Admin signed out");
    Ok(Redirect::to(LOGIN_PATH))
}

/// Login and logout routes, relative to `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(login_page).merge(post(login).layer(login_rate_limiter())),
        )
        .route("/logout", post(logout))
}
