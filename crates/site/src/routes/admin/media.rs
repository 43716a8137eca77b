//! Gallery media management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::{MediaId, MediaItem, MediaKind, ParseMediaKindError};

use super::multipart::MultipartForm;
use crate::error::{AppError, Result, STORAGE_LIMIT_MESSAGE};
use crate::filters;
use crate::middleware::{CspNonce, RequireAdminAuth};
use crate::routes::layout::{AdminNav, PageContext};
use crate::services::UploadError;
use crate::state::AppState;

const INDEX_PATH: &str = "/admin/media-management";

#[derive(Template, WebTemplate)]
#[template(path = "admin/media.html")]
pub struct MediaTemplate {
    pub page: PageContext,
    pub nav: AdminNav,
    pub items: Vec<MediaItem>,
    pub error: Option<String>,
}

/// GET /admin/media-management
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> impl IntoResponse {
    MediaTemplate {
        page: PageContext::load(&state, session, nonce).await,
        nav: AdminNav::new(admin, "media-management"),
        items: state.media().list().await,
        error: None,
    }
}

/// POST /admin/media-management/upload
///
/// Expects a `kind` field (`photo` or `video`) and a `file` part. Upload
/// problems re-render the library with the reason.
///
/// # Errors
///
/// Returns 400 if the body is malformed or `kind` is unknown.
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
    multipart: Multipart,
) -> Result<Response> {
    let (status, message) = match MultipartForm::collect(multipart).await {
        Ok(form) => {
            let kind: MediaKind = form
                .text("kind")
                .parse()
                .map_err(|e: ParseMediaKindError| AppError::BadRequest(e.to_string()))?;

            let outcome = match form.file("file") {
                Some(file) => state.media().upload(kind, file).await,
                None => Err(UploadError::NoFileSelected),
            };

            match outcome {
                Ok(item) => {
                    tracing::info!(media_id = %item.id, kind = %kind, "Media uploaded");
                    return Ok(Redirect::to(INDEX_PATH).into_response());
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Media upload rejected");
                    let status = match e {
                        UploadError::LibraryFull { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                        _ => StatusCode::BAD_REQUEST,
                    };
                    (status, e.to_string())
                }
            }
        }
        Err(AppError::PayloadTooLarge) => {
            tracing::warn!("Media upload exceeds the request body limit");
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                STORAGE_LIMIT_MESSAGE.to_string(),
            )
        }
        Err(e) => return Err(e),
    };

    let template = MediaTemplate {
        page: PageContext::load(&state, session, nonce).await,
        nav: AdminNav::new(admin, "media-management"),
        items: state.media().list().await,
        error: Some(message),
    };
    Ok((status, template).into_response())
}

/// POST /admin/media-management/{id}/delete
///
/// # Errors
///
/// Returns 404 if the item doesn't exist.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<MediaId>,
) -> Result<Redirect> {
    let item = state
        .media()
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("media item {id}")))?;

    tracing::info!(media_id = %item.id, subject = %admin.subject, "Media item deleted");
    Ok(Redirect::to(INDEX_PATH))
}

/// Media routes, relative to `/admin/media-management`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/{id}/delete", post(delete))
}
