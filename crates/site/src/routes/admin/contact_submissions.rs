//! Admin inbox of contact form submissions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::{ContactSubmission, SubmissionId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, RequireAdminAuth};
use crate::routes::layout::{AdminNav, PageContext};
use crate::state::AppState;

const INDEX_PATH: &str = "/admin/contact-submissions";
const PREVIEW_CHARS: usize = 60;

/// A submission formatted for display.
#[derive(Debug, Clone)]
pub struct SubmissionView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub preview: String,
    pub submitted_at: String,
}

impl From<&ContactSubmission> for SubmissionView {
    fn from(submission: &ContactSubmission) -> Self {
        let preview = if submission.message.chars().count() > PREVIEW_CHARS {
            let head: String = submission.message.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            submission.message.clone()
        };

        Self {
            id: submission.id.to_string(),
            name: submission.name.clone(),
            email: submission.email.to_string(),
            phone: submission
                .phone_number
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            message: submission.message.clone(),
            preview,
            submitted_at: submission
                .submitted_at
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/submissions/index.html")]
pub struct IndexTemplate {
    pub page: PageContext,
    pub nav: AdminNav,
    pub submissions: Vec<SubmissionView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/submissions/show.html")]
pub struct ShowTemplate {
    pub page: PageContext,
    pub nav: AdminNav,
    pub submission: SubmissionView,
}

/// GET /admin/contact-submissions
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> impl IntoResponse {
    let submissions = state
        .inbox()
        .list()
        .await
        .iter()
        .map(SubmissionView::from)
        .collect();

    IndexTemplate {
        page: PageContext::load(&state, session, nonce).await,
        nav: AdminNav::new(admin, "contact-submissions"),
        submissions,
    }
}

/// GET /admin/contact-submissions/{id}
///
/// # Errors
///
/// Returns 404 if the submission doesn't exist.
#[instrument(skip(state, session, nonce, admin))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SubmissionId>,
) -> Result<impl IntoResponse> {
    let submission = state
        .inbox()
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("submission {id}")))?;

    Ok(ShowTemplate {
        page: PageContext::load(&state, session, nonce).await,
        nav: AdminNav::new(admin, "contact-submissions"),
        submission: SubmissionView::from(&submission),
    })
}

/// POST /admin/contact-submissions/{id}/delete
///
/// # Errors
///
/// Returns 404 if the submission doesn't exist.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SubmissionId>,
) -> Result<Redirect> {
    if !state.inbox().delete(id).await {
        return Err(AppError::NotFound(format!("submission {id}")));
    }

    tracing::info!(submission_id = %id, subject = %admin.subject, "Contact submission deleted");
    Ok(Redirect::to(INDEX_PATH))
}

/// Inbox routes, relative to `/admin/contact-submissions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show))
        .route("/{id}/delete", post(delete))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ansar_connect_core::ContactForm;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn submission(phone: &str, message: &str) -> ContactSubmission {
        ContactForm {
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            phone_number: phone.to_string(),
            message: message.to_string(),
        }
        .validate(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap())
        .unwrap()
    }

    #[test]
    fn test_view_formats_fields() {
        let view = SubmissionView::from(&submission("", "Please call me back."));
        assert_eq!(view.phone, "N/A");
        assert_eq!(view.submitted_at, "2024-03-09 14:05 UTC");
        assert_eq!(view.preview, "Please call me back.");
    }

    #[test]
    fn test_long_message_preview_is_truncated() {
        let message = "a".repeat(200);
        let view = SubmissionView::from(&submission("+11234567890", &message));
        assert_eq!(view.preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(view.preview.ends_with("..."));
        assert_eq!(view.phone, "+11234567890");
    }
}
