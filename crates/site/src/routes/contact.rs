//! Contact form route handlers.
//!
//! Validated submissions are handed to the configured [`ContactTransport`]
//! (the admin inbox, or a webhook).
//!
//! [`ContactTransport`]: crate::services::ContactTransport

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::{ContactForm, ContactFormError};

use super::layout::PageContext;
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

const SENT_MESSAGE: &str = "Thank you for contacting us. We will get back to you soon.";
const FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Per-field validation messages shown under each input.
#[derive(Debug, Default)]
pub struct FieldMessages {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone_number: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl From<&ContactFormError> for FieldMessages {
    fn from(err: &ContactFormError) -> Self {
        Self {
            name: err.message_for("name"),
            email: err.message_for("email"),
            phone_number: err.message_for("phoneNumber"),
            message: err.message_for("message"),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactForm,
    pub errors: FieldMessages,
    pub sent: Option<&'static str>,
    pub failed: Option<&'static str>,
}

impl ContactTemplate {
    fn new(page: PageContext) -> Self {
        Self {
            page,
            form: ContactForm::default(),
            errors: FieldMessages::default(),
            sent: None,
            failed: None,
        }
    }
}

/// GET /contact
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> impl IntoResponse {
    ContactTemplate::new(PageContext::load(&state, session, nonce).await)
}

/// POST /contact
///
/// Invalid input re-renders the form with the entered values and a message
/// per failing field. A delivery failure keeps the values so the visitor can
/// retry.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let page = PageContext::load(&state, session, nonce).await;

    let submission = match form.validate(Utc::now()) {
        Ok(submission) => submission,
        Err(err) => {
            tracing::debug!(fields = err.fields().len(), "Contact form rejected");
            let errors = FieldMessages::from(&err);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                ContactTemplate {
                    form,
                    errors,
                    ..ContactTemplate::new(page)
                },
            );
        }
    };

    let id = submission.id;
    match state.transport().submit(submission).await {
        Ok(()) => {
            tracing::info!(submission_id = %id, "Contact submission delivered");
            (
                StatusCode::OK,
                ContactTemplate {
                    sent: Some(SENT_MESSAGE),
                    ..ContactTemplate::new(page)
                },
            )
        }
        Err(e) => {
            tracing::error!(submission_id = %id, error = %e, "Failed to deliver contact submission");
            (
                StatusCode::BAD_GATEWAY,
                ContactTemplate {
                    form,
                    failed: Some(FAILED_MESSAGE),
                    ..ContactTemplate::new(page)
                },
            )
        }
    }
}

/// Create the contact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/contact", get(show).post(submit))
}
