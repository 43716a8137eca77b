//! Donation payment details.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::MediaKind;

use super::multipart::MultipartForm;
use crate::error::{AppError, Result, STORAGE_LIMIT_MESSAGE};
use crate::filters;
use crate::middleware::{CspNonce, RequireAdminAuth};
use crate::models::AdminSession;
use crate::routes::layout::{AdminNav, PageContext};
use crate::services::{PaymentSettings, SettingsError, SettingsStore, UploadError};
use crate::state::AppState;

const SAVED_MESSAGE: &str = "Payment methods saved.";

#[derive(Template, WebTemplate)]
#[template(path = "admin/payment_methods.html")]
pub struct PaymentMethodsTemplate {
    pub page: PageContext,
    pub nav: AdminNav,
    pub payment: PaymentSettings,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

impl PaymentMethodsTemplate {
    async fn load(
        state: &AppState,
        session: Session,
        nonce: CspNonce,
        admin: AdminSession,
        payment: PaymentSettings,
    ) -> Self {
        Self {
            page: PageContext::load(state, session, nonce).await,
            nav: AdminNav::new(admin, "payment-methods"),
            payment,
            notice: None,
            error: None,
        }
    }
}

/// GET /admin/payment-methods
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> impl IntoResponse {
    let payment = PaymentSettings::load(&state.settings_for(session.clone())).await;
    PaymentMethodsTemplate::load(&state, session, nonce, admin, payment).await
}

/// Build the submitted payment details on top of the current ones.
///
/// A blank field or missing QR image keeps the current value, the same rule
/// the site settings form follows for its title and logo.
fn apply_form(
    current: &PaymentSettings,
    form: &MultipartForm,
) -> std::result::Result<PaymentSettings, UploadError> {
    let qr_code_url = match form.selected_file("qrCode") {
        Some(file) => {
            file.ensure_kind(MediaKind::Photo)?;
            file.to_data_url()
        }
        None => current.qr_code_url.clone(),
    };

    Ok(PaymentSettings {
        account_name: form.text_or("accountName", &current.account_name),
        account_number: form.text_or("accountNumber", &current.account_number),
        bank_name: form.text_or("bankName", &current.bank_name),
        branch: form.text_or("branch", &current.branch),
        ifsc_swift: form.text_or("ifscSwift", &current.ifsc_swift),
        service_a: form.text_or("serviceA", &current.service_a),
        service_b: form.text_or("serviceB", &current.service_b),
        service_c: form.text_or("serviceC", &current.service_c),
        qr_code_url,
    })
}

/// POST /admin/payment-methods
///
/// # Errors
///
/// Returns an error if the body is malformed or the session can't be written.
#[instrument(skip_all)]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
    multipart: Multipart,
) -> Result<Response> {
    let store = state.settings_for(session.clone());
    let current = PaymentSettings::load(&store).await;

    let form = match MultipartForm::collect(multipart).await {
        Ok(form) => form,
        Err(AppError::PayloadTooLarge) => {
            tracing::warn!("Payment methods upload exceeds the request body limit");
            let mut template =
                PaymentMethodsTemplate::load(&state, session, nonce, admin, current).await;
            template.error = Some(STORAGE_LIMIT_MESSAGE.to_string());
            return Ok((StatusCode::PAYLOAD_TOO_LARGE, template).into_response());
        }
        Err(e) => return Err(e),
    };

    let updated = match apply_form(&current, &form) {
        Ok(updated) => updated,
        Err(e) => {
            let mut template =
                PaymentMethodsTemplate::load(&state, session, nonce, admin, current).await;
            template.error = Some(e.to_string());
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
    };

    let result = store.set_many(&updated.entries()).await;
    let stored = PaymentSettings::load(&store).await;
    let mut template = PaymentMethodsTemplate::load(&state, session, nonce, admin, stored).await;

    match result {
        Ok(()) => {
            tracing::info!("Payment methods saved");
            template.notice = Some(SAVED_MESSAGE);
            Ok(template.into_response())
        }
        Err(SettingsError::StorageQuotaExceeded { needed, quota }) => {
            tracing::warn!(needed, quota, "Payment methods exceed storage quota");
            template.error = Some(STORAGE_LIMIT_MESSAGE.to_string());
            Ok((StatusCode::PAYLOAD_TOO_LARGE, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
