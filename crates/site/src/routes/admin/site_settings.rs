//! Site identity and theme settings.
//!
//! Saved values land in the visitor's settings record and flow into every
//! page through [`PageContext`](crate::routes::layout::PageContext).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use ansar_connect_core::{HslColor, MediaKind, ThemeColors};

use super::multipart::MultipartForm;
use crate::error::{AppError, Result, STORAGE_LIMIT_MESSAGE};
use crate::filters;
use crate::middleware::{CspNonce, RequireAdminAuth};
use crate::models::AdminSession;
use crate::routes::layout::{AdminNav, PageContext};
use crate::services::{SettingsError, SettingsStore, SiteSettings};
use crate::state::AppState;

const SAVED_MESSAGE: &str = "Site settings saved.";

/// One HSL color row in the form.
pub struct ColorField {
    /// Form field prefix; inputs are `{name}_h`, `{name}_s` and `{name}_l`.
    pub name: &'static str,
    pub label: &'static str,
    pub value: HslColor,
}

fn color_fields(theme: &ThemeColors) -> Vec<ColorField> {
    vec![
        ColorField {
            name: "background",
            label: "Background",
            value: theme.background,
        },
        ColorField {
            name: "foreground",
            label: "Foreground (text)",
            value: theme.foreground,
        },
        ColorField {
            name: "primary",
            label: "Primary",
            value: theme.primary,
        },
        ColorField {
            name: "accent",
            label: "Accent",
            value: theme.accent,
        },
    ]
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/site_settings.html")]
pub struct SiteSettingsTemplate {
    pub page: PageContext,
    pub nav: AdminNav,
    pub colors: Vec<ColorField>,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

impl SiteSettingsTemplate {
    fn new(page: PageContext, admin: AdminSession) -> Self {
        let colors = color_fields(&page.site.theme);
        Self {
            page,
            nav: AdminNav::new(admin, "site-settings"),
            colors,
            notice: None,
            error: None,
        }
    }
}

/// GET /admin/site-settings
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> impl IntoResponse {
    SiteSettingsTemplate::new(PageContext::load(&state, session, nonce).await, admin)
}

/// Build the submitted settings on top of the current ones.
///
/// An empty title or missing logo keeps the current value. A color
/// component that isn't a number keeps its current value too.
fn apply_form(
    current: &SiteSettings,
    form: &MultipartForm,
) -> std::result::Result<SiteSettings, AppError> {
    let logo_url = match form.selected_file("logo") {
        Some(file) => {
            file.ensure_kind(MediaKind::Photo)?;
            file.to_data_url()
        }
        None => current.logo_url.clone(),
    };

    let color = |name: &str, previous: HslColor| {
        HslColor::from_inputs(
            form.text(&format!("{name}_h")),
            form.text(&format!("{name}_s")),
            form.text(&format!("{name}_l")),
            previous,
        )
    };

    Ok(SiteSettings {
        title: form.text_or("siteTitle", &current.title),
        logo_url,
        theme: ThemeColors {
            background: color("background", current.theme.background),
            foreground: color("foreground", current.theme.foreground),
            primary: color("primary", current.theme.primary),
            accent: color("accent", current.theme.accent),
        },
    })
}

/// POST /admin/site-settings
///
/// Writes every entry in turn. When the quota runs out part-way, the form
/// is re-rendered from what was actually stored.
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
    let form = match MultipartForm::collect(multipart).await {
        Ok(form) => form,
        Err(AppError::PayloadTooLarge) => {
            tracing::warn!("Site settings upload exceeds the request body limit");
            let mut template =
                SiteSettingsTemplate::new(PageContext::load(&state, session, nonce).await, admin);
            template.error = Some(STORAGE_LIMIT_MESSAGE.to_string());
            return Ok((StatusCode::PAYLOAD_TOO_LARGE, template).into_response());
        }
        Err(e) => return Err(e),
    };
    let store = state.settings_for(session.clone());
    let current = SiteSettings::load(&store).await;

    let updated = match apply_form(&current, &form) {
        Ok(updated) => updated,
        Err(AppError::Upload(e)) => {
            let mut template =
                SiteSettingsTemplate::new(PageContext::load(&state, session, nonce).await, admin);
            template.error = Some(e.to_string());
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
        Err(e) => return Err(e),
    };

    let result = store.set_many(&updated.entries()).await;
    let mut template =
        SiteSettingsTemplate::new(PageContext::load(&state, session, nonce).await, admin);

    match result {
        Ok(()) => {
            tracing::info!("Site settings saved");
            template.notice = Some(SAVED_MESSAGE);
            Ok(template.into_response())
        }
        Err(SettingsError::StorageQuotaExceeded { needed, quota }) => {
            tracing::warn!(needed, quota, "Site settings exceed storage quota");
            template.error = Some(STORAGE_LIMIT_MESSAGE.to_string());
            Ok((StatusCode::PAYLOAD_TOO_LARGE, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
