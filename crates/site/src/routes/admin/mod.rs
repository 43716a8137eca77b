//! Admin panel routes.
//!
//! Everything except the login and logout endpoints requires
//! [`RequireAdminAuth`](crate::middleware::RequireAdminAuth).

pub mod auth;
pub mod contact_submissions;
pub mod dashboard;
pub mod media;
pub mod multipart;
pub mod payment_methods;
pub mod site_settings;

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::state::AppState;

/// Build the admin router, mounted at `/admin`.
///
/// `max_upload_bytes` bounds the multipart forms (logo, QR code, media).
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    let uploads = Router::new()
        .route(
            "/site-settings",
            get(site_settings::show).post(site_settings::save),
        )
        .route(
            "/payment-methods",
            get(payment_methods::show).post(payment_methods::save),
        )
        .nest("/media-management", media::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/", get(dashboard::index))
        .merge(auth::router())
        .merge(uploads)
        .nest("/contact-submissions", contact_submissions::router())
}
