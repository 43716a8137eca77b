//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About the foundation
//! GET  /gallery                - Photo and video gallery
//! GET  /donate                 - Bank and mobile banking details
//! GET  /contact                - Contact form
//! POST /contact                - Submit contact form
//! GET  /health                 - Health check
//! GET  /static/*               - Stylesheet
//!
//! # Admin auth
//! GET  /admin/login            - Login page (redirects to /admin when signed in)
//! POST /admin/login            - Check credentials (rate limited)
//! POST /admin/logout           - End the admin session
//!
//! # Admin (requires auth, otherwise redirects to /admin/login)
//! GET  /admin                                   - Dashboard
//! GET  /admin/site-settings                     - Title, logo and theme form
//! POST /admin/site-settings                     - Save (multipart)
//! GET  /admin/payment-methods                   - Payment details form
//! POST /admin/payment-methods                   - Save (multipart)
//! GET  /admin/media-management                  - Media library
//! POST /admin/media-management/upload           - Upload photo or video (multipart)
//! POST /admin/media-management/{id}/delete      - Remove an item
//! GET  /admin/contact-submissions               - Inbox, newest first
//! GET  /admin/contact-submissions/{id}          - Single submission
//! POST /admin/contact-submissions/{id}/delete   - Delete a submission
//! ```

pub mod admin;
pub mod contact;
pub mod home;
pub mod layout;
pub mod pages;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the site.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(pages::router())
        .merge(contact::router())
        .nest("/admin", admin::router(max_upload_bytes))
}
