//! Ansar Connect site library.
//!
//! The public website and admin panel for the Ansar Ali Foundation, exposed
//! as a library so the router can be driven from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_sessions::MemoryStore;

use crate::middleware::{
    SessionKeyError, create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router with its session and security middleware.
///
/// Tracing and Sentry layers are added by the binary.
///
/// # Errors
///
/// Returns `SessionKeyError` if the session secret can't be used as a
/// cookie signing key.
pub fn app(state: AppState) -> Result<Router, SessionKeyError> {
    let session_layer = create_session_layer(MemoryStore::default(), state.config())?;
    let max_upload_bytes = state.config().max_upload_bytes;

    Ok(Router::new()
        .route("/health", get(health))
        .merge(routes::routes(max_upload_bytes))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        // Nonce must exist before security headers read it
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
