//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for the theme `<style>` block)
//! 5. Security headers (CSP, frame and isolation policies)
//! 6. Session layer (tower-sessions with an in-memory store)
//! 7. Rate limiting on `POST /admin/login` (governor)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminAuthRejection, LoadingTemplate, OptionalAdminAuth, RequireAdminAuth};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::login_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, SessionKeyError, create_session_layer};
