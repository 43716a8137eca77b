//! Session middleware configuration.
//!
//! Sessions are kept in an in-memory store and identified by a signed
//! cookie. The session holds both the admin login and the visitor's settings
//! record, so its lifetime is long; admin logins carry their own shorter
//! expiry.

use secrecy::ExposeSecret;
use tower_sessions::cookie::{Key, SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ac_session";

/// Session inactivity expiry (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Error creating the session layer.
#[derive(Debug, thiserror::Error)]
#[error("invalid session signing key: {0}")]
pub struct SessionKeyError(#[from] tower_sessions::cookie::KeyError);

/// Create the session layer over `store`, signing cookies with the session secret.
///
/// # Errors
///
/// Returns `SessionKeyError` if the secret is too short to derive a signing key.
pub fn create_session_layer(
    store: MemoryStore,
    config: &SiteConfig,
) -> Result<SessionManagerLayer<MemoryStore, SignedCookie>, SessionKeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
