//! Configuration checks.
//!
//! Loads the site configuration exactly as the server does at startup, so a
//! deploy can be validated before it is started.

use ansar_connect_site::config::{ConfigError, SiteConfig};

/// Load the configuration from the environment and `.env`, logging a summary.
///
/// # Errors
///
/// Returns the first `ConfigError` the server would fail on.
pub fn check() -> Result<(), ConfigError> {
    let config = SiteConfig::from_env()?;
    report(&config);
    Ok(())
}

fn report(config: &SiteConfig) {
    tracing::info!(
        addr = %config.socket_addr(),
        base_url = %config.base_url,
        secure_cookies = config.is_secure(),
        "Configuration loaded"
    );
    tracing::info!(
        email = %config.admin.email,
        session_hours = config.admin.session_lifetime.num_hours(),
        "Admin account"
    );

    match &config.contact_webhook_url {
        Some(url) => tracing::info!(url = %url, "Contact submissions go to webhook"),
        None => tracing::info!("Contact submissions go to the in-memory inbox"),
    }

    if config.admin.uses_default_password() {
        tracing::warn!("SITE_ADMIN_PASSWORD is the default; change it before deploying");
    }
    if config.sentry_dsn.is_none() {
        tracing::warn!("SENTRY_DSN not set; errors will only be logged");
    }
}
