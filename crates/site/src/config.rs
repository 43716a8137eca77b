//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_SESSION_SECRET` - Session cookie signing secret (min 64 chars, high entropy)
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BASE_URL` - Public URL for the site (default: `http://localhost:3000`)
//! - `SITE_ADMIN_EMAIL` - Allow-listed admin email (default: admin@example.com)
//! - `SITE_ADMIN_PASSWORD` - Allow-listed admin password (default: password)
//! - `SITE_ADMIN_NAME` - Admin display name (default: Admin User)
//! - `SITE_ADMIN_SESSION_HOURS` - Admin session lifetime (default: 24)
//! - `SITE_SETTINGS_QUOTA_BYTES` - Per-visitor settings quota (default: 5 MiB)
//! - `SITE_MAX_UPLOAD_BYTES` - Request body limit for uploads (default: 8 MiB)
//! - `SITE_MEDIA_LIBRARY_BYTES` - Total size of stored gallery media (default: 64 MiB)
//! - `SITE_SIMULATED_LATENCY_MS` - Delay applied by the inbox transport (default: 0)
//! - `SITE_LOG_JSON` - Emit JSON logs when set
//! - `CONTACT_WEBHOOK_URL` - Forward contact submissions to this URL instead of the inbox
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling (default: 1.0 / 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use ansar_connect_core::Email;

/// Cookie signing keys must be at least 64 bytes.
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSWORD: &str = "password";
const DEFAULT_SETTINGS_QUOTA_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;
const DEFAULT_MEDIA_LIBRARY_BYTES: usize = 64 * 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// The single allow-listed admin account
    pub admin: AdminAccountConfig,
    /// Maximum size of one visitor's settings record, in bytes
    pub settings_quota_bytes: usize,
    /// Request body limit for multipart uploads, in bytes
    pub max_upload_bytes: usize,
    /// Capacity of the in-memory gallery library, in bytes
    pub media_library_bytes: usize,
    /// Artificial delay before the inbox accepts a submission
    pub simulated_latency: Duration,
    /// When set, contact submissions are POSTed here
    pub contact_webhook_url: Option<Url>,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 - 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 - 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Credentials for the allow-listed admin.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminAccountConfig {
    pub email: Email,
    pub password: SecretString,
    pub name: String,
    pub session_lifetime: chrono::Duration,
}

impl std::fmt::Debug for AdminAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccountConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("session_lifetime", &self.session_lifetime)
            .finish()
    }
}

impl AdminAccountConfig {
    /// Whether the shipped demo password is still in use.
    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.password.expose_secret() == DEFAULT_ADMIN_PASSWORD
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`SiteConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or_default::<IpAddr>("SITE_HOST", "127.0.0.1")?;
        let port = env.parse_or_default::<u16>("SITE_PORT", "3000")?;
        let base_url = env.get_or_default("SITE_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_BASE_URL".to_string(), e.to_string()))?;

        let session_secret = env.get_required("SITE_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SITE_SESSION_SECRET")?;
        validate_secret_strength(&session_secret, "SITE_SESSION_SECRET")?;

        let admin = AdminAccountConfig::from_env(&env)?;

        let settings_quota_bytes = env.parse_or_default::<usize>(
            "SITE_SETTINGS_QUOTA_BYTES",
            &DEFAULT_SETTINGS_QUOTA_BYTES.to_string(),
        )?;
        let max_upload_bytes = env.parse_or_default::<usize>(
            "SITE_MAX_UPLOAD_BYTES",
            &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
        )?;
        let media_library_bytes = env.parse_or_default::<usize>(
            "SITE_MEDIA_LIBRARY_BYTES",
            &DEFAULT_MEDIA_LIBRARY_BYTES.to_string(),
        )?;
        let simulated_latency =
            Duration::from_millis(env.parse_or_default::<u64>("SITE_SIMULATED_LATENCY_MS", "0")?);

        let contact_webhook_url = env
            .get_optional("CONTACT_WEBHOOK_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("CONTACT_WEBHOOK_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let log_json = env
            .get_optional("SITE_LOG_JSON")
            .is_some_and(|v| !matches!(v.trim(), "" | "0" | "false"));

        let sentry_dsn = env.get_optional("SENTRY_DSN");
        let sentry_environment = env.get_optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .get_optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .get_optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            base_url,
            session_secret: SecretString::from(session_secret),
            admin,
            settings_quota_bytes,
            max_upload_bytes,
            media_library_bytes,
            simulated_latency,
            contact_webhook_url,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AdminAccountConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw_email = env.get_or_default("SITE_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
        let email = Email::parse(&raw_email).map_err(|e| {
            ConfigError::InvalidEnvVar("SITE_ADMIN_EMAIL".to_string(), e.to_string())
        })?;

        let password = env.get_or_default("SITE_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD);
        if password.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SITE_ADMIN_PASSWORD".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let hours = env.parse_or_default::<u32>("SITE_ADMIN_SESSION_HOURS", "24")?;
        if hours == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SITE_ADMIN_SESSION_HOURS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            email,
            password: SecretString::from(password),
            name: env.get_or_default("SITE_ADMIN_NAME", "Admin User"),
            session_lifetime: chrono::Duration::hours(i64::from(hours)),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the loaders.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required environment variable.
    fn get_required(&self, key: &str) -> Result<String, ConfigError> {
        self.get_optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional environment variable. Empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to `default` when unset.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Check a candidate session secret without loading the rest of the config.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the secret is too short, looks
/// like a placeholder, or has low entropy.
pub fn check_session_secret(secret: &str) -> Result<(), ConfigError> {
    validate_session_secret(secret, "SITE_SESSION_SECRET")?;
    validate_secret_strength(secret, "SITE_SESSION_SECRET")
}
