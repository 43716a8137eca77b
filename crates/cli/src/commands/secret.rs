//! Session secret generation.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use ansar_connect_site::config::{ConfigError, MIN_SESSION_SECRET_LENGTH, check_session_secret};

/// 64 random bytes encode to 88 base64 characters.
pub const DEFAULT_SECRET_BYTES: usize = 64;

/// Random output can trip the placeholder blocklist; retry a few times.
const MAX_ATTEMPTS: usize = 8;

/// Errors from generating a secret.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("{bytes} bytes is too short; need at least {min}")]
    TooShort { bytes: usize, min: usize },

    #[error("could not generate an acceptable secret: {0}")]
    Rejected(#[from] ConfigError),
}

/// Generate a random secret that passes the site's session secret checks.
///
/// # Errors
///
/// Returns `SecretError::TooShort` if fewer than 48 bytes are requested and
/// `SecretError::Rejected` if no acceptable secret turned up.
pub fn new_secret(bytes: usize) -> Result<SecretString, SecretError> {
    // base64 expands 3 bytes to 4 characters
    let min = MIN_SESSION_SECRET_LENGTH.div_ceil(4) * 3;
    if bytes < min {
        return Err(SecretError::TooShort { bytes, min });
    }

    let mut buf = vec![0u8; bytes];
    let mut last_error = None;

    for _ in 0..MAX_ATTEMPTS {
        rand::rng().fill_bytes(&mut buf);
        let candidate = STANDARD.encode(&buf);
        match check_session_secret(&candidate) {
            Ok(()) => return Ok(SecretString::from(candidate)),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.map_or_else(
        || SecretError::TooShort { bytes, min },
        SecretError::Rejected,
    ))
}

/// Print a new secret to stdout.
///
/// # Errors
///
/// See [`new_secret`].
#[allow(clippy::print_stdout)]
pub fn generate(bytes: usize) -> Result<(), SecretError> {
    let secret = new_secret(bytes)?;
    tracing::info!(bytes, "Generated session secret; set it as SITE_SESSION_SECRET");
    println!("{}", secret.expose_secret());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_passes_checks() {
        let secret = new_secret(DEFAULT_SECRET_BYTES).unwrap();
        assert_eq!(secret.expose_secret().len(), 88);
        assert!(check_session_secret(secret.expose_secret()).is_ok());
    }

    #[test]
    fn test_secrets_differ() {
        let a = new_secret(DEFAULT_SECRET_BYTES).unwrap();
        let b = new_secret(DEFAULT_SECRET_BYTES).unwrap();
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn test_too_few_bytes() {
        assert!(matches!(
            new_secret(16),
            Err(SecretError::TooShort { bytes: 16, min: 48 })
        ));
    }
}
