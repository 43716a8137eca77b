//! Admin authentication against a single allow-listed credential.
//!
//! There is no user database. The identifier and secret configured in the
//! environment are the only pair that opens an admin session.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

use ansar_connect_core::Email;

use crate::config::AdminAccountConfig;
use crate::models::AdminSession;

/// Subject identifier issued to the allow-listed admin.
pub const ADMIN_SUBJECT: &str = "1";

/// Errors that can occur during admin authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong secret. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Checks submitted credentials and issues [`AdminSession`]s.
#[derive(Clone)]
pub struct AuthService {
    email: Email,
    password: SecretString,
    name: String,
    session_lifetime: chrono::Duration,
}

impl AuthService {
    #[must_use]
    pub fn new(account: &AdminAccountConfig) -> Self {
        Self {
            email: account.email.clone(),
            password: account.password.clone(),
            name: account.name.clone(),
            session_lifetime: account.session_lifetime,
        }
    }

    /// Check an (identifier, secret) pair against the allow-list.
    ///
    /// The identifier is trimmed and compared case-insensitively. Both
    /// comparisons run in constant time and are always evaluated, so timing
    /// does not reveal which half was wrong.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for any pair other than the
    /// configured one.
    pub fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, AuthError> {
        let identifier = identifier.trim().to_lowercase();

        let email_matches = identifier.as_bytes().ct_eq(self.email.as_str().as_bytes());
        let password_matches = secret
            .as_bytes()
            .ct_eq(self.password.expose_secret().as_bytes());

        if !bool::from(email_matches & password_matches) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AdminSession {
            subject: ADMIN_SUBJECT.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            issued_at: now,
            expires_at: now + self.session_lifetime,
        })
    }
}
