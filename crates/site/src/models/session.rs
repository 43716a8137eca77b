//! Session-related types for admin authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ansar_connect_core::Email;

/// Session-stored admin identity.
///
/// Created on a successful credential check and never mutated afterwards.
/// Logging out or expiry removes it from the session entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Opaque subject identifier.
    pub subject: String,
    /// Display name.
    pub name: String,
    pub email: Email,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the visitor's settings record.
    pub const SITE_SETTINGS: &str = "site_settings";
}
