//! Per-visitor settings store.
//!
//! Site title, theme colors, payment details and uploaded images live in a
//! flat string-to-string record scoped to one browser. The record survives
//! reloads and logout but is never shared across visitors or devices.
//!
//! [`SettingsStore`] is the port. [`SessionSettingsStore`] keeps the record in
//! the visitor's session; [`MemorySettingsStore`] keeps it in process memory.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tower_sessions::Session;

use ansar_connect_core::{HslColor, ThemeColors};

use crate::models::session_keys;

/// Record keys.
pub mod keys {
    pub const SITE_TITLE: &str = "siteTitle";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const FOREGROUND_COLOR: &str = "foregroundColor";
    pub const PRIMARY_COLOR: &str = "primaryColor";
    pub const ACCENT_COLOR: &str = "accentColor";
    pub const LOGO_PREVIEW: &str = "logoPreview";

    pub const PM_ACCOUNT_NAME: &str = "pm_accountName";
    pub const PM_ACCOUNT_NUMBER: &str = "pm_accountNumber";
    pub const PM_BANK_NAME: &str = "pm_bankName";
    pub const PM_BRANCH: &str = "pm_branch";
    pub const PM_IFSC_SWIFT: &str = "pm_ifscSwift";
    pub const PM_SERVICE_A: &str = "pm_serviceA";
    pub const PM_SERVICE_B: &str = "pm_serviceB";
    pub const PM_SERVICE_C: &str = "pm_serviceC";
    pub const PM_QR_CODE_PREVIEW: &str = "pm_qrCodePreview";
}

/// Values shown when a key has never been written.
pub mod defaults {
    pub const SITE_TITLE: &str = "AnsarConnect - Ansar Ali Foundation";
    pub const LOGO_URL: &str = "https://placehold.co/150x50.png?text=YourLogo";

    pub const ACCOUNT_NAME: &str = "Ansar Ali Foundation";
    pub const ACCOUNT_NUMBER: &str = "123456789012";
    pub const BANK_NAME: &str = "Charity First Bank";
    pub const BRANCH: &str = "Hope City Main Branch";
    pub const IFSC_SWIFT: &str = "CFBHC01234";
    pub const SERVICE_A: &str = "01XXXXXXXXX (bKash)";
    pub const SERVICE_B: &str = "01YYYYYYYYY (Nagad)";
    pub const SERVICE_C: &str = "01ZZZZZZZZZ (Rocket)";
    pub const QR_CODE_URL: &str = "https://placehold.co/200x200.png?text=QR+Code";
}

/// Errors from writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The write would push the record past the per-visitor quota.
    #[error("settings record would grow to {needed} bytes (quota {quota})")]
    StorageQuotaExceeded { needed: usize, quota: usize },

    /// The session backing the record could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// The stored key-value record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(BTreeMap<String, String>);

impl SettingsRecord {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sum of key and value byte lengths.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.0.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Size the record would have after writing `key`.
    #[must_use]
    pub fn size_with(&self, key: &str, value: &str) -> usize {
        let existing = self.0.get(key).map_or(0, |v| key.len() + v.len());
        self.size_bytes() - existing + key.len() + value.len()
    }

    /// Write `key` unless the result would exceed `quota` bytes.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::StorageQuotaExceeded` and leaves the record
    /// unchanged when the write does not fit.
    pub fn try_insert(&mut self, key: &str, value: &str, quota: usize) -> Result<(), SettingsError> {
        let needed = self.size_with(key, value);
        if needed > quota {
            return Err(SettingsError::StorageQuotaExceeded { needed, quota });
        }
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Client-scoped key-value persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored value for `key`, or `default` when unset or unreadable.
    async fn get(&self, key: &str, default: &str) -> String;

    /// Overwrite `key`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::StorageQuotaExceeded` if the record would grow
    /// past the quota, leaving the previous value in place.
    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;

    /// Write entries one at a time, in order.
    ///
    /// Each write is persisted on its own. There is no rollback: on failure
    /// the entries before the failing one stay written.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<(), SettingsError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Session-backed store
// =============================================================================

/// Settings stored inside the visitor's session.
pub struct SessionSettingsStore {
    session: Session,
    quota: usize,
}

impl SessionSettingsStore {
    #[must_use]
    pub const fn new(session: Session, quota: usize) -> Self {
        Self { session, quota }
    }

    async fn record(&self) -> Result<SettingsRecord, SettingsError> {
        Ok(self
            .session
            .get::<SettingsRecord>(session_keys::SITE_SETTINGS)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl SettingsStore for SessionSettingsStore {
    async fn get(&self, key: &str, default: &str) -> String {
        match self.record().await {
            Ok(record) => record.get(key).unwrap_or(default).to_owned(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read settings record, using default");
                default.to_owned()
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut record = self.record().await?;
        record.try_insert(key, value, self.quota)?;
        self.session
            .insert(session_keys::SITE_SETTINGS, &record)
            .await?;
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Settings stored in process memory.
#[derive(Clone)]
pub struct MemorySettingsStore {
    record: Arc<RwLock<SettingsRecord>>,
    quota: usize,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new(quota: usize) -> Self {
        Self {
            record: Arc::new(RwLock::new(SettingsRecord::default())),
            quota,
        }
    }

    /// A copy of the current record.
    pub async fn snapshot(&self) -> SettingsRecord {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str, default: &str) -> String {
        self.record
            .read()
            .await
            .get(key)
            .unwrap_or(default)
            .to_owned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.record.write().await.try_insert(key, value, self.quota)
    }
}

// =============================================================================
// Typed views
// =============================================================================

/// Site identity and theme, as rendered on every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub title: String,
    pub logo_url: String,
    pub theme: ThemeColors,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: defaults::SITE_TITLE.to_string(),
            logo_url: defaults::LOGO_URL.to_string(),
            theme: ThemeColors::default(),
        }
    }
}

impl SiteSettings {
    pub async fn load(store: &dyn SettingsStore) -> Self {
        let theme = ThemeColors::default();
        let color = |key: &'static str, fallback: HslColor| async move {
            let stored = store.get(key, "").await;
            if stored.is_empty() {
                fallback
            } else {
                HslColor::parse_or_black(&stored)
            }
        };

        Self {
            title: store.get(keys::SITE_TITLE, defaults::SITE_TITLE).await,
            logo_url: store.get(keys::LOGO_PREVIEW, defaults::LOGO_URL).await,
            theme: ThemeColors {
                background: color(keys::BACKGROUND_COLOR, theme.background).await,
                foreground: color(keys::FOREGROUND_COLOR, theme.foreground).await,
                primary: color(keys::PRIMARY_COLOR, theme.primary).await,
                accent: color(keys::ACCENT_COLOR, theme.accent).await,
            },
        }
    }

    /// Entries written when the site settings form is saved.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (keys::SITE_TITLE, self.title.clone()),
            (keys::LOGO_PREVIEW, self.logo_url.clone()),
            (keys::BACKGROUND_COLOR, self.theme.background.to_string()),
            (keys::FOREGROUND_COLOR, self.theme.foreground.to_string()),
            (keys::PRIMARY_COLOR, self.theme.primary.to_string()),
            (keys::ACCENT_COLOR, self.theme.accent.to_string()),
        ]
    }
}

/// Bank and mobile banking details shown on the donate page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSettings {
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
    pub branch: String,
    pub ifsc_swift: String,
    pub service_a: String,
    pub service_b: String,
    pub service_c: String,
    pub qr_code_url: String,
}

impl PaymentSettings {
    pub async fn load(store: &dyn SettingsStore) -> Self {
        Self {
            account_name: store.get(keys::PM_ACCOUNT_NAME, defaults::ACCOUNT_NAME).await,
            account_number: store
                .get(keys::PM_ACCOUNT_NUMBER, defaults::ACCOUNT_NUMBER)
                .await,
            bank_name: store.get(keys::PM_BANK_NAME, defaults::BANK_NAME).await,
            branch: store.get(keys::PM_BRANCH, defaults::BRANCH).await,
            ifsc_swift: store.get(keys::PM_IFSC_SWIFT, defaults::IFSC_SWIFT).await,
            service_a: store.get(keys::PM_SERVICE_A, defaults::SERVICE_A).await,
            service_b: store.get(keys::PM_SERVICE_B, defaults::SERVICE_B).await,
            service_c: store.get(keys::PM_SERVICE_C, defaults::SERVICE_C).await,
            qr_code_url: store
                .get(keys::PM_QR_CODE_PREVIEW, defaults::QR_CODE_URL)
                .await,
        }
    }

    /// Entries written when the payment methods form is saved.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (keys::PM_ACCOUNT_NAME, self.account_name.clone()),
            (keys::PM_ACCOUNT_NUMBER, self.account_number.clone()),
            (keys::PM_BANK_NAME, self.bank_name.clone()),
            (keys::PM_BRANCH, self.branch.clone()),
            (keys::PM_IFSC_SWIFT, self.ifsc_swift.clone()),
            (keys::PM_SERVICE_A, self.service_a.clone()),
            (keys::PM_SERVICE_B, self.service_b.clone()),
            (keys::PM_SERVICE_C, self.service_c.clone()),
            (keys::PM_QR_CODE_PREVIEW, self.qr_code_url.clone()),
        ]
    }
}
