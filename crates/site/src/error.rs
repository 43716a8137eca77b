//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`.
//! Errors a visitor can fix (bad credentials, quota, invalid form input) are
//! rendered inline by the handlers and only reach `AppError` when a handler
//! has no form to show them on.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{SettingsError, UploadError};

/// Guidance shown when an upload or settings write is too big to keep.
pub const STORAGE_LIMIT_MESSAGE: &str = "Storage limit reached. Try a smaller image.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings write failed.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Upload rejected.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Request body exceeded the upload limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::Settings(SettingsError::Session(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Settings(SettingsError::Session(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Settings(SettingsError::StorageQuotaExceeded { .. }) | Self::PayloadTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Upload(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Settings(SettingsError::Session(_)) => {
                "Internal server error".to_string()
            }
            Self::Settings(SettingsError::StorageQuotaExceeded { .. }) | Self::PayloadTooLarge => {
                STORAGE_LIMIT_MESSAGE.to_string()
            }
            Self::Upload(err) => err.to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in admin.
pub fn set_sentry_user(subject: &str, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(subject.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the admin.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("submission".to_string());
        assert_eq!(err.to_string(), "Not found: submission");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Settings(SettingsError::StorageQuotaExceeded {
                needed: 10,
                quota: 5
            })),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AppError::Upload(UploadError::NoFileSelected)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::PayloadTooLarge),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
