//! Collects a multipart admin form into text fields and files.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};

use crate::error::AppError;
use crate::services::UploadedFile;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn form_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// A fully buffered multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Read every part of the request body.
    ///
    /// Parts with a filename are treated as files, even when empty (a file
    /// input with nothing selected still sends a part).
    ///
    /// # Errors
    ///
    /// Returns `AppError::PayloadTooLarge` if the body exceeds the upload
    /// limit and `AppError::BadRequest` if it is malformed.
    pub async fn collect(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(form_error)?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_owned) {
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(form_error)?;
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(form_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, trimmed. Missing fields read as empty.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", |v| v.trim())
    }

    /// A non-empty text field, or `fallback`.
    #[must_use]
    pub fn text_or(&self, name: &str, fallback: &str) -> String {
        let value = self.text(name);
        let chosen = if value.is_empty() { fallback } else { value };
        chosen.to_owned()
    }

    /// A file part, including empty ones.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// A file part that actually carries data.
    #[must_use]
    pub fn selected_file(&self, name: &str) -> Option<&UploadedFile> {
        self.file(name).filter(|file| !file.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_owned(), value.to_owned());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.insert(name.to_owned(), file);
        self
    }
}
