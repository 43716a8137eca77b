//! Contact form input and validated submissions.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::SubmissionId;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]*[(]{0,1}[0-9]{1,4}[)]{0,1}[-\s\./0-9]*$")
        .expect("phone pattern is a valid regex")
});

const NAME_LEN: (usize, usize) = (2, 100);
const PHONE_LEN: (usize, usize) = (10, 15);
const MESSAGE_LEN: (usize, usize) = (10, 1000);

/// A single field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Errors from validating a [`ContactForm`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactFormError {
    /// One or more fields are invalid. Holds at most one error per field.
    #[error("contact form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

impl ContactFormError {
    /// All field errors.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        match self {
            Self::Invalid(fields) => fields,
        }
    }

    /// The message for a given field, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.fields()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

/// Raw contact form input as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Validate the form, producing a timestamped submission.
    ///
    /// Name and message are trimmed before length checks. An empty phone
    /// number is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ContactFormError::Invalid` listing the first failing rule
    /// of every invalid field.
    pub fn validate(&self, submitted_at: DateTime<Utc>) -> Result<ContactSubmission, ContactFormError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if let Some(message) = check_length(
            name,
            NAME_LEN,
            "Name must be at least 2 characters.",
            "Name must be 100 characters or less.",
        ) {
            errors.push(FieldError {
                field: "name",
                message,
            });
        }

        let email = Email::parse(&self.email).ok();
        if email.is_none() {
            errors.push(FieldError {
                field: "email",
                message: "Please enter a valid email address.",
            });
        }

        let phone = self.phone_number.trim();
        if !phone.is_empty() {
            let message = check_length(
                phone,
                PHONE_LEN,
                "Phone number must be at least 10 digits.",
                "Phone number must be 15 digits or less.",
            )
            .or_else(|| (!PHONE_PATTERN.is_match(phone)).then_some("Invalid phone number format."));
            if let Some(message) = message {
                errors.push(FieldError {
                    field: "phoneNumber",
                    message,
                });
            }
        }

        let body = self.message.trim();
        if let Some(message) = check_length(
            body,
            MESSAGE_LEN,
            "Message must be at least 10 characters.",
            "Message must be 1000 characters or less.",
        ) {
            errors.push(FieldError {
                field: "message",
                message,
            });
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ContactSubmission {
                id: SubmissionId::generate(),
                name: name.to_owned(),
                email,
                phone_number: (!phone.is_empty()).then(|| phone.to_owned()),
                message: body.to_owned(),
                submitted_at,
            }),
            _ => Err(ContactFormError::Invalid(errors)),
        }
    }
}

fn check_length(
    value: &str,
    (min, max): (usize, usize),
    too_short: &'static str,
    too_long: &'static str,
) -> Option<&'static str> {
    let len = value.chars().count();
    if len < min {
        Some(too_short)
    } else if len > max {
        Some(too_long)
    } else {
        None
    }
}

/// A validated message received through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: SubmissionId,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            phone_number: String::new(),
            message: "I have a query regarding donations.".to_string(),
        }
    }

    fn field_message(form: &ContactForm, field: &str) -> Option<&'static str> {
        form.validate(Utc::now()).unwrap_err().message_for(field)
    }

    #[test]
    fn test_valid_form_without_phone() {
        let submission = valid_form().validate(Utc::now()).unwrap();
        assert_eq!(submission.name, "Jane Smith");
        assert_eq!(submission.email.as_str(), "jane.smith@example.com");
        assert_eq!(submission.phone_number, None);
    }

    #[test]
    fn test_valid_form_with_phone() {
        let form = ContactForm {
            phone_number: "+923001234567".to_string(),
            ..valid_form()
        };
        let submission = form.validate(Utc::now()).unwrap();
        assert_eq!(submission.phone_number.as_deref(), Some("+923001234567"));
    }

    #[test]
    fn test_phone_with_separators() {
        let form = ContactForm {
            phone_number: "(123) 456-7890".to_string(),
            ..valid_form()
        };
        assert!(form.validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_name_bounds() {
        let short = ContactForm {
            name: " J ".to_string(),
            ..valid_form()
        };
        assert_eq!(
            field_message(&short, "name"),
            Some("Name must be at least 2 characters.")
        );

        let long = ContactForm {
            name: "a".repeat(101),
            ..valid_form()
        };
        assert_eq!(
            field_message(&long, "name"),
            Some("Name must be 100 characters or less.")
        );

        let exact = ContactForm {
            name: "a".repeat(100),
            ..valid_form()
        };
        assert!(exact.validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let form = ContactForm {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        assert_eq!(
            field_message(&form, "email"),
            Some("Please enter a valid email address.")
        );
    }

    #[test]
    fn test_phone_rules() {
        let short = ContactForm {
            phone_number: "12345".to_string(),
            ..valid_form()
        };
        assert_eq!(
            field_message(&short, "phoneNumber"),
            Some("Phone number must be at least 10 digits.")
        );

        let long = ContactForm {
            phone_number: "1".repeat(16),
            ..valid_form()
        };
        assert_eq!(
            field_message(&long, "phoneNumber"),
            Some("Phone number must be 15 digits or less.")
        );

        let letters = ContactForm {
            phone_number: "call-me-maybe".to_string(),
            ..valid_form()
        };
        assert_eq!(
            field_message(&letters, "phoneNumber"),
            Some("Invalid phone number format.")
        );
    }

    #[test]
    fn test_message_bounds() {
        let short = ContactForm {
            message: "Hi there".to_string(),
            ..valid_form()
        };
        assert_eq!(
            field_message(&short, "message"),
            Some("Message must be at least 10 characters.")
        );

        let long = ContactForm {
            message: "x".repeat(1001),
            ..valid_form()
        };
        assert_eq!(
            field_message(&long, "message"),
            Some("Message must be 1000 characters or less.")
        );
    }

    #[test]
    fn test_reports_every_invalid_field() {
        let err = ContactForm::default().validate(Utc::now()).unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn test_deserializes_browser_field_names() {
        let form: ContactForm = serde_json::from_str(
            r#"{"name":"Ahmed Ali","email":"ahmed.ali@example.com","phoneNumber":"+923001234567","message":"Great work by the foundation!"}"#,
        )
        .unwrap();
        assert_eq!(form.phone_number, "+923001234567");
    }
}
