//! Core types for AnsarConnect.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod contact;
pub mod email;
pub mod id;
pub mod media;

pub use color::{HslColor, ThemeColors};
pub use contact::{ContactForm, ContactFormError, ContactSubmission, FieldError};
pub use email::{Email, EmailError};
pub use id::*;
pub use media::{MediaItem, MediaKind, ParseMediaKindError};
