//! AnsarConnect Core - Shared types library.
//!
//! This crate provides common types used across all AnsarConnect components:
//! - `site` - Public website and admin panel
//! - `cli` - Command-line tools for configuration and secrets
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP, no
//! session handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, theme colors, contact
//!   submissions and media items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
