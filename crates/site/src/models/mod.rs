//! Types stored in the visitor's session.

pub mod session;

pub use session::{AdminSession, keys as session_keys};
