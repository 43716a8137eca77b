//! Business services.

pub mod auth;
pub mod contact;
pub mod gate;
pub mod media;
pub mod settings;

pub use auth::{AuthError, AuthService};
pub use contact::{ContactTransport, Inbox, InboxTransport, TransportError, WebhookTransport};
pub use gate::{GateDecision, GatedRoute, SessionState};
pub use media::{MediaLibrary, UploadError, UploadedFile};
pub use settings::{
    MemorySettingsStore, PaymentSettings, SessionSettingsStore, SettingsError, SettingsStore,
    SiteSettings,
};
