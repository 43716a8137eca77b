//! Session gate for the admin area.
//!
//! Every admin page resolves the visitor's [`SessionState`] before it
//! renders anything, then asks [`decide`] what to do with it:
//!
//! ```text
//! state          | login page         | protected page
//! ---------------+--------------------+---------------------
//! Unknown        | loading indicator  | loading indicator
//! Anonymous      | render login form  | redirect /admin/login
//! Authenticated  | redirect /admin    | render page
//! ```
//!
//! Resolution fails closed: anything that prevents reading the session
//! counts as anonymous.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tower_sessions::Session;

use crate::models::{AdminSession, session_keys};

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Where authenticated visitors land.
pub const DASHBOARD_PATH: &str = "/admin";

/// A visitor's authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Not resolved yet.
    #[default]
    Unknown,
    Anonymous,
    Authenticated(AdminSession),
}

/// The two kinds of gated route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedRoute {
    Login,
    Protected,
}

/// What a gated route should do for the current visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Neutral placeholder while the state is unresolved.
    Loading,
    ShowLogin,
    Allow(AdminSession),
    Redirect(&'static str),
}

/// Why a session could not be read.
#[derive(Debug, Error)]
pub enum SessionResolutionFailure {
    #[error("session layer is not installed")]
    MissingLayer,
    #[error("session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

/// Decide what a gated route renders for `state`.
///
/// A redirect is never issued towards `current_path` itself.
#[must_use]
pub fn decide(state: SessionState, route: GatedRoute, current_path: &str) -> GateDecision {
    match (state, route) {
        (SessionState::Unknown, _) => GateDecision::Loading,
        (SessionState::Anonymous, GatedRoute::Login) => GateDecision::ShowLogin,
        (SessionState::Anonymous, GatedRoute::Protected) => {
            redirect_unless_current(current_path, LOGIN_PATH)
        }
        (SessionState::Authenticated(_), GatedRoute::Login) => {
            redirect_unless_current(current_path, DASHBOARD_PATH)
        }
        (SessionState::Authenticated(admin), GatedRoute::Protected) => GateDecision::Allow(admin),
    }
}

fn redirect_unless_current(current_path: &str, target: &'static str) -> GateDecision {
    let normalize = |p: &str| p.trim_end_matches('/').to_owned();
    if normalize(current_path) == normalize(target) {
        tracing::warn!(path = %current_path, "Suppressed redirect to the current path");
        GateDecision::Loading
    } else {
        GateDecision::Redirect(target)
    }
}

/// Resolve the visitor's session state, failing closed.
///
/// Expired admin sessions are removed from the session and resolve as
/// [`SessionState::Anonymous`].
pub async fn resolve_session(session: Option<&Session>, now: DateTime<Utc>) -> SessionState {
    match try_resolve_session(session, now).await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "Session resolution failed, treating visitor as anonymous");
            SessionState::Anonymous
        }
    }
}

async fn try_resolve_session(
    session: Option<&Session>,
    now: DateTime<Utc>,
) -> Result<SessionState, SessionResolutionFailure> {
    let session = session.ok_or(SessionResolutionFailure::MissingLayer)?;

    let Some(admin) = session
        .get::<AdminSession>(session_keys::CURRENT_ADMIN)
        .await?
    else {
        return Ok(SessionState::Anonymous);
    };

    if admin.is_expired(now) {
        tracing::info!(subject = %admin.subject, "Admin session expired");
        session
            .remove::<AdminSession>(session_keys::CURRENT_ADMIN)
            .await?;
        return Ok(SessionState::Anonymous);
    }

    Ok(SessionState::Authenticated(admin))
}

/// Store a freshly issued admin session, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish(
    session: &Session,
    admin: &AdminSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// End the admin session, rotating the session id.
///
/// Other session data (the visitor's settings record) is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn terminate(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AdminSession>(session_keys::CURRENT_ADMIN)
        .await?;
    session.cycle_id().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ansar_connect_core::Email;
    use chrono::Duration;
    use tower_sessions::MemoryStore;

    use super::*;

    fn admin(now: DateTime<Utc>) -> AdminSession {
        AdminSession {
            subject: "1".to_string(),
            name: "Admin User".to_string(),
            email: Email::parse("admin@example.com").unwrap(),
            issued_at: now,
            expires_at: now + Duration::hours(24),
        }
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_decision_table() {
        let now = Utc::now();

        assert_eq!(
            decide(SessionState::Unknown, GatedRoute::Login, LOGIN_PATH),
            GateDecision::Loading
        );
        assert_eq!(
            decide(SessionState::Unknown, GatedRoute::Protected, "/admin/site-settings"),
            GateDecision::Loading
        );
        assert_eq!(
            decide(SessionState::Anonymous, GatedRoute::Login, LOGIN_PATH),
            GateDecision::ShowLogin
        );
        assert_eq!(
            decide(SessionState::Anonymous, GatedRoute::Protected, "/admin/site-settings"),
            GateDecision::Redirect(LOGIN_PATH)
        );
        assert_eq!(
            decide(
                SessionState::Authenticated(admin(now)),
                GatedRoute::Login,
                LOGIN_PATH
            ),
            GateDecision::Redirect(DASHBOARD_PATH)
        );
        assert_eq!(
            decide(
                SessionState::Authenticated(admin(now)),
                GatedRoute::Protected,
                "/admin"
            ),
            GateDecision::Allow(admin(now))
        );
    }

    #[test]
    fn test_never_redirects_to_current_path() {
        assert_eq!(
            decide(SessionState::Anonymous, GatedRoute::Protected, "/admin/login/"),
            GateDecision::Loading
        );
        assert_eq!(
            decide(
                SessionState::Authenticated(admin(Utc::now())),
                GatedRoute::Login,
                "/admin"
            ),
            GateDecision::Loading
        );
    }

    #[tokio::test]
    async fn test_missing_layer_fails_closed() {
        assert_eq!(
            resolve_session(None, Utc::now()).await,
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_empty_session_is_anonymous() {
        let session = session();
        assert_eq!(
            resolve_session(Some(&session), Utc::now()).await,
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_undecodable_session_fails_closed() {
        let session = session();
        session
            .insert(session_keys::CURRENT_ADMIN, "not an admin")
            .await
            .unwrap();

        assert_eq!(
            resolve_session(Some(&session), Utc::now()).await,
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_establish_then_resolve() {
        let now = Utc::now();
        let session = session();
        establish(&session, &admin(now)).await.unwrap();

        let state = resolve_session(Some(&session), now).await;
        assert_eq!(state, SessionState::Authenticated(admin(now)));
    }

    #[tokio::test]
    async fn test_expired_session_is_cleared() {
        let now = Utc::now();
        let session = session();
        establish(&session, &admin(now)).await.unwrap();

        let later = now + Duration::hours(25);
        assert_eq!(
            resolve_session(Some(&session), later).await,
            SessionState::Anonymous
        );
        assert!(
            session
                .get::<AdminSession>(session_keys::CURRENT_ADMIN)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_terminate_keeps_other_data() {
        let now = Utc::now();
        let session = session();
        session
            .insert(session_keys::SITE_SETTINGS, "kept")
            .await
            .unwrap();
        establish(&session, &admin(now)).await.unwrap();

        terminate(&session).await.unwrap();

        assert_eq!(
            resolve_session(Some(&session), now).await,
            SessionState::Anonymous
        );
        assert_eq!(
            session
                .get::<String>(session_keys::SITE_SETTINGS)
                .await
                .unwrap()
                .as_deref(),
            Some("kept")
        );
    }
}
