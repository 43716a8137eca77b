//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use super::contact_submissions::SubmissionView;
use crate::filters;
use crate::middleware::{CspNonce, RequireAdminAuth};
use crate::routes::layout::{AdminNav, PageContext};
use crate::state::AppState;

/// Recent submissions shown on the dashboard.
const RECENT_SUBMISSIONS: usize = 3;

/// A headline number on the dashboard.
pub struct Stat {
    pub label: &'static str,
    pub value: String,
    pub note: &'static str,
}

/// A dashboard shortcut.
pub struct QuickLink {
    pub label: &'static str,
    pub href: &'static str,
}

const QUICK_LINKS: &[QuickLink] = &[
    QuickLink {
        label: "Update site settings",
        href: "/admin/site-settings",
    },
    QuickLink {
        label: "Edit payment details",
        href: "/admin/payment-methods",
    },
    QuickLink {
        label: "Manage gallery media",
        href: "/admin/media-management",
    },
    QuickLink {
        label: "Read contact messages",
        href: "/admin/contact-submissions",
    },
];

const RECENT_ACTIVITY: &[&str] = &[
    "New donation of $50 received from Anonymous.",
    "Volunteer application from Sarah Khan approved.",
    "Gallery updated with photos from the winter relief drive.",
    "Monthly newsletter sent to 1,200 subscribers.",
];

#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub nav: AdminNav,
    pub stats: Vec<Stat>,
    pub recent: Vec<SubmissionView>,
    pub activity: &'static [&'static str],
    pub links: &'static [QuickLink],
}

/// GET /admin
///
/// Donation, project and volunteer figures are placeholders; the submission
/// count is live.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> impl IntoResponse {
    let submissions = state.inbox().list().await;

    let stats = vec![
        Stat {
            label: "Total Donations",
            value: "$12,540".to_string(),
            note: "+20.1% from last month",
        },
        Stat {
            label: "Active Projects",
            value: "15".to_string(),
            note: "+2 since last quarter",
        },
        Stat {
            label: "Registered Volunteers",
            value: "250".to_string(),
            note: "+32 this month",
        },
        Stat {
            label: "Contact Submissions",
            value: submissions.len().to_string(),
            note: "In the inbox",
        },
    ];

    let recent = submissions
        .iter()
        .take(RECENT_SUBMISSIONS)
        .map(SubmissionView::from)
        .collect();

    DashboardTemplate {
        page: PageContext::load(&state, session, nonce).await,
        nav: AdminNav::new(admin, "dashboard"),
        stats,
        recent,
        activity: RECENT_ACTIVITY,
        links: QUICK_LINKS,
    }
}
