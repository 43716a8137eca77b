//! Contact submission delivery and the admin inbox.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use ansar_connect_core::{ContactForm, ContactSubmission, SubmissionId};

/// Webhook request timeout.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from delivering a contact submission.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook responded with status {0}")]
    Rejected(u16),
}

/// Delivers validated contact submissions somewhere.
#[async_trait]
pub trait ContactTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns `TransportError` if the submission could not be delivered.
    async fn submit(&self, submission: ContactSubmission) -> Result<(), TransportError>;
}

// =============================================================================
// Inbox
// =============================================================================

/// In-memory list of received submissions, shared with the admin pages.
#[derive(Clone, Default)]
pub struct Inbox {
    submissions: Arc<RwLock<Vec<ContactSubmission>>>,
}

impl Inbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An inbox holding the three sample submissions shown in the demo.
    #[must_use]
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let samples = [
            (
                "John Doe",
                "john.doe@example.com",
                "+11234567890",
                "Interested in volunteering opportunities. Please provide more details.",
                now - chrono::Duration::days(1),
            ),
            (
                "Jane Smith",
                "jane.smith@example.com",
                "",
                "I have a query regarding donations. Can someone contact me?",
                now - chrono::Duration::days(2),
            ),
            (
                "Ahmed Ali",
                "ahmed.ali@example.com",
                "+923001234567",
                "Great work by the foundation! Keep it up.",
                now,
            ),
        ];

        let submissions = samples
            .into_iter()
            .filter_map(|(name, email, phone, message, at)| {
                ContactForm {
                    name: name.to_string(),
                    email: email.to_string(),
                    phone_number: phone.to_string(),
                    message: message.to_string(),
                }
                .validate(at)
                .ok()
            })
            .collect();

        Self {
            submissions: Arc::new(RwLock::new(submissions)),
        }
    }

    pub async fn push(&self, submission: ContactSubmission) {
        self.submissions.write().await.push(submission);
    }

    /// All submissions, newest first.
    pub async fn list(&self) -> Vec<ContactSubmission> {
        let mut submissions = self.submissions.read().await.clone();
        submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        submissions
    }

    pub async fn get(&self, id: SubmissionId) -> Option<ContactSubmission> {
        self.submissions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Remove a submission. Returns `false` if it didn't exist.
    pub async fn delete(&self, id: SubmissionId) -> bool {
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();
        submissions.retain(|s| s.id != id);
        submissions.len() != before
    }

    pub async fn count(&self) -> usize {
        self.submissions.read().await.len()
    }
}

/// Delivers into an [`Inbox`] after a configurable delay.
pub struct InboxTransport {
    inbox: Inbox,
    latency: Duration,
}

impl InboxTransport {
    #[must_use]
    pub const fn new(inbox: Inbox, latency: Duration) -> Self {
        Self { inbox, latency }
    }
}

#[async_trait]
impl ContactTransport for InboxTransport {
    async fn submit(&self, submission: ContactSubmission) -> Result<(), TransportError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.inbox.push(submission).await;
        Ok(())
    }
}

// =============================================================================
// Webhook
// =============================================================================

/// POSTs each submission as JSON to a configured URL.
pub struct WebhookTransport {
    client: reqwest::Client,
    url: Url,
}

impl WebhookTransport {
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn new(url: Url) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ContactTransport for WebhookTransport {
    async fn submit(&self, submission: ContactSubmission) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %self.url, "Contact webhook rejected submission");
            return Err(TransportError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission(name: &str, at: DateTime<Utc>) -> ContactSubmission {
        ContactForm {
            name: name.to_string(),
            email: "visitor@example.org".to_string(),
            phone_number: String::new(),
            message: "Please tell me more about your programs.".to_string(),
        }
        .validate(at)
        .unwrap()
    }

    #[tokio::test]
    async fn test_seeded_inbox_is_newest_first() {
        let inbox = Inbox::seeded(Utc::now());
        let names: Vec<_> = inbox.list().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Ahmed Ali", "John Doe", "Jane Smith"]);
    }

    #[tokio::test]
    async fn test_inbox_transport_delivers() {
        let inbox = Inbox::new();
        let transport = InboxTransport::new(inbox.clone(), Duration::ZERO);

        transport
            .submit(submission("Visitor", Utc::now()))
            .await
            .unwrap();

        assert_eq!(inbox.count().await, 1);
    }

    #[tokio::test]
    async fn test_inbox_transport_waits_for_latency() {
        let inbox = Inbox::new();
        let transport = InboxTransport::new(inbox.clone(), Duration::from_millis(20));
        let started = tokio::time::Instant::now();

        transport
            .submit(submission("Visitor", Utc::now()))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(inbox.count().await, 1);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let inbox = Inbox::new();
        let kept = submission("Kept", Utc::now());
        let removed = submission("Removed", Utc::now());
        inbox.push(kept.clone()).await;
        inbox.push(removed.clone()).await;

        assert_eq!(inbox.get(removed.id).await, Some(removed.clone()));
        assert!(inbox.delete(removed.id).await);
        assert!(!inbox.delete(removed.id).await);
        assert_eq!(inbox.get(removed.id).await, None);
        assert_eq!(inbox.list().await, vec![kept]);
    }

    /// Serve `status` for every POST to `/hook`, forwarding request bodies
    /// to the returned channel.
    async fn webhook_endpoint(
        status: axum::http::StatusCode,
    ) -> (Url, tokio::sync::mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let app = axum::Router::new().route(
            "/hook",
            axum::routing::post(move |body: String| async move {
                let _ = tx.send(body);
                status
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (Url::parse(&format!("http://{addr}/hook")).unwrap(), rx)
    }

    #[tokio::test]
    async fn test_webhook_posts_submission_as_json() {
        let (url, mut received) = webhook_endpoint(axum::http::StatusCode::NO_CONTENT).await;
        let transport = WebhookTransport::new(url).unwrap();

        transport
            .submit(submission("Visitor", Utc::now()))
            .await
            .unwrap();

        let body = received.recv().await.unwrap();
        assert!(body.contains(r#""name":"Visitor""#));
        assert!(body.contains("visitor@example.org"));
    }

    #[tokio::test]
    async fn test_webhook_error_status_is_rejected() {
        let (url, _received) =
            webhook_endpoint(axum::http::StatusCode::INTERNAL_SERVER_ERROR).await;
        let transport = WebhookTransport::new(url).unwrap();

        let result = transport.submit(submission("Visitor", Utc::now())).await;
        assert!(matches!(result, Err(TransportError::Rejected(500))));
    }
}
