//! Integration test harness for Ansar Connect.
//!
//! Drives the full site router in-process with `tower::ServiceExt::oneshot`,
//! so no server or network is needed. [`TestApp`] plays the part of a single
//! browser: it keeps the session cookie between requests and always sends
//! the same client IP for the login rate limiter.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ansar-connect-integration-tests
//! ```

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;

use ansar_connect_site::{app, config::SiteConfig, state::AppState};

/// A session secret that passes the length and entropy checks.
pub const TEST_SESSION_SECRET: &str =
    "Zq8vN3kT1pLw7xR2mC9bY4hF6sJ0dG5aUeKiOtPnMjQrSlVyWzXcBgDfHuA1!2@3#4$";

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password";

/// Client IP sent in `X-Forwarded-For`.
const CLIENT_IP: &str = "203.0.113.10";

const MULTIPART_BOUNDARY: &str = "ansar-connect-test-boundary";

/// Build a site configuration from defaults plus `overrides`.
///
/// # Panics
///
/// Panics if the resulting configuration is invalid.
#[must_use]
pub fn test_config(overrides: &[(&str, &str)]) -> SiteConfig {
    let mut vars: HashMap<String, String> = HashMap::from([(
        "SITE_SESSION_SECRET".to_string(),
        TEST_SESSION_SECRET.to_string(),
    )]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    SiteConfig::from_vars(&vars).expect("test configuration is valid")
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A multipart form body under construction.
#[derive(Debug, Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// One simulated browser talking to a fresh site instance.
pub struct TestApp {
    router: Router,
    state: AppState,
    cookie: Option<String>,
}

impl TestApp {
    /// A site with seeded demo content and default settings.
    ///
    /// # Panics
    ///
    /// Panics if the application cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config(&[]))
    }

    /// # Panics
    ///
    /// Panics if the application cannot be built.
    #[must_use]
    pub fn with_config(config: SiteConfig) -> Self {
        Self::with_state(AppState::new(config).expect("state builds"))
    }

    /// # Panics
    ///
    /// Panics if the router cannot be built.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        let router = app(state.clone()).expect("router builds");
        Self {
            router,
            state,
            cookie: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The current session cookie (`name=value`).
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Drop the session cookie, as a different browser would have none.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    /// POST an urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("valid request")).await
    }

    /// POST a multipart form.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_multipart(&mut self, path: &str, form: MultipartBody) -> TestResponse {
        let request = self
            .request("POST", path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(form.finish()));
        self.send(request.expect("valid request")).await
    }

    /// Sign in with the default admin credentials.
    pub async fn login(&mut self) -> TestResponse {
        self.post_form(
            "/admin/login",
            &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
        )
        .await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();

        if let Some(pair) = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            let pair = pair.trim();
            // A removal cookie carries an empty value
            self.cookie = (!pair.ends_with('=')).then(|| pair.to_string());
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
