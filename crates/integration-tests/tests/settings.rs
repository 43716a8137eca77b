//! Site settings and payment methods stored in the visitor's session.

use ansar_connect_integration_tests::{MultipartBody, TestApp, test_config};
use axum::http::StatusCode;

/// A few bytes that claim to be a PNG.
const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn site_form(title: &str) -> MultipartBody {
    MultipartBody::new()
        .text("siteTitle", title)
        .text("background_h", "210")
        .text("background_s", "100")
        .text("background_l", "97")
        .text("foreground_h", "180")
        .text("foreground_s", "25")
        .text("foreground_l", "37")
        .text("primary_h", "10")
        .text("primary_s", "20")
        .text("primary_l", "30")
        .text("accent_h", "120")
        .text("accent_s", "25")
        .text("accent_l", "65")
}

#[tokio::test]
async fn test_defaults_render_without_saved_settings() {
    let mut app = TestApp::new();

    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("AnsarConnect - Ansar Ali Foundation"));
    assert!(home.body.contains("--primary: 210 98% 73%;"));

    let donate = app.get("/donate").await;
    assert!(donate.body.contains("Charity First Bank"));
    assert!(donate.body.contains("01XXXXXXXXX (bKash)"));
}

#[tokio::test]
async fn test_saved_settings_flow_into_public_pages() {
    let mut app = TestApp::new();
    app.login().await;

    let resp = app
        .post_multipart("/admin/site-settings", site_form("Hope Builders"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Site settings saved."));

    let home = app.get("/").await;
    assert!(home.body.contains("<title>Hope Builders</title>"));
    assert!(home.body.contains("--primary: 10 20% 30%;"));

    let about = app.get("/about").await;
    assert!(about.body.contains("About Us - Hope Builders"));
}

#[tokio::test]
async fn test_invalid_color_component_keeps_previous_value() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("siteTitle", "Colors")
        .text("primary_h", "abc")
        .text("primary_s", "50")
        .text("primary_l", "");
    app.post_multipart("/admin/site-settings", form).await;

    let home = app.get("/").await;
    assert!(home.body.contains("--primary: 210 50% 73%;"));
}

#[tokio::test]
async fn test_logo_upload_is_stored_as_data_url() {
    let mut app = TestApp::new();
    app.login().await;

    let form = site_form("Logo Test").file("logo", "logo.png", "image/png", PNG);
    let resp = app.post_multipart("/admin/site-settings", form).await;
    assert_eq!(resp.status, StatusCode::OK);

    let home = app.get("/").await;
    assert!(home.body.contains(r#"src="data:image/png;base64,iVBORw0KGgo=""#));
}

#[tokio::test]
async fn test_logo_must_be_an_image() {
    let mut app = TestApp::new();
    app.login().await;

    let form = site_form("Ignored").file("logo", "notes.txt", "text/plain", b"hello");
    let resp = app.post_multipart("/admin/site-settings", form).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body.contains("Please choose a photo file"));

    let home = app.get("/").await;
    assert!(!home.body.contains("Ignored"));
}

#[tokio::test]
async fn test_settings_survive_logout() {
    let mut app = TestApp::new();
    app.login().await;
    app.post_multipart("/admin/site-settings", site_form("Still Here"))
        .await;

    app.post_form("/admin/logout", &[]).await;

    let home = app.get("/").await;
    assert!(home.body.contains("<title>Still Here</title>"));
}

#[tokio::test]
async fn test_settings_are_scoped_to_one_browser() {
    let mut app = TestApp::new();
    app.login().await;
    app.post_multipart("/admin/site-settings", site_form("Mine Only"))
        .await;

    app.clear_cookies();
    let home = app.get("/").await;
    assert!(!home.body.contains("Mine Only"));
    assert!(home.body.contains("AnsarConnect - Ansar Ali Foundation"));
}

#[tokio::test]
async fn test_quota_overflow_keeps_earlier_writes() {
    let mut app = TestApp::with_config(test_config(&[("SITE_SETTINGS_QUOTA_BYTES", "150")]));
    app.login().await;

    let big_logo = vec![0u8; 512];
    let form = site_form("Quota Test").file("logo", "big.png", "image/png", &big_logo);
    let resp = app.post_multipart("/admin/site-settings", form).await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(resp.body.contains("Storage limit reached. Try a smaller image."));

    // The title was written before the logo ran out of room
    let home = app.get("/").await;
    assert!(home.body.contains("<title>Quota Test</title>"));
    assert!(!home.body.contains("data:image/png"));
}

#[tokio::test]
async fn test_oversized_logo_shows_storage_guidance() {
    let mut app = TestApp::with_config(test_config(&[("SITE_MAX_UPLOAD_BYTES", "1024")]));
    app.login().await;

    let huge_logo = vec![0u8; 4096];
    let form = site_form("Too Big").file("logo", "huge.png", "image/png", &huge_logo);
    let resp = app.post_multipart("/admin/site-settings", form).await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(resp.body.contains("Storage limit reached. Try a smaller image."));
    assert!(resp.body.contains(r#"name="siteTitle""#));

    // Nothing from the rejected form was stored
    let home = app.get("/").await;
    assert!(!home.body.contains("Too Big"));
}

#[tokio::test]
async fn test_oversized_qr_code_shows_storage_guidance() {
    let mut app = TestApp::with_config(test_config(&[("SITE_MAX_UPLOAD_BYTES", "1024")]));
    app.login().await;

    let huge_qr = vec![0u8; 4096];
    let form = MultipartBody::new()
        .text("accountName", "Relief Fund")
        .file("qrCode", "qr.png", "image/png", &huge_qr);
    let resp = app.post_multipart("/admin/payment-methods", form).await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(resp.body.contains("Storage limit reached. Try a smaller image."));
    assert!(resp.body.contains(r#"name="accountName""#));
}

#[tokio::test]
async fn test_blank_payment_fields_keep_saved_values() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("accountName", "")
        .text("bankName", "Community Bank")
        .file("qrCode", "", "application/octet-stream", b"");
    let resp = app.post_multipart("/admin/payment-methods", form).await;
    assert_eq!(resp.status, StatusCode::OK);

    let donate = app.get("/donate").await;
    assert!(donate.body.contains("Community Bank"));
    assert!(donate.body.contains("Ansar Ali Foundation"));
    assert!(donate.body.contains("01XXXXXXXXX (bKash)"));
}

#[tokio::test]
async fn test_payment_methods_flow_into_donate_page() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("accountName", "Relief Fund")
        .text("accountNumber", "987654321")
        .text("bankName", "Community Bank")
        .text("branch", "Riverside")
        .text("ifscSwift", "CBRS0001")
        .text("serviceA", "01711111111 (bKash)")
        .text("serviceB", "01822222222 (Nagad)")
        .text("serviceC", "01933333333 (Rocket)")
        .file("qrCode", "", "application/octet-stream", b"");
    let resp = app.post_multipart("/admin/payment-methods", form).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Payment methods saved."));

    let donate = app.get("/donate").await;
    assert!(donate.body.contains("Community Bank"));
    assert!(donate.body.contains("01822222222 (Nagad)"));
    // No new QR chosen, so the placeholder stays
    assert!(donate.body.contains("placehold.co/200x200.png?text=QR+Code"));
}

#[tokio::test]
async fn test_saving_requires_admin() {
    let mut app = TestApp::new();

    let resp = app
        .post_multipart("/admin/site-settings", site_form("Sneaky"))
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/admin/login"));
}
