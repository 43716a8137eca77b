//! Gallery media management.

use ansar_connect_core::MediaKind;
use ansar_connect_integration_tests::{MultipartBody, TestApp, test_config};
use axum::http::StatusCode;

#[tokio::test]
async fn test_gallery_lists_seeded_media() {
    let mut app = TestApp::new();

    let resp = app.get("/gallery").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Uploaded photo 1"));
    assert!(resp.body.contains("Uploaded photo 2"));
    assert!(resp.body.contains("https://example.com/video1.mp4"));
    assert!(resp.body.contains("VideoThumb1"));
}

#[tokio::test]
async fn test_photo_upload_appears_first_in_gallery() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("kind", "photo")
        .file("file", "event.png", "image/png", &[1, 2, 3]);
    let resp = app
        .post_multipart("/admin/media-management/upload", form)
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/admin/media-management"));

    let gallery = app.get("/gallery").await;
    let uploaded = gallery
        .body
        .find("Uploaded photo - event.png")
        .expect("upload listed");
    let seeded = gallery.body.find("Uploaded photo 1").expect("seed listed");
    assert!(uploaded < seeded);
    assert!(gallery.body.contains("data:image/png;base64,AQID"));
}

#[tokio::test]
async fn test_video_upload_gets_placeholder_thumbnail() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("kind", "video")
        .file("file", "clip.mp4", "video/mp4", &[0, 0, 0, 1]);
    app.post_multipart("/admin/media-management/upload", form)
        .await;

    let videos = app.state().media().list_kind(MediaKind::Video).await;
    assert_eq!(videos.len(), 2);
    assert!(
        videos
            .first()
            .and_then(|v| v.thumbnail_url.as_deref())
            .is_some_and(|url| url.contains("NewVideo"))
    );
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("kind", "photo")
        .file("file", "", "application/octet-stream", b"");
    let resp = app
        .post_multipart("/admin/media-management/upload", form)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body.contains("No file selected"));
    assert_eq!(app.state().media().list().await.len(), 3);
}

#[tokio::test]
async fn test_unknown_kind_is_bad_request() {
    let mut app = TestApp::new();
    app.login().await;

    let form = MultipartBody::new()
        .text("kind", "audio")
        .file("file", "song.mp3", "audio/mpeg", &[1]);
    let resp = app
        .post_multipart("/admin/media-management/upload", form)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_item() {
    let mut app = TestApp::new();
    app.login().await;
    let item = app.state().media().list().await.remove(0);

    let resp = app
        .post_form(
            &format!("/admin/media-management/{}/delete", item.id),
            &[],
        )
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(app.state().media().list().await.len(), 2);

    let again = app
        .post_form(
            &format!("/admin/media-management/{}/delete", item.id),
            &[],
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_upload_shows_storage_guidance() {
    let mut app = TestApp::with_config(test_config(&[("SITE_MAX_UPLOAD_BYTES", "1024")]));
    app.login().await;

    let form = MultipartBody::new()
        .text("kind", "photo")
        .file("file", "huge.png", "image/png", &[0u8; 4096]);
    let resp = app
        .post_multipart("/admin/media-management/upload", form)
        .await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(resp.body.contains("Storage limit reached. Try a smaller image."));
    assert_eq!(app.state().media().list().await.len(), 3);
}

#[tokio::test]
async fn test_full_library_refuses_uploads() {
    let mut app = TestApp::with_config(test_config(&[("SITE_MEDIA_LIBRARY_BYTES", "256")]));
    app.login().await;

    let form = MultipartBody::new()
        .text("kind", "photo")
        .file("file", "big.png", "image/png", &[7u8; 64]);
    let resp = app
        .post_multipart("/admin/media-management/upload", form)
        .await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(resp.body.contains("The media library is full."));
    assert_eq!(app.state().media().list().await.len(), 3);
}
