//! Gallery media library.
//!
//! Items live in process memory and reset on restart. Uploaded files are
//! embedded as `data:` URLs rather than written to storage.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;
use tokio::sync::RwLock;

use ansar_connect_core::{MediaId, MediaItem, MediaKind};

/// Default capacity of a library, in stored bytes.
pub const DEFAULT_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

/// Poster shown for uploaded videos.
pub const VIDEO_PLACEHOLDER_THUMBNAIL: &str = "https://placehold.co/600x400.png?text=NewVideo";

/// Errors from accepting an upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Please choose a {expected} file (got {content_type})")]
    WrongContentType {
        expected: MediaKind,
        content_type: String,
    },

    #[error("The media library is full. Delete an item before uploading another.")]
    LibraryFull { needed: usize, capacity: usize },
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The file as a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }

    /// Check that the file is present and its content type matches `kind`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::NoFileSelected` for an empty upload and
    /// `UploadError::WrongContentType` when the MIME type doesn't match.
    pub fn ensure_kind(&self, kind: MediaKind) -> Result<(), UploadError> {
        if self.is_empty() {
            return Err(UploadError::NoFileSelected);
        }
        if !self.content_type.starts_with(kind.mime_prefix()) {
            return Err(UploadError::WrongContentType {
                expected: kind,
                content_type: self.content_type.clone(),
            });
        }
        Ok(())
    }
}

/// Bytes an item holds in memory.
fn stored_bytes(item: &MediaItem) -> usize {
    item.url.len() + item.alt.len() + item.thumbnail_url.as_ref().map_or(0, String::len)
}

/// Shared list of gallery items, newest first.
///
/// Uploads are refused once the items would hold more than the capacity.
#[derive(Clone)]
pub struct MediaLibrary {
    items: Arc<RwLock<Vec<MediaItem>>>,
    capacity_bytes: usize,
}

impl Default for MediaLibrary {
    fn default() -> Self {
        Self {
            items: Arc::default(),
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        }
    }
}

impl MediaLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity_bytes(mut self, capacity_bytes: usize) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }

    /// A library holding the demo photos and video.
    #[must_use]
    pub fn seeded() -> Self {
        let items = vec![
            MediaItem::new(
                MediaKind::Photo,
                "https://placehold.co/600x400.png?text=Photo1",
                "Uploaded photo 1",
            ),
            MediaItem::new(
                MediaKind::Photo,
                "https://placehold.co/600x400.png?text=Photo2",
                "Uploaded photo 2",
            ),
            MediaItem::new(
                MediaKind::Video,
                "https://example.com/video1.mp4",
                "Uploaded video 1",
            )
            .with_thumbnail("https://placehold.co/600x400.png?text=VideoThumb1"),
        ];

        Self {
            items: Arc::new(RwLock::new(items)),
            ..Self::default()
        }
    }

    pub async fn list(&self) -> Vec<MediaItem> {
        self.items.read().await.clone()
    }

    pub async fn list_kind(&self, kind: MediaKind) -> Vec<MediaItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| item.kind == kind)
            .cloned()
            .collect()
    }

    /// Add an uploaded file to the front of the library.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the file is empty or of the wrong type, or
    /// `UploadError::LibraryFull` if it doesn't fit in the remaining capacity.
    pub async fn upload(&self, kind: MediaKind, file: &UploadedFile) -> Result<MediaItem, UploadError> {
        file.ensure_kind(kind)?;

        let mut item = MediaItem::new(
            kind,
            file.to_data_url(),
            format!("Uploaded {kind} - {}", file.file_name),
        );
        if kind == MediaKind::Video {
            item = item.with_thumbnail(VIDEO_PLACEHOLDER_THUMBNAIL);
        }

        let mut items = self.items.write().await;
        let needed = items.iter().map(stored_bytes).sum::<usize>() + stored_bytes(&item);
        if needed > self.capacity_bytes {
            return Err(UploadError::LibraryFull {
                needed,
                capacity: self.capacity_bytes,
            });
        }

        items.insert(0, item.clone());
        Ok(item)
    }

    /// Remove an item. Returns the removed item if it existed.
    pub async fn remove(&self, id: MediaId) -> Option<MediaItem> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|item| item.id == id)?;
        Some(items.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn test_data_url() {
        assert_eq!(png("a.png").to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_seeded_library() {
        let library = MediaLibrary::seeded();
        assert_eq!(library.list_kind(MediaKind::Photo).await.len(), 2);
        assert_eq!(library.list_kind(MediaKind::Video).await.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_prepends() {
        let library = MediaLibrary::seeded();
        let item = library
            .upload(MediaKind::Photo, &png("event.png"))
            .await
            .unwrap();

        let items = library.list().await;
        assert_eq!(items.len(), 4);
        assert_eq!(items.first(), Some(&item));
        assert_eq!(item.alt, "Uploaded photo - event.png");
        assert!(item.url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_video_upload_gets_placeholder_thumbnail() {
        let library = MediaLibrary::new();
        let clip = UploadedFile {
            file_name: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            bytes: vec![0, 0, 0, 1],
        };

        let item = library.upload(MediaKind::Video, &clip).await.unwrap();
        assert_eq!(item.thumbnail_url.as_deref(), Some(VIDEO_PLACEHOLDER_THUMBNAIL));
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let library = MediaLibrary::new();
        let empty = UploadedFile {
            bytes: Vec::new(),
            ..png("")
        };

        assert_eq!(
            library.upload(MediaKind::Photo, &empty).await,
            Err(UploadError::NoFileSelected)
        );
        assert!(library.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_rejected() {
        let library = MediaLibrary::new();
        assert!(matches!(
            library.upload(MediaKind::Video, &png("photo.png")).await,
            Err(UploadError::WrongContentType { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_past_capacity_is_rejected() {
        let library = MediaLibrary::new().with_capacity_bytes(200);
        library
            .upload(MediaKind::Photo, &png("first.png"))
            .await
            .unwrap();

        let big = UploadedFile {
            bytes: vec![0; 256],
            ..png("big.png")
        };
        assert!(matches!(
            library.upload(MediaKind::Photo, &big).await,
            Err(UploadError::LibraryFull { capacity: 200, .. })
        ));
        assert_eq!(library.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_frees_capacity() {
        let library = MediaLibrary::new().with_capacity_bytes(100);
        let first = library
            .upload(MediaKind::Photo, &png("a.png"))
            .await
            .unwrap();
        library.remove(first.id).await;

        assert!(library.upload(MediaKind::Photo, &png("b.png")).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove() {
        let library = MediaLibrary::seeded();
        let first = library.list().await.remove(0);

        assert_eq!(library.remove(first.id).await, Some(first.clone()));
        assert_eq!(library.remove(first.id).await, None);
        assert_eq!(library.list().await.len(), 2);
    }
}
