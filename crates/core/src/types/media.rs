//! Gallery media items.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::MediaId;

/// The kind of a gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }

    /// MIME type prefix accepted for uploads of this kind.
    #[must_use]
    pub const fn mime_prefix(self) -> &'static str {
        match self {
            Self::Photo => "image/",
            Self::Video => "video/",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`MediaKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media kind: {0}")]
pub struct ParseMediaKindError(pub String);

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photo" | "image" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            other => Err(ParseMediaKindError(other.to_owned())),
        }
    }
}

/// A photo or video shown in the public gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    pub kind: MediaKind,
    /// Source URL. Uploaded items carry a `data:` URL.
    pub url: String,
    /// Poster image for videos.
    pub thumbnail_url: Option<String>,
    pub alt: String,
}

impl MediaItem {
    #[must_use]
    pub fn new(kind: MediaKind, url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            id: MediaId::generate(),
            kind,
            url: url.into(),
            thumbnail_url: None,
            alt: alt.into(),
        }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// The image to show in a grid tile.
    #[must_use]
    pub fn preview_url(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("photo".parse::<MediaKind>().unwrap(), MediaKind::Photo);
        assert_eq!(" Video ".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert_eq!("image".parse::<MediaKind>().unwrap(), MediaKind::Photo);
        assert!("audio".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_preview_prefers_thumbnail() {
        let video = MediaItem::new(MediaKind::Video, "https://example.com/v.mp4", "Clip")
            .with_thumbnail("https://example.com/poster.png");
        assert_eq!(video.preview_url(), "https://example.com/poster.png");
        assert!(video.is_video());

        let photo = MediaItem::new(MediaKind::Photo, "https://example.com/p.png", "Photo");
        assert_eq!(photo.preview_url(), "https://example.com/p.png");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MediaKind::Video).unwrap(),
            "\"video\""
        );
    }
}
