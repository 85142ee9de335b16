//! Data types for extracted playlists.
//!
//! This module contains the core data structures used throughout the crate:
//! track records, playlist-level metadata, and the page classification types
//! produced by the detector.

use serde::{Deserialize, Serialize};

use crate::normalize;

/// Placeholder title used when a row yields no usable track name.
pub const UNKNOWN_TITLE: &str = "Unknown Track";

/// Placeholder artist used when a row yields no usable creator.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One playlist entry.
///
/// `location` is the resolved media URL and doubles as the deduplication key:
/// within one playlist, locations are unique and the first occurrence wins.
///
/// # Examples
///
/// ```rust
/// use xspf_export::TrackRecord;
///
/// let mut track = TrackRecord::new("https://example.com/a.mp3".to_string());
/// track.title = "Heart of Gold".to_string();
/// track.creator = "Neil Young".to_string();
/// track.duration_ms = Some(186_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// The resolved media URL. Required and non-empty.
    pub location: String,
    /// The track title, defaulting to [`UNKNOWN_TITLE`].
    pub title: String,
    /// The artist name, defaulting to [`UNKNOWN_ARTIST`].
    pub creator: String,
    /// The album name, if the source page exposes one.
    pub album: Option<String>,
    /// 1-based track number as printed on the source page, if any.
    pub track_number: Option<u32>,
    /// Duration in milliseconds.
    ///
    /// `None` means "unknown". `Some(0)` is reserved for sources that
    /// genuinely measure a zero length, which is distinct from unknown.
    pub duration_ms: Option<u64>,
}

impl TrackRecord {
    /// Create a record for a resolved location with sentinel title/creator.
    pub fn new(location: String) -> Self {
        Self {
            location,
            title: UNKNOWN_TITLE.to_string(),
            creator: UNKNOWN_ARTIST.to_string(),
            album: None,
            track_number: None,
            duration_ms: None,
        }
    }
}

/// Playlist-level metadata for one exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMetadata {
    /// Playlist title, taken from the page heading.
    pub title: String,
    /// Cover image URL, if the page exposes one.
    pub image_url: Option<String>,
    /// URL of the page the playlist was extracted from.
    pub source_page_url: Option<String>,
}

impl PlaylistMetadata {
    pub fn new(title: String) -> Self {
        Self {
            title,
            image_url: None,
            source_page_url: None,
        }
    }

    /// Derive the download filename: `"{title} [{site_tag}].xspf"` with
    /// filesystem-unsafe characters replaced.
    pub fn suggested_filename(&self, site_tag: &str) -> String {
        format!(
            "{} [{}].xspf",
            normalize::sanitize_filename(&self.title),
            site_tag
        )
    }
}

/// Supported source sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// OST archive with intermediate track pages (two-hop resolution).
    Khinsider,
    /// Video platform playlists (relative links, "Artist - N - Title" rows).
    Youtube,
    /// Streaming album pages resolved through the shared on-page player.
    Bandcamp,
    /// Fan archive with direct file links per row.
    Vgmusic,
}

impl Site {
    /// Tag appended to suggested filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            Site::Khinsider => "Khinsider",
            Site::Youtube => "YouTube",
            Site::Bandcamp => "Bandcamp",
            Site::Vgmusic => "VGMusic",
        }
    }
}

/// What kind of listing a detected page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Album,
    Playlist,
    TrackList,
}

/// A classified page: which site it belongs to and what it lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedPage {
    pub site: Site,
    pub content_type: ContentType,
    pub url: String,
}

/// Result of resolving a single listing row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The row produced a candidate track record.
    Resolved(TrackRecord),
    /// The row carries nothing exportable; the reason is logged and the
    /// pipeline moves on without side effects.
    Skip(String),
}

impl RowOutcome {
    pub fn skip(reason: impl Into<String>) -> Self {
        RowOutcome::Skip(reason.into())
    }
}
