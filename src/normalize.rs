//! Field normalization for raw scraped strings.
//!
//! These are pure functions turning site text into canonical track fields:
//! duration parsing, title/artist splitting, XML escaping, and filename
//! sanitization. Everything here is best-effort; malformed input yields
//! `None` or a fallback, never an error.

use regex::Regex;

/// Characters that are unsafe in filenames on common filesystems.
const UNSAFE_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Suffix some platforms append to auto-generated artist channels.
const ARTIST_SUFFIX_MARKER: &str = " - Topic";

/// Parse a textual duration (`M:SS` or `H:MM:SS`) into milliseconds.
///
/// Returns `None` for malformed or absent durations; callers treat that as
/// "unknown", never as an error.
///
/// ```rust
/// use xspf_export::normalize::parse_duration_ms;
///
/// assert_eq!(parse_duration_ms("2:30"), Some(150_000));
/// assert_eq!(parse_duration_ms("1:05:00"), Some(3_900_000));
/// assert_eq!(parse_duration_ms("live"), None);
/// ```
pub fn parse_duration_ms(text: &str) -> Option<u64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let mut seconds: u64 = 0;
    for part in &parts {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        seconds = seconds * 60 + part.parse::<u64>().ok()?;
    }
    Some(seconds * 1000)
}

/// A listing title split into its constituent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTitle {
    pub artist: Option<String>,
    pub title: String,
    pub track_number: Option<u32>,
}

/// Split a list-style row title into artist, track number, and title.
///
/// Tries the strict `"Artist - N - Title"` / `"Artist - N. Title"` pattern
/// first (greedy on the artist side), then falls back to a plain split on the
/// first `" - "`. A title without any separator comes back whole with no
/// artist.
pub fn split_listing_title(raw: &str) -> SplitTitle {
    let raw = raw.trim();

    let strict = Regex::new(r"^(?P<artist>.+) - (?P<num>\d+)(?: -|\.) (?P<title>.+)$").unwrap();
    if let Some(captures) = strict.captures(raw) {
        if let Ok(number) = captures["num"].parse::<u32>() {
            return SplitTitle {
                artist: Some(captures["artist"].trim().to_string()),
                title: captures["title"].trim().to_string(),
                track_number: Some(number),
            };
        }
    }

    match raw.split_once(" - ") {
        Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
            SplitTitle {
                artist: Some(artist.trim().to_string()),
                title: title.trim().to_string(),
                track_number: None,
            }
        }
        _ => SplitTitle {
            artist: None,
            title: raw.to_string(),
            track_number: None,
        },
    }
}

/// Split a combined caption ("Artist - Title") on its first separator.
///
/// The first segment is the artist and the remainder is the title. A caption
/// with no separator is all title.
pub fn split_caption(raw: &str) -> (Option<String>, String) {
    let split = split_listing_title(raw);
    (split.artist, split.title)
}

/// Strip the platform-specific auto-channel suffix from an artist name.
///
/// Applied unconditionally after either title parse path.
pub fn strip_artist_suffix(artist: &str) -> &str {
    artist
        .strip_suffix(ARTIST_SUFFIX_MARKER)
        .unwrap_or(artist)
        .trim()
}

/// Escape XML-unsafe characters in element text.
///
/// Applied exactly once per field, after normalization and before
/// concatenation into the document. Deliberately not idempotent: running it
/// over already-escaped text double-escapes the ampersands, so the serializer
/// is the only call site for playlist output.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

/// Replace filesystem-unsafe characters (`\ / : * ? " < > |`) with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
