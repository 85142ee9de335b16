//! Page classification.
//!
//! Pure URL pattern matching, no DOM access. Because the video platform is a
//! single-page application that navigates between playlist and non-playlist
//! views without a full reload, callers must re-invoke [`classify`] on every
//! URL change, not just at initial load; the coordinator keeps only the most
//! recent result.

use http_types::Url;

use crate::types::{ContentType, DetectedPage, Site};

/// Classify a URL into a supported (site, content type) pair.
///
/// Returns `None` for unsupported pages.
pub fn classify(url: &str) -> Option<DetectedPage> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let path = parsed.path();

    let (site, content_type) = if host == "downloads.khinsider.com"
        && path.starts_with("/game-soundtracks/album/")
    {
        (Site::Khinsider, ContentType::Album)
    } else if is_youtube_host(host)
        && path == "/playlist"
        && parsed.query_pairs().any(|(key, _)| key == "list")
    {
        (Site::Youtube, ContentType::Playlist)
    } else if host.ends_with(".bandcamp.com") && path.starts_with("/album/") {
        (Site::Bandcamp, ContentType::Album)
    } else if (host == "www.vgmusic.com" || host == "vgmusic.com") && path.contains("/music/") {
        (Site::Vgmusic, ContentType::TrackList)
    } else {
        return None;
    };

    Some(DetectedPage {
        site,
        content_type,
        url: url.to_string(),
    })
}

fn is_youtube_host(host: &str) -> bool {
    matches!(host, "www.youtube.com" | "youtube.com" | "m.youtube.com")
}
