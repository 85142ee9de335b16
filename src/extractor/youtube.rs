//! Video platform playlist extractor (template-token).
//!
//! Playlist rows carry relative `/watch` hrefs that need the site base
//! prefixed, and the interesting query parameter is `v` alone: the raw href
//! also embeds the playlist id and row index, so locations are canonicalized
//! on the video id before deduplication. Row titles follow the
//! "Artist - N - Title" convention on uploaded albums, with the channel name
//! as artist fallback; auto-generated channels carry a " - Topic" suffix
//! which is stripped unconditionally.

use async_trait::async_trait;
use http_types::Url;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::{parse_duration_ms, split_listing_title, strip_artist_suffix};
use crate::types::{PlaylistMetadata, RowOutcome, Site, TrackRecord};
use crate::Result;

use super::SiteExtractor;

const BASE_URL: &str = "https://www.youtube.com";

#[derive(Default)]
pub struct YoutubeExtractor;

impl YoutubeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Canonicalize a watch href to `BASE_URL/watch?v={id}`.
    fn canonical_watch_url(href: &str) -> Option<String> {
        let absolute = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{BASE_URL}/{}", href.trim_start_matches('/'))
        };
        let parsed = Url::parse(&absolute).ok()?;
        let video_id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?;
        Some(format!("{BASE_URL}/watch?v={video_id}"))
    }
}

#[async_trait(?Send)]
impl SiteExtractor for YoutubeExtractor {
    fn site(&self) -> Site {
        Site::Youtube
    }

    fn rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let row_selector = Selector::parse("ytd-playlist-video-renderer").unwrap();
        document.select(&row_selector).collect()
    }

    async fn resolve(
        &self,
        _document: &Html,
        row: &ElementRef<'_>,
        row_index: usize,
    ) -> Result<RowOutcome> {
        let title_selector = Selector::parse("a#video-title").unwrap();
        let Some(title_link) = row.select(&title_selector).next() else {
            return Ok(RowOutcome::skip("no video link"));
        };
        let Some(href) = title_link.value().attr("href") else {
            return Ok(RowOutcome::skip("video link has no href"));
        };
        let Some(location) = Self::canonical_watch_url(href) else {
            log::warn!("row {row_index}: href {href:?} has no video id");
            return Ok(RowOutcome::skip("no video id in href"));
        };

        let raw_title = title_link.text().collect::<String>().trim().to_string();

        let channel_selector = Selector::parse("ytd-channel-name a").unwrap();
        let channel = row
            .select(&channel_selector)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string());

        let duration_selector =
            Selector::parse("ytd-thumbnail-overlay-time-status-renderer span").unwrap();
        let duration_ms = row
            .select(&duration_selector)
            .find_map(|span| parse_duration_ms(&span.text().collect::<String>()));

        let split = split_listing_title(&raw_title);
        let mut record = TrackRecord::new(location);
        if !split.title.is_empty() {
            record.title = split.title;
        }
        let artist = split.artist.or(channel);
        if let Some(artist) = artist {
            // Strip the auto-channel marker regardless of which parse path
            // produced the artist.
            let artist = strip_artist_suffix(&artist).to_string();
            if !artist.is_empty() {
                record.creator = artist;
            }
        }
        record.track_number = split.track_number;
        record.duration_ms = duration_ms;
        Ok(RowOutcome::Resolved(record))
    }

    fn playlist_metadata(&self, document: &Html, page_url: &str) -> PlaylistMetadata {
        let og_title = Selector::parse("meta[property=\"og:title\"]").unwrap();
        let title = document
            .select(&og_title)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Playlist".to_string());

        let og_image = Selector::parse("meta[property=\"og:image\"]").unwrap();
        let image_url = document
            .select(&og_image)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.to_string());

        let mut metadata = PlaylistMetadata::new(title);
        metadata.image_url = image_url;
        metadata.source_page_url = Some(page_url.to_string());
        metadata
    }
}
