//! Streaming album extractor (deferred redirect).
//!
//! Album rows expose a play trigger instead of a static link. Resolution
//! fires the trigger on the shared [`MediaSurface`], waits for its
//! metadata-ready notification (bounded by [`WaitConfig::upper_bound`]), then
//! reads the loaded stream URL and duration. Because the surface holds one
//! item at a time this variant is strictly sequential; the pipeline's loop
//! guarantees that.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::media::{await_resolution, MediaSurface, WaitConfig};
use crate::normalize::parse_duration_ms;
use crate::types::{PlaylistMetadata, RowOutcome, Site, TrackRecord};
use crate::Result;

use super::SiteExtractor;

/// Patterns a resolved source URL must match to count as playable media.
const STREAM_MARKERS: &[&str] = &["/stream/", ".mp3"];

pub struct BandcampExtractor {
    surface: Arc<dyn MediaSurface>,
    wait: WaitConfig,
    skip_first_record: bool,
}

impl BandcampExtractor {
    pub fn new(surface: Arc<dyn MediaSurface>) -> Self {
        Self {
            surface,
            wait: WaitConfig::default(),
            skip_first_record: false,
        }
    }

    /// Override the resolution wait timing.
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Opt in to dropping the first captured record.
    ///
    /// On some album pages the first play click only primes the player and
    /// the captured item belongs to no row. Whether this is a permanent
    /// workflow requirement is unclear, so it stays opt-in.
    pub fn with_skip_first_record(mut self, skip: bool) -> Self {
        self.skip_first_record = skip;
        self
    }

    fn looks_like_stream(url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        STREAM_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    fn album_artist(document: &Html) -> Option<String> {
        let artist_selector = Selector::parse("#name-section h3 span a").unwrap();
        document
            .select(&artist_selector)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .filter(|artist| !artist.is_empty())
    }

    fn album_title(document: &Html) -> Option<String> {
        let title_selector = Selector::parse("#name-section h2.trackTitle").unwrap();
        document
            .select(&title_selector)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    }
}

#[async_trait(?Send)]
impl SiteExtractor for BandcampExtractor {
    fn site(&self) -> Site {
        Site::Bandcamp
    }

    fn rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let row_selector = Selector::parse("table#track_table tr.track_row_view").unwrap();
        document.select(&row_selector).collect()
    }

    async fn resolve(
        &self,
        document: &Html,
        row: &ElementRef<'_>,
        row_index: usize,
    ) -> Result<RowOutcome> {
        let title_selector = Selector::parse("span.track-title").unwrap();
        let Some(title) = row
            .select(&title_selector)
            .next()
            .map(|span| span.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
        else {
            return Ok(RowOutcome::skip("no track title"));
        };

        let trigger_selector = Selector::parse("td.play-col .play_status").unwrap();
        if row.select(&trigger_selector).next().is_none() {
            return Ok(RowOutcome::skip("no play trigger"));
        }

        // Arm the wait before firing so the notification cannot be missed.
        let ready = self.surface.ready_events();
        if let Err(e) = self.surface.activate(row_index).await {
            log::warn!("row {row_index} ('{title}'): play trigger failed: {e}");
            return Ok(RowOutcome::skip("play trigger failed"));
        }
        let signaled = await_resolution(ready, &self.wait).await;
        if !signaled {
            log::warn!("row {row_index} ('{title}'): no metadata signal, reading surface anyway");
        }

        let Some(media) = self.surface.current() else {
            return Ok(RowOutcome::skip("no media loaded on surface"));
        };
        if !Self::looks_like_stream(&media.source_url) {
            log::warn!(
                "row {row_index} ('{title}'): loaded source {} is not a stream URL",
                media.source_url
            );
            return Ok(RowOutcome::skip("loaded source is not a stream URL"));
        }

        let number_selector = Selector::parse("td.track_number, div.track_number").unwrap();
        let track_number = row.select(&number_selector).next().and_then(|cell| {
            cell.text()
                .collect::<String>()
                .trim()
                .trim_end_matches('.')
                .parse::<u32>()
                .ok()
        });

        let time_selector = Selector::parse("span.time").unwrap();
        let listed_duration = row
            .select(&time_selector)
            .find_map(|span| parse_duration_ms(&span.text().collect::<String>()));

        let mut record = TrackRecord::new(media.source_url);
        record.title = title;
        if let Some(artist) = Self::album_artist(document) {
            record.creator = artist;
        }
        record.album = Self::album_title(document);
        record.track_number = track_number;
        // Prefer what the player measured over the printed row text.
        record.duration_ms = media.duration_ms.or(listed_duration);
        Ok(RowOutcome::Resolved(record))
    }

    fn playlist_metadata(&self, document: &Html, page_url: &str) -> PlaylistMetadata {
        let title = match (Self::album_title(document), Self::album_artist(document)) {
            (Some(album), Some(artist)) => format!("{artist} - {album}"),
            (Some(album), None) => album,
            _ => "Album".to_string(),
        };

        let image_selector = Selector::parse("div#tralbumArt img").unwrap();
        let image_url = document
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| src.to_string());

        let mut metadata = PlaylistMetadata::new(title);
        metadata.image_url = image_url;
        metadata.source_page_url = Some(page_url.to_string());
        metadata
    }

    fn skip_first_record(&self) -> bool {
        self.skip_first_record
    }
}
