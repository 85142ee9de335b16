//! OST archive extractor (two-hop fetch).
//!
//! Album pages list tracks in a table whose links point at intermediate
//! track pages, not at the media itself. Each row costs one extra fetch: the
//! track page is parsed and the real media URL read from its audio element
//! (or download link). Fetch failures and missing markers skip the row, never
//! abort the run, and there is no retry.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::fetch::PageFetcher;
use crate::normalize::parse_duration_ms;
use crate::types::{PlaylistMetadata, RowOutcome, Site, TrackRecord};
use crate::Result;

use super::SiteExtractor;

const BASE_URL: &str = "https://downloads.khinsider.com";

/// Extensions accepted as final media URLs on track pages.
const MEDIA_EXTENSIONS: &[&str] = &[".mp3", ".flac", ".ogg", ".m4a"];

pub struct KhinsiderExtractor {
    fetcher: PageFetcher,
}

impl KhinsiderExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Join a row href against the site base, normalizing the leading slash.
    fn absolute_url(href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        let path = href.trim_start_matches('/');
        format!("{BASE_URL}/{path}")
    }

    /// Pull the final media URL out of a fetched track page.
    fn media_url(track_page: &Html) -> Option<String> {
        let audio_selector = Selector::parse("audio").unwrap();
        if let Some(audio) = track_page.select(&audio_selector).next() {
            if let Some(src) = audio.value().attr("src") {
                if !src.is_empty() {
                    return Some(src.to_string());
                }
            }
        }

        // Fallback: the "click here to download" style anchor.
        let link_selector = Selector::parse("a").unwrap();
        track_page
            .select(&link_selector)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| {
                let lower = href.to_ascii_lowercase();
                MEDIA_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
            })
            .map(|href| href.to_string())
    }
}

#[async_trait(?Send)]
impl SiteExtractor for KhinsiderExtractor {
    fn site(&self) -> Site {
        Site::Khinsider
    }

    fn rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let row_selector = Selector::parse("table#songlist tr").unwrap();
        let link_selector = Selector::parse("td.clickable-row a").unwrap();
        document
            .select(&row_selector)
            // Header and footer rows carry no track link.
            .filter(|row| row.select(&link_selector).next().is_some())
            .collect()
    }

    async fn resolve(
        &self,
        _document: &Html,
        row: &ElementRef<'_>,
        row_index: usize,
    ) -> Result<RowOutcome> {
        let link_selector = Selector::parse("td.clickable-row a").unwrap();
        let Some(link) = row.select(&link_selector).next() else {
            return Ok(RowOutcome::skip("no track link"));
        };
        let Some(href) = link.value().attr("href") else {
            return Ok(RowOutcome::skip("track link has no href"));
        };

        let title = link.text().collect::<String>().trim().to_string();
        let track_page_url = Self::absolute_url(href);

        // Duration sits in a sibling cell styled like the title cell.
        let duration_ms = row
            .select(&link_selector)
            .skip(1)
            .find_map(|cell| parse_duration_ms(&cell.text().collect::<String>()));

        // Track number cell, e.g. "12."
        let number_selector = Selector::parse("td").unwrap();
        let track_number = row
            .select(&number_selector)
            .next()
            .and_then(|cell| {
                cell.text()
                    .collect::<String>()
                    .trim()
                    .trim_end_matches('.')
                    .parse::<u32>()
                    .ok()
            });

        // Second hop: the row link points at an intermediate track page.
        let track_page = match self.fetcher.get_document(&track_page_url).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!("row {row_index} ('{title}'): track page fetch failed: {e}");
                return Ok(RowOutcome::skip("track page fetch failed"));
            }
        };

        let Some(location) = Self::media_url(&track_page) else {
            log::warn!("row {row_index} ('{title}'): no media link on track page");
            return Ok(RowOutcome::skip("no media link on track page"));
        };

        let mut record = TrackRecord::new(location);
        if !title.is_empty() {
            record.title = title;
        }
        record.track_number = track_number;
        record.duration_ms = duration_ms;
        Ok(RowOutcome::Resolved(record))
    }

    fn playlist_metadata(&self, document: &Html, page_url: &str) -> PlaylistMetadata {
        let heading_selector = Selector::parse("h2").unwrap();
        let title = document
            .select(&heading_selector)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Soundtrack".to_string());

        let image_selector = Selector::parse(".albumImage img").unwrap();
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
}
