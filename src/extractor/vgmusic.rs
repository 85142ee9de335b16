//! Fan archive extractor (direct attribute).
//!
//! Listing rows link straight at the media file, so no second fetch is
//! needed: the href joined against the page URL is the final location.
//! Title and composer come from sibling cells; when the composer cell is
//! missing, a combined "Artist - Title" caption is split instead. The site
//! prints no durations.

use async_trait::async_trait;
use http_types::Url;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::split_caption;
use crate::types::{PlaylistMetadata, RowOutcome, Site, TrackRecord};
use crate::{ExportError, Result};

use super::SiteExtractor;

pub struct VgmusicExtractor {
    page_url: Url,
}

impl VgmusicExtractor {
    pub fn new(page_url: &str) -> Result<Self> {
        let page_url = Url::parse(page_url)
            .map_err(|e| ExportError::Parse(format!("invalid page URL {page_url}: {e}")))?;
        Ok(Self { page_url })
    }
}

#[async_trait(?Send)]
impl SiteExtractor for VgmusicExtractor {
    fn site(&self) -> Site {
        Site::Vgmusic
    }

    fn rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let row_selector = Selector::parse("table tr").unwrap();
        let link_selector = Selector::parse("td a[href$=\".mid\"]").unwrap();
        document
            .select(&row_selector)
            .filter(|row| row.select(&link_selector).next().is_some())
            .collect()
    }

    async fn resolve(
        &self,
        _document: &Html,
        row: &ElementRef<'_>,
        _row_index: usize,
    ) -> Result<RowOutcome> {
        let link_selector = Selector::parse("td a[href$=\".mid\"]").unwrap();
        let Some(link) = row.select(&link_selector).next() else {
            return Ok(RowOutcome::skip("no media link"));
        };
        let Some(href) = link.value().attr("href") else {
            return Ok(RowOutcome::skip("media link has no href"));
        };
        let location = match self.page_url.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => return Ok(RowOutcome::skip("unresolvable media href")),
        };

        let raw_title = link.text().collect::<String>().trim().to_string();

        let cell_selector = Selector::parse("td").unwrap();
        let composer = row
            .select(&cell_selector)
            .nth(1)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty());

        let mut record = TrackRecord::new(location);
        match composer {
            Some(composer) => {
                if !raw_title.is_empty() {
                    record.title = raw_title;
                }
                record.creator = composer;
            }
            None => {
                // Combined caption: first segment is the artist.
                let (artist, title) = split_caption(&raw_title);
                if !title.is_empty() {
                    record.title = title;
                }
                if let Some(artist) = artist {
                    record.creator = artist;
                }
            }
        }
        Ok(RowOutcome::Resolved(record))
    }

    fn playlist_metadata(&self, document: &Html, page_url: &str) -> PlaylistMetadata {
        let heading_selector = Selector::parse("h1, h2").unwrap();
        let title_selector = Selector::parse("title").unwrap();
        let title = document
            .select(&heading_selector)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| {
                document
                    .select(&title_selector)
                    .next()
                    .map(|t| t.text().collect::<String>().trim().to_string())
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| "Music Archive".to_string());

        let mut metadata = PlaylistMetadata::new(title);
        metadata.source_page_url = Some(page_url.to_string());
        metadata
    }
}
