//! Per-site extraction strategies.
//!
//! Each supported site implements [`SiteExtractor`]: the same pipeline drives
//! all of them, and the detector's classification picks which one runs. The
//! variants differ in how a row becomes a track record:
//!
//! - [`khinsider`] follows each row's link to an intermediate track page and
//!   reads the real media URL there (two-hop fetch).
//! - [`youtube`] joins relative hrefs against the site base and parses
//!   "Artist - N - Title" row text (template-token).
//! - [`bandcamp`] fires the row's play trigger and waits on the shared media
//!   surface for the stream URL (deferred redirect).
//! - [`vgmusic`] reads the media URL and fields directly off the row
//!   (direct attribute).

pub mod bandcamp;
pub mod khinsider;
pub mod vgmusic;
pub mod youtube;

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html};

use crate::fetch::PageFetcher;
use crate::media::MediaSurface;
use crate::types::{DetectedPage, PlaylistMetadata, RowOutcome, Site};
use crate::{ExportError, Result};

pub use bandcamp::BandcampExtractor;
pub use khinsider::KhinsiderExtractor;
pub use vgmusic::VgmusicExtractor;
pub use youtube::YoutubeExtractor;

/// One site's strategy for turning listing rows into track records.
#[async_trait(?Send)]
pub trait SiteExtractor {
    fn site(&self) -> Site;

    /// Candidate row handles in page order.
    fn rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>>;

    /// Resolve one row into a track record or a skip signal.
    ///
    /// Per-row failures are recovered by the pipeline: returning an error has
    /// the same effect as a skip, but with a warning logged.
    async fn resolve(
        &self,
        document: &Html,
        row: &ElementRef<'_>,
        row_index: usize,
    ) -> Result<RowOutcome>;

    /// Playlist-level metadata, extracted once per run independent of rows.
    fn playlist_metadata(&self, document: &Html, page_url: &str) -> PlaylistMetadata;

    /// Whether the first captured record should be dropped post-hoc.
    ///
    /// On some player-driven pages the first trigger is a priming no-op; this
    /// is an explicit, site-specific opt-in rather than universal behavior.
    fn skip_first_record(&self) -> bool {
        false
    }
}

/// Select the extractor matching a detected page.
///
/// `surface` is only required for player-driven sites; `skip_first_record`
/// applies to those as well and is ignored elsewhere.
pub fn extractor_for(
    page: &DetectedPage,
    fetcher: &PageFetcher,
    surface: Option<Arc<dyn MediaSurface>>,
    skip_first_record: bool,
) -> Result<Box<dyn SiteExtractor>> {
    match page.site {
        Site::Khinsider => Ok(Box::new(KhinsiderExtractor::new(fetcher.clone()))),
        Site::Youtube => Ok(Box::new(YoutubeExtractor::new())),
        Site::Bandcamp => {
            let surface = surface.ok_or_else(|| {
                ExportError::Unsupported(
                    "player-driven site requires an attached media surface".to_string(),
                )
            })?;
            Ok(Box::new(
                BandcampExtractor::new(surface).with_skip_first_record(skip_first_record),
            ))
        }
        Site::Vgmusic => Ok(Box::new(VgmusicExtractor::new(&page.url)?)),
    }
}
