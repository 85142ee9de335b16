//! Pipeline-level properties: ordering, deduplication, empty-input statuses,
//! and the skip-first-record policy, exercised through a scripted extractor
//! over synthetic documents.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use xspf_export::normalize::{parse_duration_ms, split_listing_title};
use xspf_export::{
    ExportError, ExtractionPipeline, PlaylistMetadata, Result, RowOutcome, Site, SiteExtractor,
    TrackRecord,
};

/// Resolves rows scripted as `<li>` items.
///
/// Item text is `location|raw title|duration[|delay_ms]`, or `skip` for a row
/// that signals nothing exportable. Fields run through the same normalizers
/// the real extractors use.
struct ScriptedExtractor {
    skip_first_record: bool,
}

impl ScriptedExtractor {
    fn new() -> Self {
        Self {
            skip_first_record: false,
        }
    }
}

#[async_trait(?Send)]
impl SiteExtractor for ScriptedExtractor {
    fn site(&self) -> Site {
        Site::Vgmusic
    }

    fn rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let selector = Selector::parse("li").unwrap();
        document.select(&selector).collect()
    }

    async fn resolve(
        &self,
        _document: &Html,
        row: &ElementRef<'_>,
        _row_index: usize,
    ) -> Result<RowOutcome> {
        let text = row.text().collect::<String>();
        if text.trim() == "skip" {
            return Ok(RowOutcome::skip("scripted skip"));
        }

        let fields: Vec<&str> = text.trim().split('|').collect();
        if let Some(delay_ms) = fields.get(3).and_then(|d| d.parse::<u64>().ok()) {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let split = split_listing_title(fields[1]);
        let mut record = TrackRecord::new(fields[0].to_string());
        record.title = split.title;
        if let Some(artist) = split.artist {
            record.creator = artist;
        }
        record.track_number = split.track_number;
        record.duration_ms = parse_duration_ms(fields[2]);
        Ok(RowOutcome::Resolved(record))
    }

    fn playlist_metadata(&self, document: &Html, page_url: &str) -> PlaylistMetadata {
        let selector = Selector::parse("h1").unwrap();
        let title = document
            .select(&selector)
            .next()
            .map(|h| h.text().collect::<String>())
            .unwrap_or_else(|| "Scripted".to_string());
        let mut metadata = PlaylistMetadata::new(title);
        metadata.source_page_url = Some(page_url.to_string());
        metadata
    }

    fn skip_first_record(&self) -> bool {
        self.skip_first_record
    }
}

async fn run(extractor: &ScriptedExtractor, html: &str) -> Result<xspf_export::Extraction> {
    let document = Html::parse_document(html);
    ExtractionPipeline::new(extractor)
        .run(&document, "https://example.com/page")
        .await
}

#[tokio::test]
async fn three_row_scenario_with_duplicate() {
    let html = r"<h1>Demo</h1><ul>
        <li>locA|Artist - 1 - SongA|2:30</li>
        <li>locA|Artist - 1 - SongA|2:30</li>
        <li>locB|Artist - 2 - SongB|1:05:00</li>
    </ul>";
    let extraction = run(&ScriptedExtractor::new(), html).await.unwrap();

    assert_eq!(extraction.tracks.len(), 2);

    let first = &extraction.tracks[0];
    assert_eq!(first.location, "locA");
    assert_eq!(first.title, "SongA");
    assert_eq!(first.creator, "Artist");
    assert_eq!(first.track_number, Some(1));
    assert_eq!(first.duration_ms, Some(150_000));

    let second = &extraction.tracks[1];
    assert_eq!(second.location, "locB");
    assert_eq!(second.title, "SongB");
    assert_eq!(second.duration_ms, Some(3_900_000));
}

#[tokio::test]
async fn duplicate_keeps_first_occurrence_rank() {
    let html = r"<ul>
        <li>locA|A - First|1:00</li>
        <li>locB|B - Second|1:00</li>
        <li>locA|A - First Again|1:00</li>
        <li>locC|C - Third|1:00</li>
    </ul>";
    let extraction = run(&ScriptedExtractor::new(), html).await.unwrap();
    let locations: Vec<&str> = extraction
        .tracks
        .iter()
        .map(|t| t.location.as_str())
        .collect();
    assert_eq!(locations, vec!["locA", "locB", "locC"]);
    // First occurrence wins: the later duplicate never replaces the title.
    assert_eq!(extraction.tracks[0].title, "First");
}

#[tokio::test]
async fn ordering_is_independent_of_row_latency() {
    // Earlier rows resolve slower than later ones; output stays in row order
    // because resolution is strictly sequential.
    let html = r"<ul>
        <li>loc1|A - One|0:10|60</li>
        <li>loc2|A - Two|0:10|30</li>
        <li>loc3|A - Three|0:10|5</li>
    </ul>";
    let extraction = run(&ScriptedExtractor::new(), html).await.unwrap();
    let locations: Vec<&str> = extraction
        .tracks
        .iter()
        .map(|t| t.location.as_str())
        .collect();
    assert_eq!(locations, vec!["loc1", "loc2", "loc3"]);
}

#[tokio::test]
async fn skipped_rows_do_not_break_the_run() {
    let html = r"<ul>
        <li>skip</li>
        <li>locA|A - Kept|0:30</li>
        <li>skip</li>
    </ul>";
    let extraction = run(&ScriptedExtractor::new(), html).await.unwrap();
    assert_eq!(extraction.tracks.len(), 1);
    assert_eq!(extraction.tracks[0].title, "Kept");
}

#[tokio::test]
async fn zero_rows_reports_no_rows() {
    let err = run(&ScriptedExtractor::new(), "<p>nothing here</p>")
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::NoRows));
}

#[tokio::test]
async fn rows_without_resolutions_report_no_tracks() {
    let html = "<ul><li>skip</li><li>skip</li></ul>";
    let err = run(&ScriptedExtractor::new(), html).await.unwrap_err();
    assert!(matches!(err, ExportError::NoTracks));
}

#[tokio::test]
async fn skip_first_record_drops_the_priming_capture() {
    let mut extractor = ScriptedExtractor::new();
    extractor.skip_first_record = true;
    let html = r"<ul>
        <li>locA|A - Primer|0:10</li>
        <li>locB|A - Real One|0:10</li>
    </ul>";
    let extraction = run(&extractor, html).await.unwrap();
    assert_eq!(extraction.tracks.len(), 1);
    assert_eq!(extraction.tracks[0].title, "Real One");
}

#[tokio::test]
async fn skip_first_record_can_empty_the_playlist() {
    let mut extractor = ScriptedExtractor::new();
    extractor.skip_first_record = true;
    let html = "<ul><li>locA|A - Only|0:10</li></ul>";
    let err = run(&extractor, html).await.unwrap_err();
    assert!(matches!(err, ExportError::NoTracks));
}

#[tokio::test]
async fn metadata_comes_from_the_page() {
    let html = "<h1>Page Heading</h1><ul><li>locA|A - T|0:10</li></ul>";
    let extraction = run(&ScriptedExtractor::new(), html).await.unwrap();
    assert_eq!(extraction.metadata.title, "Page Heading");
    assert_eq!(
        extraction.metadata.source_page_url.as_deref(),
        Some("https://example.com/page")
    );
}
