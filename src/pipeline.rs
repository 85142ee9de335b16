//! The page-to-playlist extraction pipeline.
//!
//! Drives one [`SiteExtractor`] over every candidate row of a detected page,
//! strictly one row at a time and in source order. Sequential resolution is
//! load-bearing: the deferred-redirect variant shares a single-item media
//! surface that would cross-talk under overlapping resolutions, and it keeps
//! output ordering deterministic regardless of per-row fetch latency.

use std::collections::HashSet;

use scraper::Html;

use crate::extractor::SiteExtractor;
use crate::types::{PlaylistMetadata, RowOutcome, TrackRecord};
use crate::{ExportError, Result};

/// The accumulated result of one pipeline run.
///
/// Constructed fresh per run and discarded once delivered; there is no
/// cross-run state.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub metadata: PlaylistMetadata,
    pub tracks: Vec<TrackRecord>,
}

pub struct ExtractionPipeline<'a> {
    extractor: &'a dyn SiteExtractor,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(extractor: &'a dyn SiteExtractor) -> Self {
        Self { extractor }
    }

    /// Run the pipeline over a fetched page.
    ///
    /// Row failures are recovered (logged, row skipped); duplicates by
    /// resolved location are dropped with the first occurrence winning.
    /// Zero candidate rows is [`ExportError::NoRows`]; rows that all fail to
    /// resolve is [`ExportError::NoTracks`]. Neither produces a file.
    pub async fn run(&self, document: &Html, page_url: &str) -> Result<Extraction> {
        let rows = self.extractor.rows(document);
        if rows.is_empty() {
            return Err(ExportError::NoRows);
        }
        log::debug!("found {} candidate rows", rows.len());

        let mut tracks: Vec<TrackRecord> = Vec::new();
        let mut seen_locations: HashSet<String> = HashSet::new();

        for (row_index, row) in rows.iter().enumerate() {
            match self.extractor.resolve(document, row, row_index).await {
                Ok(RowOutcome::Resolved(record)) => {
                    if record.location.is_empty() {
                        log::warn!("row {row_index}: resolved record has empty location, dropped");
                        continue;
                    }
                    if !seen_locations.insert(record.location.clone()) {
                        log::debug!(
                            "row {row_index}: duplicate location {}, dropped",
                            record.location
                        );
                        continue;
                    }
                    log::debug!("row {row_index}: resolved '{}'", record.title);
                    tracks.push(record);
                }
                Ok(RowOutcome::Skip(reason)) => {
                    log::debug!("row {row_index}: skipped ({reason})");
                }
                Err(e) => {
                    log::warn!("row {row_index}: resolution failed: {e}");
                }
            }
        }

        if self.extractor.skip_first_record() && !tracks.is_empty() {
            let dropped = tracks.remove(0);
            log::debug!("dropped first captured record '{}' (priming row)", dropped.title);
        }

        if tracks.is_empty() {
            return Err(ExportError::NoTracks);
        }

        let metadata = self.extractor.playlist_metadata(document, page_url);
        log::info!("extracted {} tracks from '{}'", tracks.len(), metadata.title);
        Ok(Extraction { metadata, tracks })
    }
}
