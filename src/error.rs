use thiserror::Error;

/// Error types for playlist export operations.
///
/// Failures fall into two classes. Page-level failures (`NoRows`, `NoTracks`,
/// `Unsupported`, `Http` on the listing page itself, `Delivery`) abort a run
/// and are surfaced to the caller as a single status. Per-row failures never
/// appear here: a row that cannot be resolved is skipped inside the pipeline
/// and logged, and the run continues with the next row.
#[derive(Error, Debug)]
pub enum ExportError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, and non-success status
    /// codes when fetching the listing page or an intermediate track page.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a page.
    ///
    /// This can happen when a source site changes its HTML structure or
    /// returns unexpected markup.
    #[error("Failed to parse page: {0}")]
    Parse(String),

    /// The expected listing structure is missing entirely.
    ///
    /// Reported when the detected page contains zero candidate rows. This is
    /// a "nothing to export" status, not a crash: no file is produced.
    #[error("no rows found")]
    NoRows,

    /// Rows were found but none resolved to a track.
    ///
    /// Every row was skipped (missing links, failed intermediate fetches,
    /// resolution timeouts). No file is produced.
    #[error("no tracks extracted")]
    NoTracks,

    /// The page is not a supported track listing, or a required capability
    /// (such as a media surface for player-driven sites) is not attached.
    #[error("unsupported page: {0}")]
    Unsupported(String),

    /// Persisting the finished playlist failed.
    ///
    /// Kept distinct from extraction failures: the accumulated playlist was
    /// valid, so retrying the whole run is safe.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// File system I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
