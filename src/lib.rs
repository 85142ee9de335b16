pub mod coordinator;
pub mod detect;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod media;
pub mod normalize;
pub mod pipeline;
pub mod sink;
pub mod types;
pub mod xspf;

pub use coordinator::{ExportCoordinator, Message};
pub use detect::classify;
pub use error::ExportError;
pub use extractor::SiteExtractor;
pub use fetch::PageFetcher;
pub use media::{await_resolution, LoadedMedia, MediaSurface, WaitConfig};
pub use pipeline::{Extraction, ExtractionPipeline};
pub use sink::{DeliverySink, FileSink};
pub use types::{
    ContentType, DetectedPage, PlaylistMetadata, RowOutcome, Site, TrackRecord,
};

// Re-export scraper types for embedders and tests
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, ExportError>;
