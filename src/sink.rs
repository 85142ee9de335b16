//! Delivery sinks for finished playlists.
//!
//! The pipeline hands serialized XSPF text plus a suggested filename to a
//! [`DeliverySink`]; what "persist" means is up to the implementation. The
//! built-in [`FileSink`] writes into a directory; embedders (a browser
//! extension bridge, for instance) provide their own.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{ExportError, Result};

/// Persists a serialized playlist document.
///
/// Delivery failures are reported as [`ExportError::Delivery`], distinct from
/// extraction failures: the playlist itself was valid, so the whole run is
/// safe to retry.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait DeliverySink {
    async fn deliver(&self, filename: &str, body: &str) -> Result<()>;
}

/// Writes playlists as files into a target directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait(?Send)]
impl DeliverySink for FileSink {
    async fn deliver(&self, filename: &str, body: &str) -> Result<()> {
        let path = self.directory.join(filename);
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| ExportError::Delivery(format!("write {}: {e}", path.display())))?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_sink_writes_the_document() {
        let dir = std::env::temp_dir().join("xspf-export-sink-test");
        std::fs::create_dir_all(&dir).unwrap();
        let sink = FileSink::new(&dir);

        sink.deliver("out.xspf", "<playlist/>").await.unwrap();
        let written = std::fs::read_to_string(dir.join("out.xspf")).unwrap();
        assert_eq!(written, "<playlist/>");

        std::fs::remove_file(dir.join("out.xspf")).ok();
    }

    #[tokio::test]
    async fn missing_directory_is_a_delivery_error() {
        let sink = FileSink::new("/nonexistent-xspf-export-dir");
        let err = sink.deliver("out.xspf", "x").await.unwrap_err();
        assert!(matches!(err, ExportError::Delivery(_)));
    }
}
