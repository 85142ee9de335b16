//! Export coordination and the detection/export message protocol.
//!
//! [`Message`] is the closed set of records exchanged between the detection
//! surface (which watches the page URL), the coordination layer, and the
//! initiating UI. The coordinator is the single authoritative holder of the
//! last detection: state is last-write-wins with no queue, because the
//! detection surface re-sends on every URL change.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::detect;
use crate::extractor::extractor_for;
use crate::fetch::PageFetcher;
use crate::media::MediaSurface;
use crate::pipeline::ExtractionPipeline;
use crate::sink::DeliverySink;
use crate::types::{ContentType, DetectedPage, Site};
use crate::xspf;
use crate::{ExportError, Result};

/// Messages exchanged across the detection/coordination/UI boundary.
///
/// Serialized with an `action` tag:
///
/// ```rust
/// use xspf_export::Message;
///
/// let json = serde_json::to_value(&Message::ExportPlaylist).unwrap();
/// assert_eq!(json["action"], "exportPlaylist");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    /// The detection surface classified the current page.
    PageDetected {
        #[serde(rename = "type")]
        content_type: ContentType,
        site: Site,
        url: String,
    },
    /// The current page is not a supported listing.
    PageNotDetected,
    /// The UI requested an export of the last detected page.
    ExportPlaylist,
    /// The UI asked whether the current tab holds an exportable page.
    GetTabStatus,
    /// Response to [`Message::GetTabStatus`].
    TabStatus { valid: bool },
    /// An export finished and the file was delivered.
    ExportSuccess { filename: String },
    /// An export failed; extraction and delivery failures both land here,
    /// distinguished by the message text.
    ExportError { message: String },
}

/// Routes detected pages to the matching extractor, runs the pipeline, and
/// hands the serialized playlist to the delivery sink.
pub struct ExportCoordinator {
    fetcher: PageFetcher,
    sink: Box<dyn DeliverySink>,
    surface: Option<Arc<dyn MediaSurface>>,
    skip_first_record: bool,
    detection: watch::Sender<Option<DetectedPage>>,
}

impl ExportCoordinator {
    pub fn new(fetcher: PageFetcher, sink: Box<dyn DeliverySink>) -> Self {
        let (detection, _) = watch::channel(None);
        Self {
            fetcher,
            sink,
            surface: None,
            skip_first_record: false,
            detection,
        }
    }

    /// Attach a media surface for player-driven sites.
    pub fn with_media_surface(mut self, surface: Arc<dyn MediaSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Opt in to the drop-first-captured-record policy where it applies.
    pub fn with_skip_first_record(mut self, skip: bool) -> Self {
        self.skip_first_record = skip;
        self
    }

    /// Classify a URL and store the result as the current detection state.
    ///
    /// Called on every URL change, including SPA navigations without a full
    /// reload. Returns the message the detection surface would broadcast.
    pub fn update_detection(&self, url: &str) -> Message {
        match detect::classify(url) {
            Some(page) => {
                let message = Message::PageDetected {
                    content_type: page.content_type,
                    site: page.site,
                    url: page.url.clone(),
                };
                self.detection.send_replace(Some(page));
                message
            }
            None => {
                self.detection.send_replace(None);
                Message::PageNotDetected
            }
        }
    }

    /// The most recently stored detection, if any.
    pub fn last_detection(&self) -> Option<DetectedPage> {
        self.detection.borrow().clone()
    }

    /// Observe detection state changes.
    pub fn detection_changes(&self) -> watch::Receiver<Option<DetectedPage>> {
        self.detection.subscribe()
    }

    /// Whether the current tab holds an exportable page.
    pub fn tab_valid(&self) -> bool {
        self.detection.borrow().is_some()
    }

    /// Dispatch one protocol message, producing the response to send back.
    pub async fn handle(&self, message: Message) -> Option<Message> {
        match message {
            Message::PageDetected {
                content_type,
                site,
                url,
            } => {
                self.detection.send_replace(Some(DetectedPage {
                    site,
                    content_type,
                    url,
                }));
                None
            }
            Message::PageNotDetected => {
                self.detection.send_replace(None);
                None
            }
            Message::GetTabStatus => Some(Message::TabStatus {
                valid: self.tab_valid(),
            }),
            Message::ExportPlaylist => Some(match self.export().await {
                Ok(filename) => Message::ExportSuccess { filename },
                Err(e) => Message::ExportError {
                    message: e.to_string(),
                },
            }),
            // Responses are never routed back into the coordinator.
            Message::TabStatus { .. }
            | Message::ExportSuccess { .. }
            | Message::ExportError { .. } => None,
        }
    }

    /// Run the full export for the last detected page.
    ///
    /// Returns the delivered filename.
    pub async fn export(&self) -> Result<String> {
        let page = self.last_detection().ok_or_else(|| {
            ExportError::Unsupported("no supported page detected".to_string())
        })?;
        log::info!("exporting {:?} page {}", page.site, page.url);

        let extractor = extractor_for(
            &page,
            &self.fetcher,
            self.surface.clone(),
            self.skip_first_record,
        )?;
        let document = self.fetcher.get_document(&page.url).await?;

        let pipeline = ExtractionPipeline::new(extractor.as_ref());
        let extraction = pipeline.run(&document, &page.url).await?;

        let xml = xspf::serialize(&extraction.metadata, &extraction.tracks);
        let filename = extraction.metadata.suggested_filename(page.site.tag());
        self.sink.deliver(&filename, &xml).await?;
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_round_trip_with_action_tags() {
        let detected = Message::PageDetected {
            content_type: ContentType::Album,
            site: Site::Khinsider,
            url: "https://downloads.khinsider.com/game-soundtracks/album/x".to_string(),
        };
        let json = serde_json::to_value(&detected).unwrap();
        assert_eq!(json["action"], "pageDetected");
        assert_eq!(json["type"], "album");
        assert_eq!(json["site"], "khinsider");

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, detected);

        let status = serde_json::to_value(&Message::TabStatus { valid: true }).unwrap();
        assert_eq!(status["action"], "tabStatus");
        assert_eq!(status["valid"], true);

        let err = serde_json::to_value(&Message::ExportError {
            message: "no rows found".to_string(),
        })
        .unwrap();
        assert_eq!(err["action"], "exportError");
    }
}
