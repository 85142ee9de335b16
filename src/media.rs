//! Deferred media resolution through a shared playback surface.
//!
//! Some sites never expose a static media link: the row carries a play
//! trigger, and the real stream URL only appears on the page's single shared
//! player once that trigger fires. [`MediaSurface`] abstracts that player,
//! and [`await_resolution`] is the wait primitive: a race between the
//! surface's one-shot metadata-ready notification and an upper-bound timer,
//! with a short settle delay after the notification to avoid reading the
//! surface mid-transition.
//!
//! The surface holds at most one loaded item at a time, so at most one row
//! may be armed against it; the pipeline's strictly sequential loop enforces
//! that without a lock.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};

use crate::Result;

/// The item currently loaded on the playback surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMedia {
    /// The resolved stream/source URL.
    pub source_url: String,
    /// Duration reported by the surface, if any.
    pub duration_ms: Option<u64>,
}

/// The shared on-page media player.
///
/// Implementations bridge to whatever actually drives the page (a headless
/// browser, a remote debugging session). Single-writer, single-reader: only
/// one resolution may be in flight at a time.
#[async_trait(?Send)]
pub trait MediaSurface {
    /// Fire the play trigger of the row at `row_index`.
    async fn activate(&self, row_index: usize) -> Result<()>;

    /// Subscribe to metadata-ready notifications.
    ///
    /// One notification is expected per successful activation.
    fn ready_events(&self) -> broadcast::Receiver<()>;

    /// The currently loaded item, if any.
    fn current(&self) -> Option<LoadedMedia>;
}

/// Timing for [`await_resolution`].
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Delay after the ready notification before reading the surface, to
    /// avoid racing its internal state transition.
    pub settle: Duration,
    /// Upper bound after which resolution is declared done regardless of any
    /// notification, guaranteeing forward progress.
    pub upper_bound: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            upper_bound: Duration::from_secs(12),
        }
    }
}

/// Wait for the surface to report metadata, bounded by `config.upper_bound`.
///
/// Returns `true` if the notification arrived (after the settle delay) and
/// `false` on timeout. Timeout is not an error: the caller reads whatever the
/// surface currently holds and moves on.
pub async fn await_resolution(
    mut ready: broadcast::Receiver<()>,
    config: &WaitConfig,
) -> bool {
    match timeout(config.upper_bound, ready.recv()).await {
        Ok(Ok(())) | Ok(Err(broadcast::error::RecvError::Lagged(_))) => {
            sleep(config.settle).await;
            true
        }
        // Channel closed: no notification will ever come.
        Ok(Err(broadcast::error::RecvError::Closed)) => false,
        Err(_elapsed) => {
            log::warn!(
                "media surface produced no metadata within {:?}, proceeding",
                config.upper_bound
            );
            false
        }
    }
}
