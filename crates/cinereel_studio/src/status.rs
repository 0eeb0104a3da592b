//! Status messages and the video progress ticker.

use cinereel_core::VIDEO_PROGRESS_MESSAGES;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What the studio is doing right now.
///
/// `Display` gives the short line a front end shows in its status bar.
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_more::Display)]
pub enum StudioStatus {
    /// Nothing in flight
    #[default]
    #[display("")]
    Idle,
    /// Hero analysis running
    #[display("DNA Analysis...")]
    Analyzing,
    /// Hero analysis finished
    #[display("DNA Locked")]
    DnaLocked,
    /// Manifest generation running
    #[display("Directing...")]
    Directing,
    /// Scene frame render running
    #[display("Rendering Sc {}...", scene_number)]
    Rendering {
        /// Scene being rendered
        scene_number: u32,
    },
    /// Video job pending, with the current progress message
    #[display("Sc {}: {}", scene_number, message)]
    Extending {
        /// Scene being animated
        scene_number: u32,
        /// Rotating progress message
        message: String,
    },
    /// A new API key was selected
    #[display("Key Updated")]
    KeyUpdated,
    /// One-off notice (exports)
    #[display("{}", _0)]
    Notice(String),
}

/// Rotates the video progress messages while alive.
///
/// The first message is published immediately, then one every `interval`.
/// Dropping the guard aborts the task; [`stop`](Self::stop) also waits for it.
pub(crate) struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    pub(crate) fn start(
        status: Arc<watch::Sender<StudioStatus>>,
        scene_number: u32,
        interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            for message in VIDEO_PROGRESS_MESSAGES.iter().cycle() {
                ticks.tick().await;
                status.send_replace(StudioStatus::Extending {
                    scene_number,
                    message: (*message).to_string(),
                });
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Abort the task and wait until it is gone.
    pub(crate) async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            match handle.await {
                Err(e) if !e.is_cancelled() => {
                    tracing::warn!(error = %e, "Progress ticker ended abnormally");
                }
                _ => {}
            }
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
