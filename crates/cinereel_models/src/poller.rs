//! Drives a long-running video operation to completion.

use crate::{GenerativeBackend, PollConfig, VideoOperation};
use cinereel_error::{CinereelResult, ENTITY_NOT_FOUND_MESSAGE, GeminiError, GeminiErrorKind};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Polls a video operation handle until the service reports it done.
///
/// The wait between checks is a plain sleep inside the loop, so nothing is left
/// scheduled once [`wait`](Self::wait) returns or its future is dropped.
pub struct VideoPoller<'a> {
    backend: &'a dyn GenerativeBackend,
    config: PollConfig,
}

impl<'a> VideoPoller<'a> {
    /// Create a poller over `backend`.
    pub fn new(backend: &'a dyn GenerativeBackend, config: PollConfig) -> Self {
        Self { backend, config }
    }

    /// Wait for `operation` to finish and return the produced video URI.
    ///
    /// Without a configured timeout this waits as long as the service keeps the
    /// job pending.
    #[instrument(skip(self, operation), fields(operation = %operation.name))]
    pub async fn wait(&self, mut operation: VideoOperation) -> CinereelResult<String> {
        let started = Instant::now();
        let mut checks = 0u32;

        while !operation.done {
            if let Some(timeout) = self.config.timeout.filter(|t| started.elapsed() >= *t) {
                warn!(checks, "Video operation exceeded poll timeout");
                return Err(GeminiError::new(GeminiErrorKind::PollTimeout(timeout.as_secs())).into());
            }

            tokio::time::sleep(self.config.interval).await;
            operation = self.backend.refresh_operation(&operation).await?;
            checks += 1;
            debug!(checks, done = operation.done, "Checked video operation");
        }

        if let Some(status) = operation.error.as_ref() {
            warn!(code = ?status.code, message = %status.message, "Video operation failed");
            let kind = if status.message.contains(ENTITY_NOT_FOUND_MESSAGE) {
                GeminiErrorKind::EntityNotFound(status.message.clone())
            } else {
                GeminiErrorKind::OperationFailed(status.message.clone())
            };
            return Err(GeminiError::new(kind).into());
        }

        let uri = operation
            .video_uri()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::NoVideoReference))?;
        info!(checks, "Video operation completed");
        Ok(uri.to_string())
    }
}
