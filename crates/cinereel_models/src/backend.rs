//! The boundary to the hosted generative service.

use crate::{GenerateContentRequest, GenerateContentResponse, GenerateVideoRequest, VideoOperation};
use async_trait::async_trait;
use cinereel_core::VideoClip;
use cinereel_error::CinereelResult;

/// Raw calls offered by the generative service.
///
/// [`GeminiClient`](crate::GeminiClient) implements this over HTTP; tests plug in a
/// scripted implementation.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// `POST models/{model}:generateContent`
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> CinereelResult<GenerateContentResponse>;

    /// `POST models/{model}:predictLongRunning`, returns the operation handle.
    async fn start_video(
        &self,
        model: &str,
        request: &GenerateVideoRequest,
    ) -> CinereelResult<VideoOperation>;

    /// Fetch the current state of an operation handle.
    async fn refresh_operation(&self, operation: &VideoOperation) -> CinereelResult<VideoOperation>;

    /// Download a generated video.
    async fn download_video(&self, uri: &str) -> CinereelResult<VideoClip>;
}
