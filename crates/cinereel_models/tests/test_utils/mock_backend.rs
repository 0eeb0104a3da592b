//! Scripted generative backend for testing.

use async_trait::async_trait;
use cinereel_core::VideoClip;
use cinereel_error::{CinereelResult, GeminiError, GeminiErrorKind};
use cinereel_models::{
    GenerateContentRequest, GenerateContentResponse, GenerateVideoRequest, GenerativeBackend,
    OperationStatus, Part, VideoOperation,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A single scripted `generateContent` answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Text part
    Text(String),
    /// Inline image part
    Image { mime_type: String, data: String },
    /// Candidate without any part
    Empty,
    /// Failure
    Error(GeminiErrorKind),
}

type Scripted<T> = Mutex<VecDeque<Result<T, GeminiErrorKind>>>;

/// Backend answering from queues filled by the test.
///
/// Every call is counted; exhausted queues answer with an `ApiRequest` error.
#[derive(Default)]
pub struct MockBackend {
    content: Mutex<VecDeque<MockResponse>>,
    starts: Scripted<VideoOperation>,
    refreshes: Scripted<VideoOperation>,
    download_error: Mutex<Option<GeminiErrorKind>>,
    requests: Mutex<Vec<(String, GenerateContentRequest)>>,
    video_requests: Mutex<Vec<GenerateVideoRequest>>,
    content_calls: AtomicUsize,
    start_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    download_calls: AtomicUsize,
}

fn exhausted(call: &str) -> GeminiErrorKind {
    GeminiErrorKind::ApiRequest(format!("Mock {} sequence exhausted", call))
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text answer.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.respond(MockResponse::Text(text.into()))
    }

    /// Queue an inline image answer.
    pub fn image(self, mime_type: &str, data: &str) -> Self {
        self.respond(MockResponse::Image {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Queue a failing answer.
    pub fn error(self, kind: GeminiErrorKind) -> Self {
        self.respond(MockResponse::Error(kind))
    }

    /// Queue any answer.
    pub fn respond(self, response: MockResponse) -> Self {
        self.content.lock().unwrap().push_back(response);
        self
    }

    /// Script a video job that stays pending for `pending_checks` refreshes, then
    /// completes with `uri`.
    pub fn video_job(self, pending_checks: usize, uri: &str) -> Self {
        self.start_pending();
        let mut refreshes = self.refreshes.lock().unwrap();
        for _ in 0..pending_checks {
            refreshes.push_back(Ok(VideoOperation::pending("operations/mock")));
        }
        refreshes.push_back(Ok(VideoOperation::completed("operations/mock", uri)));
        drop(refreshes);
        self
    }

    /// Script a video job that finishes with a service error.
    pub fn video_failure(self, message: &str) -> Self {
        self.start_pending();
        let finished = VideoOperation {
            name: "operations/mock".to_string(),
            done: true,
            error: Some(OperationStatus {
                code: Some(5),
                message: message.to_string(),
            }),
            response: None,
        };
        self.refreshes.lock().unwrap().push_back(Ok(finished));
        self
    }

    /// Script a video job that finishes without a video reference.
    pub fn video_without_reference(self) -> Self {
        self.start_pending();
        let finished = VideoOperation {
            done: true,
            ..VideoOperation::pending("operations/mock")
        };
        self.refreshes.lock().unwrap().push_back(Ok(finished));
        self
    }

    /// Script a rejected submission.
    pub fn video_rejected(self, kind: GeminiErrorKind) -> Self {
        self.starts.lock().unwrap().push_back(Err(kind));
        self
    }

    /// Make the download fail.
    pub fn download_fails(self, kind: GeminiErrorKind) -> Self {
        *self.download_error.lock().unwrap() = Some(kind);
        self
    }

    fn start_pending(&self) {
        self.starts
            .lock()
            .unwrap()
            .push_back(Ok(VideoOperation::pending("operations/mock")));
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    /// Calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.content_calls() + self.start_calls() + self.refresh_calls() + self.download_calls()
    }

    /// `generateContent` requests received, with their model.
    pub fn requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.requests.lock().unwrap().clone()
    }

    /// `predictLongRunning` requests received.
    pub fn video_requests(&self) -> Vec<GenerateVideoRequest> {
        self.video_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> CinereelResult<GenerateContentResponse> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        let next = self.content.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Text(text)) => {
                Ok(GenerateContentResponse::from_parts(vec![Part::text(text)]))
            }
            Some(MockResponse::Image { mime_type, data }) => Ok(
                GenerateContentResponse::from_parts(vec![Part::inline(mime_type, data)]),
            ),
            Some(MockResponse::Empty) => Ok(GenerateContentResponse::from_parts(vec![])),
            Some(MockResponse::Error(kind)) => Err(GeminiError::new(kind).into()),
            None => Err(GeminiError::new(exhausted("content")).into()),
        }
    }

    async fn start_video(
        &self,
        _model: &str,
        request: &GenerateVideoRequest,
    ) -> CinereelResult<VideoOperation> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.video_requests.lock().unwrap().push(request.clone());
        let next = self.starts.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(exhausted("start")))
            .map_err(|kind| GeminiError::new(kind).into())
    }

    async fn refresh_operation(&self, _operation: &VideoOperation) -> CinereelResult<VideoOperation> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.refreshes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(exhausted("refresh")))
            .map_err(|kind| GeminiError::new(kind).into())
    }

    async fn download_video(&self, _uri: &str) -> CinereelResult<VideoClip> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.download_error.lock().unwrap().clone() {
            return Err(GeminiError::new(kind).into());
        }
        Ok(VideoClip {
            mime_type: "video/mp4".to_string(),
            bytes: b"mock-mp4".to_vec(),
        })
    }
}
