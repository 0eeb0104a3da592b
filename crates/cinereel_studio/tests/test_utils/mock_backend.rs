//! Scripted generative backend for studio tests.

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
use std::time::Duration;

/// A single scripted `generateContent` answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Text part
    Text(String),
    /// Inline image part
    Image(String),
    /// Failure
    Error(GeminiErrorKind),
    /// Answer after a delay
    Delayed(Duration, Box<MockResponse>),
}

/// Backend answering from queues filled by the test.
#[derive(Default)]
pub struct MockBackend {
    content: Mutex<VecDeque<MockResponse>>,
    starts: Mutex<VecDeque<Result<VideoOperation, GeminiErrorKind>>>,
    refreshes: Mutex<VecDeque<VideoOperation>>,
    content_calls: AtomicUsize,
    start_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    download_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.respond(MockResponse::Text(text.into()))
    }

    /// Queue an image answer with base64 `data`.
    pub fn image(self, data: &str) -> Self {
        self.respond(MockResponse::Image(data.to_string()))
    }

    pub fn error(self, kind: GeminiErrorKind) -> Self {
        self.respond(MockResponse::Error(kind))
    }

    pub fn delayed(self, delay: Duration, response: MockResponse) -> Self {
        self.respond(MockResponse::Delayed(delay, Box::new(response)))
    }

    pub fn respond(self, response: MockResponse) -> Self {
        self.content.lock().unwrap().push_back(response);
        self
    }

    /// Video job pending for `pending_checks` refreshes, then done with `uri`.
    pub fn video_job(self, pending_checks: usize, uri: &str) -> Self {
        self.starts
            .lock()
            .unwrap()
            .push_back(Ok(VideoOperation::pending("operations/mock")));
        {
            let mut refreshes = self.refreshes.lock().unwrap();
            for _ in 0..pending_checks {
                refreshes.push_back(VideoOperation::pending("operations/mock"));
            }
            refreshes.push_back(VideoOperation::completed("operations/mock", uri));
        }
        self
    }

    /// Video job pending for `pending_checks` refreshes, then failed with `message`.
    pub fn video_job_failing(self, pending_checks: usize, message: &str) -> Self {
        self.starts
            .lock()
            .unwrap()
            .push_back(Ok(VideoOperation::pending("operations/mock")));
        {
            let mut refreshes = self.refreshes.lock().unwrap();
            for _ in 0..pending_checks {
                refreshes.push_back(VideoOperation::pending("operations/mock"));
            }
            refreshes.push_back(VideoOperation {
                name: "operations/mock".to_string(),
                done: true,
                error: Some(OperationStatus {
                    code: Some(5),
                    message: message.to_string(),
                }),
                response: None,
            });
        }
        self
    }

    /// Video submission rejected with `kind`.
    pub fn video_rejected(self, kind: GeminiErrorKind) -> Self {
        self.starts.lock().unwrap().push_back(Err(kind));
        self
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.content_calls()
            + self.start_calls()
            + self.refresh_calls.load(Ordering::SeqCst)
            + self.download_calls.load(Ordering::SeqCst)
    }
}

fn exhausted(call: &str) -> GeminiError {
    GeminiError::new(GeminiErrorKind::ApiRequest(format!(
        "Mock {} sequence exhausted",
        call
    )))
}

async fn answer(response: MockResponse) -> CinereelResult<GenerateContentResponse> {
    let mut response = response;
    while let MockResponse::Delayed(delay, inner) = response {
        tokio::time::sleep(delay).await;
        response = *inner;
    }
    match response {
        MockResponse::Text(text) => Ok(GenerateContentResponse::from_parts(vec![Part::text(text)])),
        MockResponse::Image(data) => Ok(GenerateContentResponse::from_parts(vec![Part::inline(
            "image/png",
            data,
        )])),
        MockResponse::Error(kind) => Err(GeminiError::new(kind).into()),
        MockResponse::Delayed(..) => unreachable!("delays are unwrapped above"),
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate_content(
        &self,
        _model: &str,
        _request: &GenerateContentRequest,
    ) -> CinereelResult<GenerateContentResponse> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.content.lock().unwrap().pop_front();
        match next {
            Some(response) => answer(response).await,
            None => Err(exhausted("content").into()),
        }
    }

    async fn start_video(
        &self,
        _model: &str,
        _request: &GenerateVideoRequest,
    ) -> CinereelResult<VideoOperation> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.starts.lock().unwrap().pop_front();
        match next {
            Some(Ok(operation)) => Ok(operation),
            Some(Err(kind)) => Err(GeminiError::new(kind).into()),
            None => Err(exhausted("start").into()),
        }
    }

    async fn refresh_operation(&self, _operation: &VideoOperation) -> CinereelResult<VideoOperation> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.refreshes.lock().unwrap().pop_front();
        next.ok_or_else(|| exhausted("refresh").into())
    }

    async fn download_video(&self, _uri: &str) -> CinereelResult<VideoClip> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        Ok(VideoClip {
            mime_type: "video/mp4".to_string(),
            bytes: b"mock-mp4".to_vec(),
        })
    }
}
