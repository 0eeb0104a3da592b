//! Gemini REST transport.
//!
//! [`GeminiClient`] sends the JSON bodies built by [`StudioModels`](crate::StudioModels)
//! to the Gemini API and maps failures onto [`GeminiErrorKind`]:
//!
//! - transport failures become `ApiRequest` and are retried
//! - non-2xx answers become `HttpError` (408/429/5xx are retried)
//! - "Requested entity was not found" becomes `EntityNotFound`, the credential class
//!
//! The API key is read from the [`CredentialProvider`] on every request so a key
//! selected mid-session takes effect immediately.

use crate::{
    CredentialProvider, GeminiConfig, GeminiResult, GenerateContentRequest,
    GenerateContentResponse, GenerateVideoRequest, GenerativeBackend, ModelMetrics,
    VideoOperation,
};
use async_trait::async_trait;
use cinereel_core::VideoClip;
use cinereel_error::{
    CinereelResult, ENTITY_NOT_FOUND_MESSAGE, GeminiError, GeminiErrorKind, RetryableError,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, info, instrument, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// HTTP client for the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("has_key", &self.credentials.has_credential())
            .field("no_retry", &self.no_retry)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client for the configured endpoint.
    ///
    /// No key is required at construction; calls fail with `MissingApiKey` until
    /// the provider has one.
    #[instrument(name = "gemini_client_new", skip_all, fields(base_url = %config.base_url))]
    pub fn new(
        config: &GeminiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> CinereelResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cinereel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            no_retry: config.no_retry,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn api_key(&self) -> GeminiResult<String> {
        self.credentials
            .api_key()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn operation_url(&self, name: &str) -> String {
        if name.starts_with("http://") || name.starts_with("https://") {
            name.to_string()
        } else {
            format!("{}/{}", self.base_url, name.trim_start_matches('/'))
        }
    }

    /// Map a non-2xx answer onto an error kind.
    fn status_error(status_code: u16, body: &str) -> GeminiError {
        let message = serde_json::from_str::<ApiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        if message.contains(ENTITY_NOT_FOUND_MESSAGE) {
            GeminiError::new(GeminiErrorKind::EntityNotFound(message))
        } else {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code,
                message,
            })
        }
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> GeminiResult<R> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status.as_u16(), &body));
        }
        response
            .json::<R>()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::InvalidResponse(e.to_string())))
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> GeminiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let key = self.api_key()?;
        debug!(url = %url, "Sending Gemini request");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        Self::decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> GeminiResult<R> {
        let key = self.api_key()?;
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        Self::decode(response).await
    }

    /// Run `op`, retrying transient failures with exponential backoff and jitter.
    ///
    /// The first failure picks the strategy (`retry_strategy_params`); configured
    /// overrides win over the error-specific defaults.
    async fn with_retry<T, F, Fut>(&self, call: &str, op: F) -> GeminiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = GeminiResult<T>>,
    {
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if self.no_retry || !err.is_retryable() {
            return Err(err);
        }

        let (mut initial_ms, mut max_retries, max_delay_secs) = err.retry_strategy_params();
        if let Some(override_backoff) = self.retry_backoff_ms {
            initial_ms = override_backoff;
        }
        if let Some(override_retries) = self.max_retries {
            max_retries = override_retries;
        }

        info!(
            error = %err,
            call,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Gemini call failed, will retry with configured strategy"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        Retry::spawn(strategy, || {
            let attempt = op();
            async move {
                match attempt.await {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Gemini call failed, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent Gemini error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }

    fn error_label(kind: &GeminiErrorKind) -> &'static str {
        match kind {
            GeminiErrorKind::HttpError { status_code: 429, .. } => "rate_limit",
            GeminiErrorKind::HttpError { .. } => "http",
            GeminiErrorKind::ApiRequest(_) => "network",
            k if k.is_credential_error() => "credential",
            _ => "other",
        }
    }

    fn record<T>(call: &str, model: &str, started: Instant, result: &GeminiResult<T>) {
        let metrics = ModelMetrics::get();
        match result {
            Ok(_) => metrics.record_request(call, model, started.elapsed().as_secs_f64()),
            Err(e) => metrics.record_error(call, model, Self::error_label(&e.kind)),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    #[instrument(skip(self, request), fields(inline_parts = request.inline_part_count()))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> CinereelResult<GenerateContentResponse> {
        let url = self.model_url(model, "generateContent");
        let url = url.as_str();
        let started = Instant::now();
        let result: GeminiResult<GenerateContentResponse> = self
            .with_retry("generate_content", move || self.post_json(url, request))
            .await;
        Self::record("generate_content", model, started, &result);
        Ok(result?)
    }

    #[instrument(skip(self, request))]
    async fn start_video(
        &self,
        model: &str,
        request: &GenerateVideoRequest,
    ) -> CinereelResult<VideoOperation> {
        let url = self.model_url(model, "predictLongRunning");
        let started = Instant::now();
        let result: GeminiResult<VideoOperation> = self.post_json(&url, request).await;
        Self::record("start_video", model, started, &result);
        let operation = result?;
        info!(operation = %operation.name, "Video operation submitted");
        Ok(operation)
    }

    #[instrument(skip(self, operation), fields(operation = %operation.name))]
    async fn refresh_operation(&self, operation: &VideoOperation) -> CinereelResult<VideoOperation> {
        let url = self.operation_url(&operation.name);
        let url = url.as_str();
        let result = self
            .with_retry("refresh_operation", move || {
                self.get_json::<VideoOperation>(url)
            })
            .await;
        ModelMetrics::get().record_poll();
        Ok(result?)
    }

    #[instrument(skip(self, uri))]
    async fn download_video(&self, uri: &str) -> CinereelResult<VideoClip> {
        let key = self.api_key()?;
        let response = self
            .http
            .get(uri)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Download(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status.as_u16(), &body).into());
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("video/"))
            .unwrap_or(DEFAULT_VIDEO_MIME)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Download(e.to_string())))?;

        info!(size = bytes.len(), mime_type = %mime_type, "Downloaded video");
        Ok(VideoClip {
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_not_found_body_maps_to_credential_error() {
        let body = r#"{"error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}}"#;
        let err = GeminiClient::status_error(404, body);
        assert!(matches!(err.kind, GeminiErrorKind::EntityNotFound(_)));
        assert!(err.kind.is_credential_error());
    }

    #[test]
    fn plain_body_keeps_status_code() {
        let err = GeminiClient::status_error(503, "overloaded");
        assert_eq!(
            err.kind,
            GeminiErrorKind::HttpError {
                status_code: 503,
                message: "overloaded".to_string()
            }
        );
    }

    fn client(config: GeminiConfig) -> GeminiClient {
        GeminiClient::new(&config, Arc::new(crate::EnvCredentials::with_key("k"))).unwrap()
    }

    fn overloaded() -> GeminiError {
        GeminiError::new(GeminiErrorKind::HttpError {
            status_code: 503,
            message: "overloaded".to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_until_success() {
        let client = client(GeminiConfig::default());
        let attempts = std::sync::atomic::AtomicUsize::new(0);

        let result = client
            .with_retry("test", || {
                let n = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async move { if n < 2 { Err(overloaded()) } else { Ok(n) } }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failures_and_no_retry_fail_once() {
        let bad_request = || {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code: 400,
                message: "bad".to_string(),
            })
        };
        let client_default = client(GeminiConfig::default());
        let attempts = std::sync::atomic::AtomicUsize::new(0);
        let result: GeminiResult<()> = client_default
            .with_retry("test", || {
                attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async { Err(bad_request()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);

        let no_retry = client(GeminiConfig {
            no_retry: true,
            ..Default::default()
        });
        let attempts = std::sync::atomic::AtomicUsize::new(0);
        let result: GeminiResult<()> = no_retry
            .with_retry("test", || {
                attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async { Err(overloaded()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn max_retries_override_caps_attempts() {
        let client = client(GeminiConfig {
            max_retries: Some(1),
            retry_backoff_ms: Some(10),
            ..Default::default()
        });
        let attempts = std::sync::atomic::AtomicUsize::new(0);

        let result: GeminiResult<()> = client
            .with_retry("test", || {
                attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async { Err(overloaded()) }
            })
            .await;

        assert!(result.unwrap_err().is_retryable());
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn urls_are_built_from_base() {
        let config = GeminiConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(
            &config,
            Arc::new(crate::EnvCredentials::with_key("k")),
        )
        .unwrap();
        assert_eq!(
            client.model_url("models/veo-3", "predictLongRunning"),
            "https://example.test/v1beta/models/veo-3:predictLongRunning"
        );
        assert_eq!(
            client.operation_url("models/veo-3/operations/42"),
            "https://example.test/v1beta/models/veo-3/operations/42"
        );
    }
}
