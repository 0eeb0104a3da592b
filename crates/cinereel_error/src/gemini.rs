//! Gemini-specific error types and retry logic.

/// Message the video service uses when the selected key cannot reach the model.
pub const ENTITY_NOT_FOUND_MESSAGE: &str = "Requested entity was not found";

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// No API key has been selected
    #[display("No Gemini API key selected (set GEMINI_API_KEY or select a key)")]
    MissingApiKey,
    /// Failed to create the HTTP client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed before a response was received
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The service could not find the requested model or operation for this key
    #[display("{}: {}", ENTITY_NOT_FOUND_MESSAGE, _0)]
    EntityNotFound(String),
    /// Response body did not match the expected shape
    #[display("Unexpected Gemini response: {}", _0)]
    InvalidResponse(String),
    /// Hero analysis needs at least one reference image
    #[display("At least one reference image is required")]
    NoReferenceImages,
    /// Image model answered without an inline image part
    #[display("Visual generation failed: no image data returned from model")]
    NoImageData,
    /// Scene has no rendered frame to animate
    #[display("Scene {} must have an image to extend", _0)]
    MissingSceneImage(u32),
    /// Video operation reported an error
    #[display("Video operation failed: {}", _0)]
    OperationFailed(String),
    /// Video operation finished without a video reference
    #[display("Video generation failed: operation completed without a video reference")]
    NoVideoReference,
    /// Polling exceeded the configured timeout
    #[display("Video operation still pending after {} seconds", _0)]
    PollTimeout(u64),
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// Video download failed
    #[display("Video download failed: {}", _0)]
    Download(String),
}

impl GeminiErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiErrorKind::HttpError { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GeminiErrorKind::ApiRequest(_) => true,
            _ => false,
        }
    }

    /// Check if this error means the selected key must be replaced.
    ///
    /// Video models require a billing-enabled key; the service answers a key
    /// without access with "Requested entity was not found".
    pub fn is_credential_error(&self) -> bool {
        match self {
            GeminiErrorKind::MissingApiKey | GeminiErrorKind::EntityNotFound(_) => true,
            GeminiErrorKind::HttpError {
                status_code,
                message,
            } => matches!(*status_code, 401 | 403) || message.contains(ENTITY_NOT_FOUND_MESSAGE),
            GeminiErrorKind::OperationFailed(message) => {
                message.contains(ENTITY_NOT_FOUND_MESSAGE)
            }
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            GeminiErrorKind::HttpError { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            GeminiErrorKind::ApiRequest(_) => (1000, 3, 10),
            _ => (2000, 5, 60),
        }
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use cinereel_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// assert!(err.kind.is_credential_error());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use cinereel_error::{GeminiError, GeminiErrorKind, RetryableError};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}

impl RetryableError for GeminiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
