//! Top-level error wrapper types.

use crate::{ConfigError, GeminiError, JsonError, StorageError, StudioError};

/// Every error condition a Cinereel operation can report.
///
/// # Examples
///
/// ```
/// use cinereel_error::{CinereelError, JsonError};
///
/// let json_err = JsonError::new("expected value at line 1");
/// let err: CinereelError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CinereelErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Project storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Gemini service error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Orchestration error
    #[from(StudioError)]
    Studio(StudioError),
}

/// Cinereel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use cinereel_error::{CinereelErrorKind, CinereelResult, StudioError, StudioErrorKind};
///
/// fn might_fail() -> CinereelResult<()> {
///     Err(StudioError::new(StudioErrorKind::MissingSynopsis))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), CinereelErrorKind::Studio(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cinereel Error: {}", _0)]
pub struct CinereelError(Box<CinereelErrorKind>);

impl CinereelError {
    /// Create a new error from a kind.
    pub fn new(kind: CinereelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CinereelErrorKind {
        &self.0
    }

    /// The Gemini error kind, when this error came from the service.
    pub fn gemini_kind(&self) -> Option<&crate::GeminiErrorKind> {
        match self.kind() {
            CinereelErrorKind::Gemini(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// The studio error kind, when this error came from the orchestrator.
    pub fn studio_kind(&self) -> Option<&crate::StudioErrorKind> {
        match self.kind() {
            CinereelErrorKind::Studio(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// True when the selected API key must be replaced before retrying.
    pub fn is_credential_error(&self) -> bool {
        self.gemini_kind()
            .is_some_and(crate::GeminiErrorKind::is_credential_error)
    }
}

// Generic From implementation for any type that converts to CinereelErrorKind
impl<T> From<T> for CinereelError
where
    T: Into<CinereelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Cinereel operations.
pub type CinereelResult<T> = std::result::Result<T, CinereelError>;
