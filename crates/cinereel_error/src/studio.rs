//! Orchestrator error types.

use crate::GeminiErrorKind;

/// Studio-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StudioErrorKind {
    /// Title is empty
    #[display("A movie title is required")]
    MissingTitle,
    /// Synopsis is empty
    #[display("A synopsis is required")]
    MissingSynopsis,
    /// Hero has no reference images
    #[display("At least one hero reference image is required")]
    MissingHeroImages,
    /// Scene count outside the supported range
    #[display("Scene count must be between {} and {}, got {}", min, max, requested)]
    InvalidSceneCount {
        /// Requested count
        requested: u32,
        /// Lowest accepted count
        min: u32,
        /// Highest accepted count
        max: u32,
    },
    /// No scene with the given id in the current project
    #[display("Scene not found: {}", _0)]
    SceneNotFound(String),
    /// No saved project with the given id
    #[display("Project not found: {}", _0)]
    ProjectNotFound(String),
    /// Hero analysis failed
    #[display("DNA analysis failed: {}", _0)]
    AnalysisFailed(String),
    /// Manifest generation failed or returned nothing usable
    #[display("Scene manifest generation failed: {}", _0)]
    GenerationFailed(String),
    /// Scene render failed
    #[display("Scene {} render failed: {}", scene, cause)]
    RenderFailed {
        /// Scene number
        scene: u32,
        /// Underlying model failure
        cause: GeminiErrorKind,
    },
    /// Scene video extension failed
    #[display("Scene {} extend failed: {}", scene, reason)]
    ExtendFailed {
        /// Scene number
        scene: u32,
        /// Underlying failure
        reason: String,
    },
    /// The key was rejected by the video service and a new one was selected
    #[display("API key rejected for scene {}; a new key was selected, please retry", _0)]
    CredentialRejected(u32),
    /// The key was rejected by the video service and no replacement was selected
    #[display("API key rejected for scene {}; no replacement key was selected", _0)]
    CredentialUnavailable(u32),
    /// Hero reference image index out of range
    #[display("Hero image {} does not exist ({} images)", index, count)]
    HeroImageNotFound {
        /// Requested index
        index: usize,
        /// Images the hero has
        count: usize,
    },
    /// A newer request for the same target finished first; this result was dropped
    #[display("Result for {} discarded: superseded by a newer request", _0)]
    Superseded(String),
    /// Export could not be written
    #[display("Export failed: {}", _0)]
    Export(String),
}

/// Studio error with location tracking.
///
/// # Examples
///
/// ```
/// use cinereel_error::{StudioError, StudioErrorKind};
///
/// let err = StudioError::new(StudioErrorKind::MissingTitle);
/// assert_eq!(err.kind(), &StudioErrorKind::MissingTitle);
/// assert!(format!("{}", err).contains("title"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Studio Error: {} at line {} in {}", kind, line, file)]
pub struct StudioError {
    kind: StudioErrorKind,
    line: u32,
    file: &'static str,
}

impl StudioError {
    /// Create a new studio error with caller location tracking.
    #[track_caller]
    pub fn new(kind: StudioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StudioErrorKind {
        &self.kind
    }

    /// True when the user input was incomplete and no external call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind,
            StudioErrorKind::MissingTitle
                | StudioErrorKind::MissingSynopsis
                | StudioErrorKind::MissingHeroImages
                | StudioErrorKind::InvalidSceneCount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_keeps_model_cause() {
        let err = StudioError::new(StudioErrorKind::RenderFailed {
            scene: 3,
            cause: GeminiErrorKind::NoImageData,
        });
        assert!(matches!(
            err.kind(),
            StudioErrorKind::RenderFailed {
                cause: GeminiErrorKind::NoImageData,
                ..
            }
        ));
        assert!(err.to_string().contains("Scene 3 render failed: Visual generation failed"));
        assert!(!err.is_validation());
    }
}
