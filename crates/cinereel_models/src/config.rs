//! Model selection, transport and polling settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini REST endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Which model serves each of the four studio calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ModelSelection {
    /// Vision-to-text model for hero analysis
    analysis_model: String,
    /// Schema-constrained text model for the scene manifest
    manifest_model: String,
    /// Image generation model for scene frames
    image_model: String,
    /// Image-to-video model for extend shot
    video_model: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            analysis_model: "gemini-3-pro-preview".to_string(),
            manifest_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
        }
    }
}

/// Settings for the Gemini transport, the `[gemini]` configuration section.
///
/// # Example
///
/// ```toml
/// [gemini]
/// base_url = "https://generativelanguage.googleapis.com/v1beta"
/// image_model = "gemini-2.5-flash-image"
/// max_retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// REST endpoint root
    pub base_url: String,
    /// Hero analysis model
    pub analysis_model: String,
    /// Manifest model
    pub manifest_model: String,
    /// Scene frame model
    pub image_model: String,
    /// Video model
    pub video_model: String,
    /// Disable automatic retry of transient failures
    pub no_retry: bool,
    /// Override the error-specific retry count
    pub max_retries: Option<usize>,
    /// Override the error-specific initial backoff
    pub retry_backoff_ms: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        let models = ModelSelection::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: models.analysis_model,
            manifest_model: models.manifest_model,
            image_model: models.image_model,
            video_model: models.video_model,
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        }
    }
}

impl GeminiConfig {
    /// The model chosen for each call.
    pub fn models(&self) -> ModelSelection {
        ModelSelection {
            analysis_model: self.analysis_model.clone(),
            manifest_model: self.manifest_model.clone(),
            image_model: self.image_model.clone(),
            video_model: self.video_model.clone(),
        }
    }
}

/// Cadence of the video operation status checks.
///
/// `timeout` is `None` by default: the poller waits as long as the service needs.
/// Setting it changes behavior for slow jobs, which then fail with
/// `PollTimeout` instead of eventually succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks
    pub interval: Duration,
    /// Give up after this long
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: None,
        }
    }
}
