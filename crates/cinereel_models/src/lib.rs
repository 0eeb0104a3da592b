//! Gemini integration for Cinereel.
//!
//! This crate shapes the four model calls the studio needs and drives the
//! long-running video job to completion:
//!
//! - **Hero analysis** - reference images in, character DNA text out
//! - **Scene manifest** - schema-constrained JSON generation
//! - **Scene visual** - multimodal image generation with the hero as reference
//! - **Extend shot** - image-to-video generation through a polled operation
//!
//! The HTTP transport sits behind the [`GenerativeBackend`] trait so the request
//! builder and the poller can be exercised against a scripted backend.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cinereel_models::{EnvCredentials, GeminiClient, GeminiConfig, PollConfig, StudioModels};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeminiConfig::default();
//! let credentials = Arc::new(EnvCredentials::new());
//! let client = GeminiClient::new(&config, credentials)?;
//! let models = StudioModels::new(Arc::new(client), config.models(), PollConfig::default());
//! let dna = models.analyze_hero(&[]).await;
//! assert!(dna.is_err());
//! # Ok(())
//! # }
//! ```

mod backend;
mod client;
mod config;
mod credentials;
mod dto;
mod metrics;
mod poller;
mod prompts;
mod requests;

pub use backend::GenerativeBackend;
pub use client::GeminiClient;
pub use config::{GeminiConfig, ModelSelection, PollConfig};
pub use credentials::{CredentialProvider, CredentialStore, EnvCredentials, GEMINI_API_KEY_VAR};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerateVideoRequest,
    GenerateVideoResponse, GeneratedSample, GenerationConfig, ImageConfig, InlineData,
    OperationStatus, Part, VideoImage, VideoInstance, VideoOperation, VideoOperationResponse,
    VideoParameters, VideoRef,
};
pub use metrics::ModelMetrics;
pub use poller::VideoPoller;
pub use prompts::{manifest_schema, MANIFEST_FIELDS};
pub use requests::{
    ManifestRequest, ManifestRequestBuilder, SceneVisualRequest, SceneVisualRequestBuilder,
    StudioModels,
};

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, cinereel_error::GeminiError>;
