//! Cinereel - storyboard and animate short films with Gemini
//!
//! Cinereel turns a title, a synopsis and a few reference images of a hero
//! character into a numbered scene manifest, renders a frame per scene that
//! keeps the hero recognisable, and animates rendered frames into short clips.
//! Projects are saved locally and can be reopened, exported or deleted.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use cinereel::{
//!     CinereelConfig, EnvCredentials, FileSystemProjectStore, GeminiClient, Studio,
//!     StudioModels,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CinereelConfig::load()?;
//! let credentials = Arc::new(EnvCredentials::new());
//! let client = GeminiClient::new(&config.gemini, credentials.clone())?;
//! let models = StudioModels::new(Arc::new(client), config.gemini.models(), config.poll_config());
//! let store = Arc::new(FileSystemProjectStore::new(config.storage_root())?);
//! let studio = Studio::open(models, store, credentials, config.studio_settings()?).await?;
//!
//! for project in studio.list_projects().await? {
//!     println!("{} {}", project.id, project.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `cinereel_error` - Error types
//! - `cinereel_core` - Hero, scene and project data model
//! - `cinereel_models` - Gemini transport, request builders and the video poller
//! - `cinereel_storage` - Project persistence
//! - `cinereel_studio` - Session orchestration
//!
//! This crate re-exports all of them and adds configuration loading and
//! console logging.

mod config;
mod telemetry;

pub use config::{CinereelConfig, DefaultsConfig, StorageConfig, VideoConfig};
pub use telemetry::init_console_telemetry;

pub use cinereel_core::*;
pub use cinereel_error::*;
pub use cinereel_models::*;
pub use cinereel_storage::*;
pub use cinereel_studio::*;
