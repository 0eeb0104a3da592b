//! Storyboard orchestration for Cinereel.
//!
//! [`Studio`] owns the editing session (draft inputs, hero, scenes, active
//! project) and sequences the model calls against it. Every state change goes
//! through a single update path that writes the active project snapshot while
//! the session lock is held, so memory and storage never drift apart by more
//! than one completed operation.
//!
//! Progress and transient status messages are published on a watch channel
//! ([`Studio::subscribe`]).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cinereel_core::EncodedImage;
//! use cinereel_models::{EnvCredentials, GeminiClient, GeminiConfig, PollConfig, StudioModels};
//! use cinereel_storage::InMemoryProjectStore;
//! use cinereel_studio::{Studio, StudioSettings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeminiConfig::default();
//! let credentials = Arc::new(EnvCredentials::new());
//! let client = GeminiClient::new(&config, credentials.clone())?;
//! let models = StudioModels::new(Arc::new(client), config.models(), PollConfig::default());
//! let studio = Studio::open(
//!     models,
//!     Arc::new(InMemoryProjectStore::new()),
//!     credentials,
//!     StudioSettings::default(),
//! )
//! .await?;
//!
//! studio.set_title("Laut").await?;
//! studio.set_synopsis("A fisher's daughter sails into the storm.").await?;
//! studio
//!     .add_hero_images(vec![EncodedImage::from_bytes("image/png", &std::fs::read("hero.png")?)])
//!     .await?;
//! let project = studio.build_manifest().await?;
//! studio.render_scene(&project.scenes[0].id, None).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod export;
mod session;
mod status;
mod studio;

pub use export::{ScenePrompt, ScriptLine};
pub use session::{Draft, Session};
pub use status::StudioStatus;
pub use studio::{Studio, StudioSettings};
