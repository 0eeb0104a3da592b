//! Core data types for Cinereel.
//!
//! This crate provides the domain model shared by every Cinereel crate: the hero
//! character, the scenes of a storyboard, the project snapshot that gets persisted,
//! and the encoded media payloads exchanged with the Gemini service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod hero;
mod manifest;
mod media;
mod project;
mod scene;

pub use catalog::{DEFAULT_LANGUAGE, LANGUAGES, VIDEO_PROGRESS_MESSAGES, VISUAL_STYLES};
pub use hero::{HeroCharacter, MAX_HERO_IMAGES};
pub use manifest::{SceneCount, SceneRecord};
pub use media::{EncodedImage, VideoClip};
pub use project::{Project, ProjectConfig};
pub use scene::{AnimationScene, RenderStatus, VideoStatus};
