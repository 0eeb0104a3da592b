//! Project snapshots, the unit of persistence.

use crate::{AnimationScene, DEFAULT_LANGUAGE, HeroCharacter, VISUAL_STYLES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rendering configuration shared by every scene of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Visual style passed to every image request
    visual_style: String,
    /// Language of the generated scene text
    language: String,
}

impl ProjectConfig {
    /// Create a configuration.
    pub fn new(visual_style: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            visual_style: visual_style.into(),
            language: language.into(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::new(VISUAL_STYLES[0], DEFAULT_LANGUAGE)
    }
}

/// A saved storyboard: the movie, its hero, and its scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier (creation timestamp in milliseconds)
    pub id: String,
    /// Movie title
    pub name: String,
    /// Synopsis
    pub synopsis: String,
    /// Last time the snapshot was written
    pub date: DateTime<Utc>,
    /// Protagonist
    pub hero: HeroCharacter,
    /// Style and language
    #[serde(flatten)]
    pub config: ProjectConfig,
    /// Scenes in storyboard order
    pub scenes: Vec<AnimationScene>,
}

impl Project {
    /// Create a snapshot dated now.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        synopsis: impl Into<String>,
        hero: HeroCharacter,
        config: ProjectConfig,
        scenes: Vec<AnimationScene>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            synopsis: synopsis.into(),
            date: Utc::now(),
            hero,
            config,
            scenes,
        }
    }

    /// Look up a scene by id.
    pub fn scene(&self, scene_id: &str) -> Option<&AnimationScene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Look up a scene by id for mutation.
    pub fn scene_mut(&mut self, scene_id: &str) -> Option<&mut AnimationScene> {
        self.scenes.iter_mut().find(|s| s.id == scene_id)
    }

    /// Look up a scene by its 1-based number.
    pub fn scene_by_number(&self, scene_number: u32) -> Option<&AnimationScene> {
        self.scenes.iter().find(|s| s.scene_number == scene_number)
    }

    /// Refresh the update date.
    pub fn touch(&mut self) {
        self.date = Utc::now();
    }
}
