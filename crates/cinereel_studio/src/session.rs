//! The in-memory editing session.

use cinereel_core::{
    AnimationScene, DEFAULT_LANGUAGE, HeroCharacter, Project, ProjectConfig, SceneCount,
    VISUAL_STYLES,
};
use derive_getters::Getters;
use std::collections::HashMap;

/// Inputs typed by the user before the manifest exists.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Draft {
    /// Movie title
    pub(crate) title: String,
    /// Synopsis
    pub(crate) synopsis: String,
    /// Visual style label
    pub(crate) visual_style: String,
    /// Language of generated scene text
    pub(crate) language: String,
    /// Scenes to request
    pub(crate) scene_count: SceneCount,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            synopsis: String::new(),
            visual_style: VISUAL_STYLES[0].to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            scene_count: SceneCount::default(),
        }
    }
}

impl Draft {
    /// A draft with the given style, language and count and no text.
    pub fn new(
        visual_style: impl Into<String>,
        language: impl Into<String>,
        scene_count: SceneCount,
    ) -> Self {
        Self {
            visual_style: visual_style.into(),
            language: language.into(),
            scene_count,
            ..Self::default()
        }
    }
}

/// Which result a ticket guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TicketKind {
    Render,
    Video,
}

/// Latest request number per scene and result kind.
///
/// A response is applied only if its ticket is still the latest one issued.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tickets {
    next: u64,
    latest: HashMap<(TicketKind, String), u64>,
}

impl Tickets {
    pub(crate) fn issue(&mut self, kind: TicketKind, scene_id: &str) -> u64 {
        self.next += 1;
        self.latest.insert((kind, scene_id.to_string()), self.next);
        self.next
    }

    pub(crate) fn is_current(&self, kind: TicketKind, scene_id: &str, ticket: u64) -> bool {
        self.latest.get(&(kind, scene_id.to_string())) == Some(&ticket)
    }

    fn clear(&mut self) {
        self.latest.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.latest.len()
    }
}

/// Everything the studio displays and mutates.
#[derive(Debug, Clone, Default, Getters)]
pub struct Session {
    /// Draft inputs
    draft: Draft,
    /// Protagonist
    hero: HeroCharacter,
    /// Scenes of the current project
    scenes: Vec<AnimationScene>,
    /// Id of the project being edited, if saved
    active_id: Option<String>,
    /// True while the manifest call is in flight
    is_generating: bool,
    /// Bumped whenever a different project replaces the session
    #[getter(skip)]
    pub(crate) epoch: u64,
    #[getter(skip)]
    pub(crate) tickets: Tickets,
}

impl Session {
    pub(crate) fn new(draft: Draft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    /// Look up a scene by id.
    pub fn scene(&self, scene_id: &str) -> Option<&AnimationScene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    pub(crate) fn scene_mut(&mut self, scene_id: &str) -> Option<&mut AnimationScene> {
        self.scenes.iter_mut().find(|s| s.id == scene_id)
    }

    pub(crate) fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub(crate) fn hero_mut(&mut self) -> &mut HeroCharacter {
        &mut self.hero
    }

    pub(crate) fn set_generating(&mut self, generating: bool) {
        self.is_generating = generating;
    }

    /// The snapshot to persist, when a project is active.
    pub fn snapshot(&self) -> Option<Project> {
        let id = self.active_id.as_ref()?;
        Some(self.project_with(id.clone(), self.scenes.clone()))
    }

    /// A project carrying the current draft and hero with `scenes`.
    pub(crate) fn project_with(&self, project_id: String, scenes: Vec<AnimationScene>) -> Project {
        Project::new(
            project_id,
            self.draft.title.clone(),
            self.draft.synopsis.clone(),
            self.hero.clone(),
            ProjectConfig::new(self.draft.visual_style.clone(), self.draft.language.clone()),
            scenes,
        )
    }

    /// Replace the scenes with a fresh manifest and make `project_id` active.
    pub(crate) fn start_project(&mut self, project_id: String, scenes: Vec<AnimationScene>) {
        self.scenes = scenes;
        self.active_id = Some(project_id);
        self.tickets.clear();
    }

    /// Show a saved project.
    pub(crate) fn load(&mut self, project: Project) {
        let scene_count = u32::try_from(project.scenes.len())
            .ok()
            .and_then(|n| SceneCount::new(n).ok())
            .unwrap_or(self.draft.scene_count);
        self.draft = Draft {
            title: project.name,
            synopsis: project.synopsis,
            visual_style: project.config.visual_style().clone(),
            language: project.config.language().clone(),
            scene_count,
        };
        self.hero = project.hero;
        self.hero.is_analyzing = false;
        self.scenes = project.scenes;
        self.active_id = Some(project.id);
        self.is_generating = false;
        self.epoch += 1;
        self.tickets.clear();
    }

    /// Start over: empty text, hero and scenes, no active project.
    ///
    /// Style, language and scene count are kept.
    pub(crate) fn reset(&mut self) {
        self.draft.title.clear();
        self.draft.synopsis.clear();
        self.hero = HeroCharacter::default();
        self.scenes.clear();
        self.active_id = None;
        self.is_generating = false;
        self.epoch += 1;
        self.tickets.clear();
    }

    /// Detach from the saved project; later edits are not persisted.
    pub(crate) fn detach(&mut self) {
        self.active_id = None;
    }
}
