//! Scene metadata and frame export.

use cinereel_core::{AnimationScene, SceneRecord};
use cinereel_error::{CinereelResult, JsonError, StudioError, StudioErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One line of the shooting script: number, visual and dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// Scene number
    pub scene: u32,
    /// Visual description
    pub visual: String,
    /// Dialogue
    pub dialogue: String,
}

/// Prompt pair for reusing a scene in another tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePrompt {
    /// Visual description
    pub visual: String,
    /// Camera and sound notes
    pub technical: String,
}

impl From<&AnimationScene> for ScriptLine {
    fn from(scene: &AnimationScene) -> Self {
        Self {
            scene: scene.scene_number,
            visual: scene.visual.clone(),
            dialogue: scene.dialogue.clone(),
        }
    }
}

impl From<&AnimationScene> for ScenePrompt {
    fn from(scene: &AnimationScene) -> Self {
        Self {
            visual: scene.visual.clone(),
            technical: scene.cinematic_notes.clone(),
        }
    }
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> CinereelResult<String> {
    Ok(serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?)
}

pub(crate) fn script_json(scenes: &[AnimationScene]) -> CinereelResult<String> {
    to_pretty(&scenes.iter().map(ScriptLine::from).collect::<Vec<_>>())
}

pub(crate) fn manifest_json(scenes: &[AnimationScene]) -> CinereelResult<String> {
    to_pretty(&scenes.iter().map(AnimationScene::record).collect::<Vec<SceneRecord>>())
}

pub(crate) fn scene_prompt_json(scene: &AnimationScene) -> CinereelResult<String> {
    to_pretty(&ScenePrompt::from(scene))
}

/// Write every rendered frame to `dir` as `scene_<n>.<ext>`.
pub(crate) async fn write_scene_images(
    scenes: &[AnimationScene],
    dir: &Path,
) -> CinereelResult<Vec<PathBuf>> {
    let export_error = |path: &Path, e: &dyn std::fmt::Display| {
        StudioError::new(StudioErrorKind::Export(format!("{}: {}", path.display(), e)))
    };

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| export_error(dir, &e))?;

    let mut written = Vec::new();
    for scene in scenes {
        let Some(image) = scene.image.as_ref() else {
            continue;
        };
        let path = dir.join(format!("scene_{}.{}", scene.scene_number, image.extension()));
        let bytes = image.decode().map_err(|e| export_error(&path, &e))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| export_error(&path, &e))?;
        tracing::debug!(path = %path.display(), "Exported scene frame");
        written.push(path);
    }
    Ok(written)
}
