//! Storyboard scenes and their render states.

use crate::{EncodedImage, SceneRecord};
use serde::{Deserialize, Serialize};

/// Render state of a scene's still frame.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RenderStatus {
    /// Not rendered yet
    #[default]
    Idle,
    /// Render call in flight
    Loading,
    /// Frame available
    Done,
    /// Last render failed
    Error,
}

/// Render state of a scene's video clip.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VideoStatus {
    /// Not extended yet
    #[default]
    Idle,
    /// Video job in flight
    Extending,
    /// Clip available
    Done,
    /// Last extension failed
    Error,
}

/// One scene of the storyboard.
///
/// Statuses are only advanced by the orchestrator. A video reference is only ever
/// set on a scene that already has a rendered image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationScene {
    /// Identifier, unique within the project
    pub id: String,
    /// 1-based position in the storyboard
    pub scene_number: u32,
    /// Scene title
    pub title: String,
    /// Where the scene happens
    pub location: String,
    /// Time of day
    pub time_of_day: String,
    /// Lighting, composition, atmosphere
    pub visual: String,
    /// What the character does
    pub action: String,
    /// Emotional tone
    pub emotion: String,
    /// Spoken line
    pub dialogue: String,
    /// Lens, camera movement, sound design
    pub cinematic_notes: String,
    /// Rendered still frame
    #[serde(default)]
    pub image: Option<EncodedImage>,
    /// Reference to the rendered clip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Still frame render state
    #[serde(default)]
    pub status: RenderStatus,
    /// Clip render state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_status: Option<VideoStatus>,
}

impl AnimationScene {
    /// Create an unrendered scene from a manifest record.
    pub fn from_record(id: impl Into<String>, record: SceneRecord) -> Self {
        Self {
            id: id.into(),
            scene_number: record.scene_number,
            title: record.title,
            location: record.location,
            time_of_day: record.time_of_day,
            visual: record.visual,
            action: record.action,
            emotion: record.emotion,
            dialogue: record.dialogue,
            cinematic_notes: record.cinematic_notes,
            image: None,
            video_url: None,
            status: RenderStatus::Idle,
            video_status: None,
        }
    }

    /// The descriptive fields, without render state.
    pub fn record(&self) -> SceneRecord {
        SceneRecord {
            scene_number: self.scene_number,
            title: self.title.clone(),
            location: self.location.clone(),
            time_of_day: self.time_of_day.clone(),
            visual: self.visual.clone(),
            action: self.action.clone(),
            emotion: self.emotion.clone(),
            dialogue: self.dialogue.clone(),
            cinematic_notes: self.cinematic_notes.clone(),
        }
    }

    /// True once a still frame exists.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Store a freshly rendered frame; any clip made from the old frame is stale.
    pub fn set_rendered(&mut self, image: EncodedImage) {
        self.image = Some(image);
        self.status = RenderStatus::Done;
        self.video_url = None;
        self.video_status = None;
    }

    /// Store a clip reference. Ignored when the scene has no frame.
    pub fn set_video(&mut self, video_url: impl Into<String>) -> bool {
        if !self.has_image() {
            return false;
        }
        self.video_url = Some(video_url.into());
        self.video_status = Some(VideoStatus::Done);
        true
    }
}
