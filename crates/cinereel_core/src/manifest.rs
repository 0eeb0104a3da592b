//! Scene manifest records and the requested scene count.

use cinereel_error::{StudioError, StudioErrorKind};
use serde::{Deserialize, Serialize};

/// One entry of a scene manifest as produced by the text model.
///
/// Field names follow the response schema sent with the manifest request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecord {
    /// Scene number
    pub scene_number: u32,
    /// Title
    pub title: String,
    /// Location
    pub location: String,
    /// Time of day
    pub time_of_day: String,
    /// Visual description
    pub visual: String,
    /// Character action
    pub action: String,
    /// Emotional tone
    pub emotion: String,
    /// Dialogue
    pub dialogue: String,
    /// Director and technical notes
    pub cinematic_notes: String,
}

/// Number of scenes requested from the manifest call, always within `1..=20`.
///
/// # Examples
///
/// ```
/// use cinereel_core::SceneCount;
///
/// assert_eq!(SceneCount::default().get(), 10);
/// assert_eq!(SceneCount::new(20).unwrap().get(), 20);
/// assert!(SceneCount::new(0).is_err());
/// assert!(SceneCount::new(21).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct SceneCount(u32);

impl SceneCount {
    /// Fewest scenes a manifest may contain.
    pub const MIN: u32 = 1;
    /// Most scenes a manifest may contain.
    pub const MAX: u32 = 20;

    /// Validate a requested count.
    #[track_caller]
    pub fn new(count: u32) -> Result<Self, StudioError> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(StudioError::new(StudioErrorKind::InvalidSceneCount {
                requested: count,
                min: Self::MIN,
                max: Self::MAX,
            }))
        }
    }

    /// The count as a plain integer.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SceneCount {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u32> for SceneCount {
    type Error = StudioError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<SceneCount> for u32 {
    fn from(count: SceneCount) -> Self {
        count.0
    }
}
