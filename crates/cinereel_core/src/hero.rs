//! The protagonist whose look must stay consistent across frames.

use crate::EncodedImage;
use serde::{Deserialize, Serialize};

/// Maximum number of reference images kept for the hero.
pub const MAX_HERO_IMAGES: usize = 4;

/// The single protagonist of a project.
///
/// `description` holds the character "DNA" produced by the analysis call and stays
/// empty until one succeeds.
///
/// # Examples
///
/// ```
/// use cinereel_core::{EncodedImage, HeroCharacter, MAX_HERO_IMAGES};
///
/// let mut hero = HeroCharacter::default();
/// let image = EncodedImage::from_bytes("image/png", b"png");
/// hero.add_images(vec![image.clone(); 3]);
/// hero.add_images(vec![image; 3]);
/// assert_eq!(hero.images.len(), MAX_HERO_IMAGES);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCharacter {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Reference images, oldest first
    pub images: Vec<EncodedImage>,
    /// Character DNA description
    pub description: String,
    /// True while an analysis call is in flight
    pub is_analyzing: bool,
}

impl Default for HeroCharacter {
    fn default() -> Self {
        Self {
            id: "h1".to_string(),
            name: "Protagonist".to_string(),
            images: Vec::new(),
            description: String::new(),
            is_analyzing: false,
        }
    }
}

impl HeroCharacter {
    /// Append reference images, keeping only the first [`MAX_HERO_IMAGES`].
    ///
    /// Returns how many of the offered images were kept.
    pub fn add_images(&mut self, images: impl IntoIterator<Item = EncodedImage>) -> usize {
        let before = self.images.len();
        self.images.extend(images);
        self.images.truncate(MAX_HERO_IMAGES);
        self.images.len() - before.min(self.images.len())
    }

    /// Remove the reference image at `index`, returning it.
    ///
    /// The description is left as is; it still reflects the last analysis.
    pub fn remove_image(&mut self, index: usize) -> Option<EncodedImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// True once the analysis call has produced a description.
    pub fn has_dna(&self) -> bool {
        !self.description.trim().is_empty()
    }
}
