//! The four studio model calls.

use crate::{
    GenerateContentRequest, GenerateVideoRequest, GenerationConfig, GenerativeBackend,
    ImageConfig, ModelSelection, Part, PollConfig, VideoImage, VideoInstance, VideoParameters,
    VideoPoller, prompts,
};
use cinereel_core::{
    AnimationScene, DEFAULT_LANGUAGE, EncodedImage, MAX_HERO_IMAGES, SceneCount, SceneRecord,
    VideoClip,
};
use cinereel_error::{CinereelResult, GeminiError, GeminiErrorKind};
use derive_getters::Getters;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const FRAME_ASPECT_RATIO: &str = "16:9";

/// Inputs of the manifest call.
///
/// # Examples
///
/// ```
/// use cinereel_core::SceneCount;
/// use cinereel_models::ManifestRequestBuilder;
///
/// let request = ManifestRequestBuilder::default()
///     .title("Laut")
///     .synopsis("A fisher's daughter sails into the storm.")
///     .visual_style("Anime")
///     .count(SceneCount::new(3).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(request.language(), "Bahasa Melayu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ManifestRequest {
    /// Film title
    title: String,
    /// Synopsis
    synopsis: String,
    /// Hero DNA, may be empty
    #[builder(default)]
    hero_description: String,
    /// Visual style label
    visual_style: String,
    /// Number of scenes wanted
    #[builder(default)]
    count: SceneCount,
    /// Language all text fields are written in
    #[builder(default = "DEFAULT_LANGUAGE.to_string()")]
    language: String,
}

/// Inputs of the scene frame call.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct SceneVisualRequest {
    /// Descriptive fields of the scene
    scene: SceneRecord,
    /// Hero reference images, sent before the prompt
    #[builder(default)]
    hero_images: Vec<EncodedImage>,
    /// Hero DNA
    #[builder(default)]
    hero_description: String,
    /// Visual style label
    visual_style: String,
    /// Revision note for a remake
    #[builder(default, setter(into, strip_option))]
    remake_instruction: Option<String>,
}

/// Builds the studio's model requests and unwraps their responses.
#[derive(Clone)]
pub struct StudioModels {
    backend: Arc<dyn GenerativeBackend>,
    models: ModelSelection,
    poll: PollConfig,
}

impl std::fmt::Debug for StudioModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioModels")
            .field("models", &self.models)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl StudioModels {
    /// Create a request builder over `backend`.
    pub fn new(backend: Arc<dyn GenerativeBackend>, models: ModelSelection, poll: PollConfig) -> Self {
        Self {
            backend,
            models,
            poll,
        }
    }

    /// Models used for each call.
    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    /// Describe the hero from its reference images.
    ///
    /// Fails with `NoReferenceImages` before any call when `images` is empty.
    #[instrument(skip(self, images), fields(images = images.len()))]
    pub async fn analyze_hero(&self, images: &[EncodedImage]) -> CinereelResult<String> {
        if images.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::NoReferenceImages).into());
        }

        let mut parts = images
            .iter()
            .take(MAX_HERO_IMAGES)
            .map(|image| Part::inline(image.mime_type(), image.base64_data()))
            .collect::<Vec<_>>();
        parts.push(Part::text(prompts::hero_analysis()));

        let request = GenerateContentRequest::user(parts);
        let response = self
            .backend
            .generate_content(self.models.analysis_model(), &request)
            .await?;

        let description = response.text().trim().to_string();
        info!(chars = description.len(), "Hero analysis complete");
        Ok(description)
    }

    /// Ask the text model for the scene manifest.
    ///
    /// Output that is missing or does not parse as the schema yields an empty list;
    /// transport and service failures are still errors.
    #[instrument(skip(self, request), fields(title = %request.title, count = %request.count))]
    pub async fn generate_manifest(&self, request: &ManifestRequest) -> CinereelResult<Vec<SceneRecord>> {
        let prompt = prompts::manifest(
            &request.title,
            &request.synopsis,
            &request.hero_description,
            &request.visual_style,
            request.count.get(),
            &request.language,
        );
        let body = GenerateContentRequest::user(vec![Part::text(prompt)]).with_config(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(prompts::manifest_schema()),
            image_config: None,
        });

        let response = self
            .backend
            .generate_content(self.models.manifest_model(), &body)
            .await?;

        let records = parse_manifest(&response.text());
        info!(scenes = records.len(), "Manifest generated");
        Ok(records)
    }

    /// Render one scene frame with the hero as visual reference.
    #[instrument(skip(self, request), fields(scene = request.scene.scene_number, remake = request.remake_instruction.is_some()))]
    pub async fn generate_scene_visual(&self, request: &SceneVisualRequest) -> CinereelResult<EncodedImage> {
        let mut parts = request
            .hero_images
            .iter()
            .map(|image| Part::inline(image.mime_type(), image.base64_data()))
            .collect::<Vec<_>>();
        parts.push(Part::text(prompts::scene_frame(
            &request.scene,
            &request.hero_description,
            &request.visual_style,
            request.remake_instruction.as_deref(),
        )));

        let body = GenerateContentRequest::user(parts).with_config(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: FRAME_ASPECT_RATIO.to_string(),
            }),
            ..Default::default()
        });

        let response = self
            .backend
            .generate_content(self.models.image_model(), &body)
            .await?;

        let inline = response
            .first_inline_data()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::NoImageData))?;
        let mime_type = if inline.mime_type.is_empty() {
            "image/png"
        } else {
            inline.mime_type.as_str()
        };
        debug!(mime_type, "Scene frame rendered");
        Ok(EncodedImage::from_base64(mime_type, &inline.data))
    }

    /// Animate a rendered scene frame.
    ///
    /// Fails with `MissingSceneImage` before any call when the scene has no frame.
    /// Otherwise submits the job, waits for it and downloads the clip.
    #[instrument(skip(self, scene, hero_description), fields(scene = scene.scene_number))]
    pub async fn extend_scene_to_video(
        &self,
        scene: &AnimationScene,
        hero_description: &str,
    ) -> CinereelResult<VideoClip> {
        let image = scene
            .image
            .as_ref()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingSceneImage(scene.scene_number)))?;

        let request = GenerateVideoRequest {
            instances: vec![VideoInstance {
                prompt: prompts::video(&scene.visual, hero_description),
                image: Some(VideoImage {
                    bytes_base64_encoded: image.base64_data().to_string(),
                    mime_type: image.mime_type().to_string(),
                }),
            }],
            parameters: VideoParameters::default(),
        };

        let operation = self
            .backend
            .start_video(self.models.video_model(), &request)
            .await?;
        let uri = VideoPoller::new(self.backend.as_ref(), self.poll)
            .wait(operation)
            .await?;
        self.backend.download_video(&uri).await
    }
}

/// Parse manifest text, tolerating a surrounding code fence.
fn parse_manifest(text: &str) -> Vec<SceneRecord> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        warn!("Manifest response was empty");
        return Vec::new();
    }

    match serde_json::from_str::<Vec<SceneRecord>>(body) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Failed to parse manifest JSON");
            Vec::new()
        }
    }
}
