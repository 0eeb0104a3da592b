//! Gemini REST data transfer objects.
//!
//! Only the fields the studio reads or writes are modelled; unknown response
//! fields are ignored.

use serde::{Deserialize, Serialize};

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    pub mime_type: String,
    /// Base64 data
    pub data: String,
}

/// One part of a content turn: text or inline media.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline media part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline media part.
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// A turn of content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Author role, `user` for requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parts in order
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn made of `parts`.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// Output aspect ratio for image models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// e.g. `16:9`
    pub aspect_ratio: String,
}

/// Generation options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested response MIME type (`application/json` for structured output)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// OpenAPI-style schema the response must follow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// Image output settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Body of `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns
    pub contents: Vec<Content>,
    /// Generation options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single user turn request.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content::user(parts)],
            generation_config: None,
        }
    }

    /// Attach generation options.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Number of inline media parts across all turns.
    pub fn inline_part_count(&self) -> usize {
        self.contents
            .iter()
            .flat_map(|c| &c.parts)
            .filter(|p| p.inline_data.is_some())
            .count()
    }
}

/// A response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Response of `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates, first one is used
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// A response whose first candidate holds `parts`.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content { role: Some("model".to_string()), parts }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }

    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate.
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    /// First inline media part of the first candidate.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|p| p.inline_data.as_ref())
    }
}

/// Starting frame for image-to-video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoImage {
    /// Base64 image bytes
    pub bytes_base64_encoded: String,
    /// MIME type
    pub mime_type: String,
}

/// One video generation instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInstance {
    /// Motion prompt
    pub prompt: String,
    /// Starting frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<VideoImage>,
}

/// Video generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    /// e.g. `16:9`
    pub aspect_ratio: String,
    /// e.g. `720p`
    pub resolution: String,
    /// Number of videos to generate
    pub sample_count: u32,
}

impl Default for VideoParameters {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
            sample_count: 1,
        }
    }
}

/// Body of `models/{model}:predictLongRunning`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    /// Instances, one per requested video
    pub instances: Vec<VideoInstance>,
    /// Parameters
    pub parameters: VideoParameters,
}

/// Error status carried by a finished operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    /// gRPC status code
    #[serde(default)]
    pub code: Option<i32>,
    /// Message
    #[serde(default)]
    pub message: String,
}

/// Reference to a generated file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    /// Download URI
    #[serde(default)]
    pub uri: Option<String>,
}

/// One generated video.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSample {
    /// Video file reference
    #[serde(default)]
    pub video: Option<VideoRef>,
}

/// Video generation result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    /// Generated videos
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

/// Payload of a finished video operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOperationResponse {
    /// Generated videos
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// Handle to a server-side video job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOperation {
    /// Resource name used to refresh the handle
    pub name: String,
    /// True once the job finished, successfully or not
    #[serde(default)]
    pub done: bool,
    /// Failure, when finished unsuccessfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationStatus>,
    /// Result, when finished successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<VideoOperationResponse>,
}

impl VideoOperation {
    /// A pending handle.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A finished handle pointing at `uri`.
    pub fn completed(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            error: None,
            response: Some(VideoOperationResponse {
                generate_video_response: Some(GenerateVideoResponse {
                    generated_samples: vec![GeneratedSample {
                        video: Some(VideoRef {
                            uri: Some(uri.into()),
                        }),
                    }],
                }),
            }),
        }
    }

    /// Download URI of the first generated video.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
    }
}
