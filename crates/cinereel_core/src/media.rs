//! Encoded media payloads exchanged with the Gemini service.

use base64::{Engine, engine::general_purpose::STANDARD};
use cinereel_error::{GeminiError, GeminiErrorKind};
use serde::{Deserialize, Serialize};

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// An image carried as a data URL (`data:<mime>;base64,<payload>`).
///
/// Reference images, rendered frames, and exported images all use this form so a
/// project snapshot is self-contained.
///
/// # Examples
///
/// ```
/// use cinereel_core::EncodedImage;
///
/// let image = EncodedImage::from_bytes("image/jpeg", b"\xff\xd8\xff");
/// assert_eq!(image.mime_type(), "image/jpeg");
/// assert_eq!(image.decode().unwrap(), b"\xff\xd8\xff");
///
/// let bare = EncodedImage::from("aGVsbG8=".to_string());
/// assert_eq!(bare.mime_type(), "image/png");
/// assert_eq!(bare.base64_data(), "aGVsbG8=");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encode raw bytes with the given MIME type.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::from_base64(mime_type, &STANDARD.encode(bytes))
    }

    /// Wrap an already base64-encoded payload.
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, data))
    }

    /// The MIME type declared in the data URL, `image/png` if absent.
    pub fn mime_type(&self) -> &str {
        let Some(header) = self.0.strip_prefix("data:") else {
            return DEFAULT_IMAGE_MIME;
        };
        let mime = header.split([';', ',']).next().unwrap_or_default();
        if mime.is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            mime
        }
    }

    /// The base64 payload without the data URL header.
    pub fn base64_data(&self) -> &str {
        match self.0.split_once(',') {
            Some((_, data)) => data,
            None => &self.0,
        }
    }

    /// Decode the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, GeminiError> {
        STANDARD
            .decode(self.base64_data())
            .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))
    }

    /// The full data URL.
    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// A downloaded video produced by the video model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoClip {
    /// MIME type reported by the download, usually `video/mp4`
    pub mime_type: String,
    /// Raw video bytes
    pub bytes: Vec<u8>,
}
