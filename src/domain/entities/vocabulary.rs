//! Vocabulary cards - The generated image and the words found in it

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CharacterIdentity;
use crate::domain::value_objects::{BoundingBox, ScenePrompt};

/// Media type assumed when the model omits one
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

/// One learnable object in the generated scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyItem {
    pub english: String,
    pub korean: String,
    pub chinese: String,
    /// Where the object sits in the image, if the model located it
    pub box2d: Option<BoundingBox>,
}

/// Raw image returned by the image model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// Decode an inline base64 payload
    pub fn from_base64(
        mime_type: impl Into<String>,
        data: &str,
    ) -> Result<Self, base64::DecodeError> {
        Ok(Self {
            mime_type: mime_type.into(),
            bytes: BASE64.decode(data.trim())?,
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// `data:` URI the page can use directly as an image source
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// A finished card: the illustration plus its vocabulary in model order.
///
/// The image is not optional; a result only exists once an image was produced
/// and analyzed.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub character: CharacterIdentity,
    pub scene_prompt: ScenePrompt,
    pub image: GeneratedImage,
    /// Displayable reference built once from `image`
    pub image_url: String,
    pub vocabulary: Vec<VocabularyItem>,
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(
        character: CharacterIdentity,
        scene_prompt: ScenePrompt,
        image: GeneratedImage,
        vocabulary: Vec<VocabularyItem>,
    ) -> Self {
        let image_url = image.data_uri();
        Self {
            character,
            scene_prompt,
            image,
            image_url,
            vocabulary,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_payload_decodes_to_bytes() {
        let image = GeneratedImage::from_base64("image/jpeg", "AAEC").unwrap();
        assert_eq!(image.bytes, vec![0u8, 1, 2]);
        assert_eq!(image.to_base64(), "AAEC");
    }

    #[test]
    fn test_invalid_payload_is_rejected() {
        assert!(GeneratedImage::from_base64("image/png", "not base64!").is_err());
    }

    #[test]
    fn test_result_builds_data_uri() {
        let image = GeneratedImage::from_base64("image/png", "AAEC").unwrap();
        let result = GenerationResult::new(
            CharacterIdentity::Usagi,
            ScenePrompt::new("太空"),
            image,
            Vec::new(),
        );
        assert_eq!(result.image_url, "data:image/png;base64,AAEC");
        assert!(result.vocabulary.is_empty());
    }
}
