//! Session DTOs - What the HTTP API and WebSocket send to the browser

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::SessionState;
use crate::domain::entities::{CharacterGroup, CharacterIdentity, GenerationResult};
use crate::domain::services::{annotation_markers, AnnotationMarker};
use crate::domain::value_objects::{AnchorPoint, BoundingBox, ScenePreset};

/// Read-only view of the session state
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshotDto {
    pub character: CharacterIdentity,
    pub scene_prompt: String,
    pub phase: String,
    pub loading: bool,
    /// Progress caption while a generation runs
    pub caption: Option<String>,
    /// Whether the generate action is enabled
    pub can_generate: bool,
    pub error: Option<String>,
    pub result: Option<GenerationResultDto>,
}

impl From<&SessionState> for SessionSnapshotDto {
    fn from(state: &SessionState) -> Self {
        Self {
            character: state.character,
            scene_prompt: state.scene_prompt.as_str().to_string(),
            phase: state.phase.as_str().to_string(),
            loading: state.phase.is_loading(),
            caption: state.phase.caption().map(str::to_string),
            can_generate: state.can_start_generation(),
            error: state.error.clone(),
            result: state.result.as_deref().map(GenerationResultDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResultDto {
    pub character: CharacterIdentity,
    pub scene_prompt: String,
    /// `data:` URI of the illustration
    pub image_url: String,
    pub generated_at: String,
    pub vocabulary: Vec<VocabularyEntryDto>,
    pub markers: Vec<AnnotationMarker>,
}

impl From<&GenerationResult> for GenerationResultDto {
    fn from(result: &GenerationResult) -> Self {
        Self {
            character: result.character,
            scene_prompt: result.scene_prompt.as_str().to_string(),
            image_url: result.image_url.clone(),
            generated_at: result.generated_at.to_rfc3339(),
            vocabulary: result
                .vocabulary
                .iter()
                .enumerate()
                .map(|(index, item)| VocabularyEntryDto {
                    index,
                    english: item.english.clone(),
                    korean: item.korean.clone(),
                    chinese: item.chinese.clone(),
                    box2d: item.box2d,
                    anchor: item.box2d.map(|b| b.anchor()),
                })
                .collect(),
            markers: annotation_markers(&result.vocabulary),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VocabularyEntryDto {
    pub index: usize,
    pub english: String,
    pub korean: String,
    pub chinese: String,
    pub box2d: Option<BoundingBox>,
    pub anchor: Option<AnchorPoint>,
}

/// Characters and scene presets offered by the picker
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDto {
    pub groups: Vec<CharacterGroupDto>,
    pub scene_presets: Vec<ScenePresetDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterGroupDto {
    pub id: CharacterGroup,
    pub label: String,
    pub characters: Vec<CharacterIdentity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenePresetDto {
    pub key: ScenePreset,
    pub text: String,
}

impl CatalogDto {
    pub fn build() -> Self {
        Self {
            groups: CharacterGroup::ALL
                .into_iter()
                .map(|group| CharacterGroupDto {
                    id: group,
                    label: group.label().to_string(),
                    characters: group.members(),
                })
                .collect(),
            scene_presets: ScenePreset::ALL
                .into_iter()
                .map(|preset| ScenePresetDto {
                    key: preset,
                    text: preset.text().to_string(),
                })
                .collect(),
        }
    }
}

/// Request to change the selected character
#[derive(Debug, Deserialize)]
pub struct SelectCharacterRequestDto {
    pub character: CharacterIdentity,
}

/// Request to replace the scene text
#[derive(Debug, Deserialize)]
pub struct SetScenePromptRequestDto {
    pub scene_prompt: String,
}

/// Outcome of a generate request; rejected requests are not errors
#[derive(Debug, Serialize)]
pub struct GenerateResponseDto {
    pub accepted: bool,
    pub generation_id: Option<String>,
}
