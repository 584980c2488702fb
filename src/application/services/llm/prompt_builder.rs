//! Prompt building functions for the two model requests

use serde_json::json;

use crate::domain::entities::CharacterIdentity;
use crate::domain::value_objects::ScenePrompt;

/// Number of vocabulary items the analysis model is asked for
pub const VOCABULARY_ITEM_COUNT: usize = 10;

/// Minimum number of advanced-register words among them
pub const MIN_ADVANCED_ITEMS: usize = 5;

/// Aspect ratio requested from the image model
pub const IMAGE_ASPECT_RATIO: &str = "1:1";

/// Build the prompt for the illustration
pub fn build_image_prompt(character: CharacterIdentity, scene: &ScenePrompt) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "A high quality, cute, vibrant illustration of {} in a {} setting.\n",
        character.description(),
        scene.as_str().trim()
    ));
    prompt.push_str(&format!(
        "The composition should be 'wide shot' or 'rich in detail' to allow for at least {} distinct objects to be identified.\n",
        VOCABULARY_ITEM_COUNT
    ));
    prompt.push_str(
        "Style: Japanese kawaii aesthetic, soft shading, thick clean outlines, sticker art style, flat design.\n",
    );
    prompt.push_str(
        "Ensure the main character is in the center but surrounded by interesting objects related to the scene.\n",
    );
    prompt.push_str("No text, speech bubbles, or labels in the image itself. Clean background.");

    prompt
}

/// Build the prompt asking the vision model to label the illustration
pub fn build_analysis_prompt(character: CharacterIdentity, scene: &ScenePrompt) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Analyze this image of {} in a {} setting.\n",
        character.name(),
        scene.as_str().trim()
    ));
    prompt.push_str(&format!(
        "Identify exactly {} distinct items in the image for vocabulary learning.\n\n",
        VOCABULARY_ITEM_COUNT
    ));

    prompt.push_str("CRITICAL REQUIREMENTS:\n");
    prompt.push_str(&format!("1. Total items: {}.\n", VOCABULARY_ITEM_COUNT));
    prompt.push_str(&format!(
        "2. At least {} of these items must be labeled with 'Advanced' or 'IELTS' level English vocabulary words that describe the object or the concept represented by the object (e.g., instead of 'light', use 'Illumination' or 'Luminary' if appropriate, or describe a specific quality).\n",
        MIN_ADVANCED_ITEMS
    ));
    prompt.push_str(&format!(
        "3. The other {} can be common nouns suitable for daily life.\n",
        VOCABULARY_ITEM_COUNT - MIN_ADVANCED_ITEMS
    ));
    prompt.push_str("4. Do not overlap bounding boxes significantly.\n\n");

    prompt.push_str("For each object, provide:\n");
    prompt.push_str("1. 'english': The word in English.\n");
    prompt.push_str("2. 'korean': The word in Korean (Hangul).\n");
    prompt.push_str("3. 'chinese': The word in Chinese (Simplified).\n");
    prompt.push_str(
        "4. 'box2d': The bounding box of the object in the image (ymin, xmin, ymax, xmax) on a scale of 0 to 1000.\n\n",
    );
    prompt.push_str("Return a JSON array.");

    prompt
}

/// Response schema the analysis output must follow
pub fn analysis_response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "english": { "type": "STRING" },
                "korean": { "type": "STRING" },
                "chinese": { "type": "STRING" },
                "box2d": {
                    "type": "OBJECT",
                    "properties": {
                        "ymin": { "type": "INTEGER" },
                        "xmin": { "type": "INTEGER" },
                        "ymax": { "type": "INTEGER" },
                        "xmax": { "type": "INTEGER" }
                    },
                    "required": ["ymin", "xmin", "ymax", "xmax"]
                }
            },
            "required": ["english", "korean", "chinese", "box2d"]
        }
    })
}
