//! Value objects - Immutable objects defined by their attributes

mod bounding_box;
mod ids;
mod scene_prompt;

pub use bounding_box::{AnchorPoint, BoundingBox, BoundingBoxError};
pub use ids::{ClientId, GenerationId};
pub use scene_prompt::{ScenePreset, ScenePrompt};
