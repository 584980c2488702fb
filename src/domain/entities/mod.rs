//! Domain entities - Core business objects

mod character;
mod vocabulary;

pub use character::{CharacterGroup, CharacterIdentity};
pub use vocabulary::{GeneratedImage, GenerationResult, VocabularyItem, DEFAULT_IMAGE_MIME_TYPE};
