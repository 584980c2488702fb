//! Prompt construction and response parsing for the model calls

pub mod prompt_builder;
pub mod vocabulary_parser;

pub use prompt_builder::{
    analysis_response_schema, build_analysis_prompt, build_image_prompt, IMAGE_ASPECT_RATIO,
};
pub use vocabulary_parser::{parse_vocabulary, VocabularyParseError};
