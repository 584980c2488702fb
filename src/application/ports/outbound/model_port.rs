//! Generative model port - The one external call the pipeline makes
//!
//! Both the image call and the analysis call are "generate content" requests
//! against the same service; they differ only in model, parts and config.

use async_trait::async_trait;

/// One piece of a multimodal request or response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineData(InlineData),
}

/// Binary payload carried inline as base64
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    /// Declared media type; the service may leave it empty
    pub mime_type: Option<String>,
    /// Base64-encoded bytes
    pub data: String,
}

/// Output shaping options for a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    /// Aspect ratio for image output, e.g. "1:1"
    pub aspect_ratio: Option<String>,
    /// Force the text output into this media type, e.g. "application/json"
    pub response_mime_type: Option<String>,
    /// Schema the text output must conform to
    pub response_schema: Option<serde_json::Value>,
}

/// A request to generate content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRequest {
    pub model: String,
    pub parts: Vec<ContentPart>,
    pub config: GenerationConfig,
}

impl ContentRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            config: GenerationConfig::default(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ContentPart::Text(text.into()));
        self
    }

    pub fn with_inline_data(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.parts.push(ContentPart::InlineData(InlineData {
            mime_type: Some(mime_type.into()),
            data: data.into(),
        }));
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.config.aspect_ratio = Some(aspect_ratio.into());
        self
    }

    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.config.response_mime_type = Some("application/json".to_string());
        self.config.response_schema = Some(schema);
        self
    }
}

/// Parts of the first candidate, in the order the service returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentResponse {
    pub parts: Vec<ContentPart>,
}

impl ContentResponse {
    /// First part carrying non-empty inline data; later ones are ignored
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::InlineData(inline) if !inline.data.is_empty() => Some(inline),
            _ => None,
        })
    }

    /// All text parts joined together
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::InlineData(_) => None,
            })
            .collect()
    }
}

/// Port for a multimodal generative model service
#[async_trait]
pub trait GenerativeModelPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn generate_content(&self, request: ContentRequest) -> Result<ContentResponse, Self::Error>;
}
