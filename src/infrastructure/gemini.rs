//! Gemini client for image generation and image analysis

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{
    ContentPart, ContentRequest, ContentResponse, GenerativeModelPort, InlineData,
};

/// Client for the Gemini `generateContent` REST API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Call `models/{model}:generateContent`
    pub async fn generate_content(
        &self,
        request: ContentRequest,
    ) -> Result<ContentResponse, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = GenerateContentRequest::from(request);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        Ok(payload.into_content_response())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("No Gemini API key configured")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<WireImageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl From<ContentRequest> for GenerateContentRequest {
    fn from(request: ContentRequest) -> Self {
        let parts = request
            .parts
            .into_iter()
            .map(|part| match part {
                ContentPart::Text(text) => WirePart {
                    text: Some(text),
                    inline_data: None,
                },
                ContentPart::InlineData(inline) => WirePart {
                    text: None,
                    inline_data: Some(WireInlineData {
                        mime_type: inline.mime_type,
                        data: inline.data,
                    }),
                },
            })
            .collect();

        let config = request.config;
        let generation_config = if config.aspect_ratio.is_none()
            && config.response_mime_type.is_none()
            && config.response_schema.is_none()
        {
            None
        } else {
            Some(WireGenerationConfig {
                image_config: config
                    .aspect_ratio
                    .map(|aspect_ratio| WireImageConfig { aspect_ratio }),
                response_mime_type: config.response_mime_type,
                response_schema: config.response_schema,
            })
        };

        Self {
            contents: vec![WireContent {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config,
        }
    }
}

impl GenerateContentResponse {
    /// Parts of the first candidate; an empty response when there is none
    fn into_content_response(self) -> ContentResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            tracing::warn!(
                "Gemini returned no candidates (feedback: {:?})",
                self.prompt_feedback
            );
            return ContentResponse::default();
        };

        if let Some(reason) = &candidate.finish_reason {
            tracing::debug!("Gemini finish reason: {}", reason);
        }

        let parts = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match (part.inline_data, part.text) {
                (Some(inline), _) => Some(ContentPart::InlineData(InlineData {
                    mime_type: inline.mime_type,
                    data: inline.data,
                })),
                (None, Some(text)) => Some(ContentPart::Text(text)),
                (None, None) => None,
            })
            .collect();

        ContentResponse { parts }
    }
}

// =============================================================================
// GenerativeModelPort Implementation
// =============================================================================

#[async_trait]
impl GenerativeModelPort for GeminiClient {
    type Error = GeminiError;

    async fn generate_content(&self, request: ContentRequest) -> Result<ContentResponse, Self::Error> {
        // Call the inherent method using GeminiClient:: syntax to avoid recursion
        GeminiClient::generate_content(self, request).await
    }
}
