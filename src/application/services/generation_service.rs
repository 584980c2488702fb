//! Generation Service - Illustration plus vocabulary in two model calls
//!
//! A card is produced by two strictly sequential requests:
//!
//! 1. The image model draws the character in the scene.
//! 2. The vision model receives that image and returns the labeled
//!    vocabulary as schema-constrained JSON.
//!
//! Either step failing fails the whole run; nothing from a failed run is
//! returned, not even the image from step 1.

use crate::application::ports::outbound::{ContentRequest, GenerativeModelPort};
use crate::application::services::llm::{
    analysis_response_schema, build_analysis_prompt, build_image_prompt, parse_vocabulary,
    VocabularyParseError, IMAGE_ASPECT_RATIO,
};
use crate::domain::entities::{
    CharacterIdentity, GeneratedImage, GenerationResult, VocabularyItem, DEFAULT_IMAGE_MIME_TYPE,
};
use crate::domain::value_objects::ScenePrompt;

/// Model identifiers for the two calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub image_model: String,
    pub analysis_model: String,
}

/// Pipeline step being executed, reported as the run progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    GeneratingImage,
    AnalyzingImage,
}

/// Runs the image and analysis calls against a generative model
pub struct GenerationService<M: GenerativeModelPort> {
    model: M,
    models: ModelSelection,
}

impl<M: GenerativeModelPort> GenerationService<M> {
    pub fn new(model: M, models: ModelSelection) -> Self {
        Self { model, models }
    }

    /// Produce a card, calling `on_stage` as each step begins
    pub async fn generate_with_progress<F>(
        &self,
        character: CharacterIdentity,
        scene: &ScenePrompt,
        on_stage: F,
    ) -> Result<GenerationResult, PipelineError>
    where
        F: Fn(PipelineStage) + Send + Sync,
    {
        on_stage(PipelineStage::GeneratingImage);
        let image = self.synthesize_image(character, scene).await?;

        on_stage(PipelineStage::AnalyzingImage);
        let vocabulary = self.analyze_image(character, scene, &image).await?;

        tracing::info!(
            "Generated card for {} with {} vocabulary items",
            character,
            vocabulary.len()
        );

        Ok(GenerationResult::new(
            character,
            scene.clone(),
            image,
            vocabulary,
        ))
    }

    async fn synthesize_image(
        &self,
        character: CharacterIdentity,
        scene: &ScenePrompt,
    ) -> Result<GeneratedImage, PipelineError> {
        let prompt = build_image_prompt(character, scene);
        tracing::debug!("Generating image with prompt: {}", prompt);

        let request = ContentRequest::new(&self.models.image_model)
            .with_text(prompt)
            .with_aspect_ratio(IMAGE_ASPECT_RATIO);

        let response = self
            .model
            .generate_content(request)
            .await
            .map_err(|e| PipelineError::ImageRequest(e.to_string()))?;

        let inline = response
            .first_inline_data()
            .ok_or(PipelineError::NoImageProduced)?;

        let mime_type = inline
            .mime_type
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME_TYPE);

        let image = GeneratedImage::from_base64(mime_type, &inline.data)?;
        tracing::debug!(
            "Image model returned {} bytes of {}",
            image.bytes.len(),
            image.mime_type
        );
        Ok(image)
    }

    async fn analyze_image(
        &self,
        character: CharacterIdentity,
        scene: &ScenePrompt,
        image: &GeneratedImage,
    ) -> Result<Vec<VocabularyItem>, PipelineError> {
        let request = ContentRequest::new(&self.models.analysis_model)
            .with_inline_data(&image.mime_type, image.to_base64())
            .with_text(build_analysis_prompt(character, scene))
            .with_json_schema(analysis_response_schema());

        let response = self
            .model
            .generate_content(request)
            .await
            .map_err(|e| PipelineError::AnalysisRequest(e.to_string()))?;

        Ok(parse_vocabulary(&response.text())?)
    }
}

/// Errors that end a generation run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Image request failed: {0}")]
    ImageRequest(String),
    #[error("Image model produced no inline image")]
    NoImageProduced,
    #[error("Image payload could not be decoded: {0}")]
    InvalidImagePayload(#[from] base64::DecodeError),
    #[error("Analysis request failed: {0}")]
    AnalysisRequest(String),
    #[error(transparent)]
    AnalysisOutput(#[from] VocabularyParseError),
}

impl PipelineError {
    /// Step the run failed in
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::ImageRequest(_)
            | PipelineError::NoImageProduced
            | PipelineError::InvalidImagePayload(_) => PipelineStage::GeneratingImage,
            PipelineError::AnalysisRequest(_) | PipelineError::AnalysisOutput(_) => {
                PipelineStage::AnalyzingImage
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::application::ports::outbound::{ContentPart, ContentResponse, InlineData};

    /// Model that replays scripted responses and records every request
    #[derive(Default)]
    pub(crate) struct ScriptedModel {
        responses: Mutex<VecDeque<Result<ContentResponse, std::io::Error>>>,
        pub(crate) requests: Mutex<Vec<ContentRequest>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(
            responses: Vec<Result<ContentResponse, std::io::Error>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl GenerativeModelPort for ScriptedModel {
        type Error = std::io::Error;

        async fn generate_content(
            &self,
            request: ContentRequest,
        ) -> Result<ContentResponse, Self::Error> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(std::io::Error::other("no scripted response left")))
        }
    }

    pub(crate) fn image_response(mime_type: Option<&str>, data: &str) -> ContentResponse {
        ContentResponse {
            parts: vec![
                ContentPart::Text("Here is your illustration".to_string()),
                ContentPart::InlineData(InlineData {
                    mime_type: mime_type.map(str::to_string),
                    data: data.to_string(),
                }),
            ],
        }
    }

    pub(crate) fn text_response(text: &str) -> ContentResponse {
        ContentResponse {
            parts: vec![ContentPart::Text(text.to_string())],
        }
    }

    pub(crate) fn vocabulary_json(count: usize) -> String {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                let edge = (i * 90) as i64;
                serde_json::json!({
                    "english": format!("Word{}", i),
                    "korean": format!("단어{}", i),
                    "chinese": format!("单词{}", i),
                    "box2d": {"ymin": edge, "xmin": edge, "ymax": edge + 80, "xmax": edge + 80}
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    pub(crate) fn models() -> ModelSelection {
        ModelSelection {
            image_model: "image-model".to_string(),
            analysis_model: "analysis-model".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_run_returns_image_and_vocabulary_in_order() {
        let model = ScriptedModel::new(vec![
            Ok(image_response(Some("image/jpeg"), "AAEC")),
            Ok(text_response(&vocabulary_json(10))),
        ]);
        let service = GenerationService::new(model, models());

        let result = service
            .generate_with_progress(CharacterIdentity::Tanjiro, &ScenePrompt::new("海滩"), |_| {})
            .await
            .unwrap();

        assert_eq!(result.image_url, "data:image/jpeg;base64,AAEC");
        assert_eq!(result.vocabulary.len(), 10);
        let words: Vec<&str> = result.vocabulary.iter().map(|v| v.english.as_str()).collect();
        assert_eq!(words[0], "Word0");
        assert_eq!(words[9], "Word9");
        assert_eq!(result.character, CharacterIdentity::Tanjiro);
    }

    #[tokio::test]
    async fn test_requests_are_shaped_for_each_step() {
        let model = ScriptedModel::new(vec![
            Ok(image_response(Some("image/webp"), "AAEC")),
            Ok(text_response("[]")),
        ]);
        let service = GenerationService::new(model, models());

        service
            .generate_with_progress(CharacterIdentity::Nezuko, &ScenePrompt::new("学校"), |_| {})
            .await
            .unwrap();

        let requests = service.model.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        let image_request = &requests[0];
        assert_eq!(image_request.model, "image-model");
        assert_eq!(image_request.config.aspect_ratio.as_deref(), Some("1:1"));
        assert!(image_request.config.response_schema.is_none());

        let analysis_request = &requests[1];
        assert_eq!(analysis_request.model, "analysis-model");
        assert_eq!(
            analysis_request.parts[0],
            ContentPart::InlineData(InlineData {
                mime_type: Some("image/webp".to_string()),
                data: "AAEC".to_string(),
            })
        );
        assert!(matches!(&analysis_request.parts[1], ContentPart::Text(t) if t.contains("学校")));
        assert!(analysis_request.config.response_schema.is_some());
    }

    #[tokio::test]
    async fn test_missing_mime_type_defaults_to_png() {
        let model = ScriptedModel::new(vec![
            Ok(image_response(None, "AAEC")),
            Ok(text_response("[]")),
        ]);
        let service = GenerationService::new(model, models());

        let result = service
            .generate_with_progress(CharacterIdentity::Usagi, &ScenePrompt::new("太空"), |_| {})
            .await
            .unwrap();

        assert_eq!(result.image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_no_inline_image_fails_without_analysis() {
        let model = ScriptedModel::new(vec![Ok(text_response("Sorry, I can only talk."))]);
        let service = GenerationService::new(model, models());

        let err = service
            .generate_with_progress(CharacterIdentity::Chiikawa, &ScenePrompt::new("演唱会"), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::NoImageProduced));
        assert_eq!(err.stage(), PipelineStage::GeneratingImage);
        assert_eq!(service.model.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_fails_image_step() {
        let model = ScriptedModel::new(vec![Err(std::io::Error::other("API key not valid"))]);
        let service = GenerationService::new(model, models());

        let err = service
            .generate_with_progress(CharacterIdentity::Zenitsu, &ScenePrompt::new("露营"), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::ImageRequest(ref msg) if msg.contains("API key")));
    }

    #[tokio::test]
    async fn test_malformed_analysis_fails_whole_run() {
        let model = ScriptedModel::new(vec![
            Ok(image_response(Some("image/png"), "AAEC")),
            Ok(text_response("[{\"english\": ")),
        ]);
        let service = GenerationService::new(model, models());

        let err = service
            .generate_with_progress(CharacterIdentity::Inosuke, &ScenePrompt::new("海滩"), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::AnalysisOutput(_)));
        assert_eq!(err.stage(), PipelineStage::AnalyzingImage);
    }

    #[tokio::test]
    async fn test_progress_reports_both_stages_in_order() {
        let model = ScriptedModel::new(vec![
            Ok(image_response(Some("image/png"), "AAEC")),
            Ok(text_response("[]")),
        ]);
        let service = GenerationService::new(model, models());
        let stages = Mutex::new(Vec::new());

        service
            .generate_with_progress(
                CharacterIdentity::Hachiware,
                &ScenePrompt::new("露营"),
                |stage| stages.lock().unwrap().push(stage),
            )
            .await
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![PipelineStage::GeneratingImage, PipelineStage::AnalyzingImage]
        );
    }
}
