//! Shared application state

use std::sync::Arc;

use crate::application::services::{GenerationService, SessionService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::gemini::GeminiClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Owner of the single session state and the generation pipeline
    pub session: Arc<SessionService<GeminiClient>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        // Initialize Gemini client
        let gemini_client = GeminiClient::new(&config.gemini_base_url, config.gemini_api_key.clone());
        if !gemini_client.has_api_key() {
            tracing::warn!(
                "GEMINI_API_KEY is not set; every generation will fail until it is configured"
            );
        }

        let generation_service = GenerationService::new(gemini_client, config.model_selection());
        let session = Arc::new(SessionService::new(generation_service));

        Self { config, session }
    }
}
