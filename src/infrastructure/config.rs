//! Application configuration

use std::env;

use anyhow::{Context, Result};

use crate::application::services::ModelSelection;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key; generation fails with the user-facing message when unset
    pub gemini_api_key: Option<String>,
    /// Gemini REST API base URL
    pub gemini_base_url: String,
    /// Model used to draw the illustration
    pub gemini_image_model: String,
    /// Vision model used to label the illustration
    pub gemini_analysis_model: String,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            gemini_api_key,
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            gemini_image_model: lookup("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash-image".to_string()),
            gemini_analysis_model: lookup("GEMINI_ANALYSIS_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),

            server_port: lookup("SERVER_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }

    pub fn model_selection(&self) -> ModelSelection {
        ModelSelection {
            image_model: self.gemini_image_model.clone(),
            analysis_model: self.gemini_analysis_model.clone(),
        }
    }
}
