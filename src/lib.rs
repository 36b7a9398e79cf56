pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod prompt;
pub mod registry;
pub mod scraper;
pub mod summarizer;

use std::sync::Arc;

use config::Config;
use error::{AppError, Result};
use llm::{ChatModel, GroqClient};
use registry::ModelRegistry;
use scraper::PageFetcher;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub fetcher: PageFetcher,
    pub model: Arc<dyn ChatModel>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = ModelRegistry::with_defaults(&config.default_model).ok_or_else(|| {
            AppError::ConfigError(format!("Unknown default model: {}", config.default_model))
        })?;

        let fetcher = PageFetcher::new()
            .map_err(|e| AppError::ConfigError(format!("Failed to build page fetcher: {}", e)))?;

        let model = GroqClient::new(
            &config.groq_api_base,
            config.groq_api_key.clone(),
            config.llm_timeout,
        )
        .map_err(|e| AppError::ConfigError(format!("Failed to build LLM client: {}", e)))?;

        Ok(Self {
            registry: Arc::new(registry),
            fetcher,
            model: Arc::new(model),
        })
    }
}
