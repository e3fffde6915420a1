//! # AI Provider Factory
//!
//! Builds the single provider handle used by a generation run. The caller
//! constructs it once at startup and passes it explicitly to the generator.

use crate::{
    errors::PromptError,
    providers::ai::{
        gemini::{gemini_api_url, GeminiProvider},
        local::LocalAiProvider,
        AiProvider,
    },
};
use tracing::{info, warn};

const LOCAL_FALLBACK_URL: &str = "http://localhost:1234/v1/chat/completions";

/// Everything needed to reach a generative language endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// Model identifier, e.g. `gemini-2.5-pro-exp-03-25`.
    pub model: String,
    pub api_key: Option<String>,
    /// Overrides the derived Gemini endpoint.
    pub api_url: Option<String>,
    /// Chat-completions endpoint used for non-Gemini models.
    pub local_api_url: Option<String>,
}

/// Creates an AI provider for the configured model.
///
/// Model names starting with `gemini` go to the Gemini API and require an API key.
/// Any other model is sent to an OpenAI-compatible endpoint.
pub fn create_provider(settings: &ProviderSettings) -> Result<Box<dyn AiProvider>, PromptError> {
    info!("Creating AI provider for model: '{}'", settings.model);

    if settings.model.trim().is_empty() {
        return Err(PromptError::MissingAiProvider(
            "a model identifier must be configured".to_string(),
        ));
    }

    let provider: Box<dyn AiProvider> = if settings.model.starts_with("gemini") {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(PromptError::MissingApiKey)?;
        let api_url = settings
            .api_url
            .clone()
            .unwrap_or_else(|| gemini_api_url(&settings.model));
        info!("Configuring Gemini provider with URL: {}", api_url);
        Box::new(GeminiProvider::new(api_url, api_key)?)
    } else {
        let api_url = match &settings.local_api_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => {
                warn!(
                    "No local AI API URL configured. Falling back to default: {}",
                    LOCAL_FALLBACK_URL
                );
                LOCAL_FALLBACK_URL.to_string()
            }
        };
        info!("Configuring Local AI provider with URL: {}", api_url);
        Box::new(LocalAiProvider::new(
            api_url,
            settings.api_key.clone(),
            Some(settings.model.clone()),
        )?)
    };

    Ok(provider)
}
