//! # AI Provider Factory
//!
//! This module centralizes the logic for creating AI provider instances from
//! configuration. By placing this logic in the `lib` crate, the CLI and the
//! server build providers (and the whole pipeline) the same way.

use crate::{
    config::{AiConfig, AppConfig},
    constants::{COMPLETION_STOP_SEQUENCE, DEFAULT_LOCAL_AI_URL, GEMINI_API_BASE},
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    types::{PromptClient, PromptClientBuilder},
};
use std::time::Duration;
use tracing::{info, warn};

/// Creates the AI provider described by `config`.
///
/// - Gemini requires an API key; its URL is derived from the model name when
///   not configured.
/// - Local providers fall back to a default OpenAI-compatible URL.
pub fn create_ai_provider(
    config: &AiConfig,
    timeout: Option<Duration>,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let stop_sequences = vec![COMPLETION_STOP_SEQUENCE.to_string()];
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| PromptError::MissingApiKey("gemini".to_string()))?;
            let api_url = config.api_url.clone().unwrap_or_else(|| {
                format!("{GEMINI_API_BASE}/{}:generateContent", config.model)
            });
            info!("Configuring Gemini provider with URL: {}", api_url);
            Box::new(
                GeminiProvider::new(api_url, api_key, timeout)?
                    .with_stop_sequences(stop_sequences),
            )
        }
        "local" => {
            let api_url = config.api_url.clone().unwrap_or_else(|| {
                warn!(
                    "No api_url set for the local provider. Falling back to default: {}",
                    DEFAULT_LOCAL_AI_URL
                );
                DEFAULT_LOCAL_AI_URL.to_string()
            });
            info!("Configuring Local AI provider with URL: {}", api_url);
            Box::new(
                LocalAiProvider::new(
                    api_url,
                    config.api_key.clone(),
                    Some(config.model.clone()),
                    timeout,
                )?
                .with_stop_sequences(stop_sequences),
            )
        }
        other => return Err(PromptError::UnsupportedProvider(other.to_string())),
    };
    Ok(provider)
}

/// Builds the complete, validated pipeline from configuration.
///
/// The catalog is loaded and cross-checked against the examples here, so a
/// broken catalog stops the front end before it accepts any question.
pub fn build_prompt_client(config: &AppConfig) -> Result<PromptClient, PromptError> {
    let loaded = config.load_catalog()?;
    let timeout = config.request_timeout();
    let ai_provider = create_ai_provider(&config.ai, Some(timeout))?;

    PromptClientBuilder::new()
        .ai_provider(ai_provider)
        .catalog(loaded.catalog)
        .examples(loaded.examples)
        .result_limit(config.result_limit)
        .timeout(timeout)
        .build()
}
