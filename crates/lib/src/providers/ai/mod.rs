pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::{Response, StatusCode};
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for turning an assembled prompt into
/// a completion using different Large Language Models (e.g., Gemini, local models).
/// Implementations always request deterministic (temperature 0) decoding and
/// never retry on their own.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a completion for the given prompt.
    ///
    /// The result is the model's raw text, before any sanitizing.
    async fn generate(&self, prompt: &str) -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Converts a non-success HTTP response into the matching `PromptError`.
pub(crate) async fn error_from_response(response: Response) -> PromptError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = format!("{status}: {body}");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PromptError::AiAuth(message),
        StatusCode::TOO_MANY_REQUESTS => PromptError::AiRateLimited(message),
        _ => PromptError::AiApi(message),
    }
}

/// Treats a missing or whitespace-only completion as a provider failure.
pub(crate) fn non_empty_completion(text: Option<String>) -> Result<String, PromptError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(PromptError::EmptyCompletion),
    }
}
