//! Shared test doubles for the `pallas` workspace.

use async_trait::async_trait;
use pallas::errors::PromptError;
use pallas::providers::ai::AiProvider;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock AI Provider ---

/// A programmable `AiProvider` that records every prompt it receives.
///
/// Responses are matched by a substring of the prompt; the first programmed
/// key found in the prompt wins, otherwise the default response is used.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, String)>>>,
    default_response: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that answers every prompt with `response`.
    pub fn always(response: &str) -> Self {
        let mock = Self::new();
        mock.set_default_response(response);
        mock
    }

    /// A mock whose every call fails with `PromptError::AiApi(message)`.
    pub fn failing(message: &str) -> Self {
        let mock = Self::new();
        *mock.failure.lock().unwrap() = Some(message.to_string());
        mock
    }

    /// Delays every answer, for exercising timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Pre-programs a response for prompts containing `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push((key.to_string(), response.to_string()));
    }

    pub fn set_default_response(&self, response: &str) {
        *self.default_response.lock().unwrap() = Some(response.to_string());
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, PromptError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(PromptError::AiApi(message));
        }

        let programmed = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, response)| response.clone());

        programmed
            .or_else(|| self.default_response.lock().unwrap().clone())
            .ok_or_else(|| {
                PromptError::AiApi(format!(
                    "MockAiProvider: No response programmed for prompt. Got: '{prompt}'"
                ))
            })
    }
}
