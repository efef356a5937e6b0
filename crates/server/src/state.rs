//! # Application State
//!
//! The shared state handed to every request handler: the text-to-SQL
//! pipeline, built once at startup, and the per-session chat transcripts.

use crate::types::ChatMessage;
use pallas::{config::AppConfig, providers::factory::build_prompt_client, PromptClient};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::info;

/// Most messages a single chat keeps, greeting included. Older turns are
/// dropped first.
pub const MAX_TRANSCRIPT_MESSAGES: usize = 100;

/// Chat transcripts, one per client session.
///
/// A session exists once it has received a message; reading an unknown
/// session yields just the greeting. Guards are dropped before any `.await`;
/// none of the methods are async.
#[derive(Debug, Default)]
pub struct ChatSessions {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl ChatSessions {
    pub fn snapshot(&self, session: &str) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .cloned()
            .unwrap_or_else(|| vec![ChatMessage::greeting()])
    }

    pub fn push(&self, session: &str, message: ChatMessage) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let messages = sessions
            .entry(session.to_string())
            .or_insert_with(|| vec![ChatMessage::greeting()]);
        messages.push(message);
        if messages.len() > MAX_TRANSCRIPT_MESSAGES {
            // Index 0 is the greeting.
            let excess = messages.len() - MAX_TRANSCRIPT_MESSAGES;
            messages.drain(1..=excess);
        }
    }

    /// Forgets a session, so its next read shows only the greeting.
    pub fn reset(&self, session: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session);
    }
}

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub prompt_client: Arc<PromptClient>,
    pub chats: Arc<ChatSessions>,
}

impl AppState {
    pub fn new(prompt_client: PromptClient) -> Self {
        Self {
            prompt_client: Arc::new(prompt_client),
            chats: Arc::new(ChatSessions::default()),
        }
    }
}

/// Builds the shared application state from the configuration.
///
/// Fails when the catalog is invalid or the AI provider cannot be created,
/// so a misconfigured server never starts listening.
pub fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let prompt_client = build_prompt_client(config)?;
    info!(
        provider = %config.ai.provider,
        tables = prompt_client.catalog().tables().len(),
        examples = prompt_client.examples().len(),
        "Initialized text-to-SQL pipeline."
    );
    Ok(AppState::new(prompt_client))
}
