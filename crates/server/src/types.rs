//! # API Payloads
//!
//! Request and response bodies for the HTTP endpoints, and the chat
//! transcript entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The first assistant message of every transcript.
pub const GREETING: &str =
    "Hello! I am Pallas. Ask me a question like: \n*Sales per store for week 45 2025*";

#[derive(Serialize, Deserialize, Debug)]
pub struct SqlResponse {
    pub sql: String,
}

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of the chat transcript.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Set on assistant answers that carry a generated query, so a client
    /// can render them as code.
    pub is_sql: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn greeting() -> Self {
        Self::assistant_text(GREETING)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into(), false)
    }

    pub fn assistant_sql(sql: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, sql.into(), true)
    }

    fn assistant_text(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into(), false)
    }

    fn new(role: ChatRole, content: String, is_sql: bool) -> Self {
        Self {
            role,
            content,
            is_sql,
            created_at: Utc::now(),
        }
    }
}
