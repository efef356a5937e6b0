//! # Request Handlers
//!
//! `/sql` is a stateless question-to-query endpoint. `/chat` keeps one
//! transcript per client session, named by the `X-Session-Id` header: the
//! user turn is recorded before generation, the assistant turn only when a
//! query came back.

use super::{
    errors::AppError,
    state::AppState,
    types::{ChatMessage, ChatRequest, SqlResponse},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use pallas::GenerateSqlOptions;
use tracing::info;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "Pallas text-to-SQL server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Header naming the chat session a request belongs to.
pub const SESSION_HEADER: &str = "x-session-id";

/// Session used by clients that send no session header.
pub const DEFAULT_SESSION: &str = "default";

const MAX_SESSION_ID_LEN: usize = 64;

fn session_id(headers: &HeaderMap) -> Result<String, AppError> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(DEFAULT_SESSION.to_string());
    };
    let id = value.to_str().unwrap_or_default().trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AppError::BadRequest(format!(
            "{SESSION_HEADER} must be 1-{MAX_SESSION_ID_LEN} letters, digits, '-' or '_'."
        )));
    }
    Ok(id.to_string())
}

fn require_question(question: &str) -> Result<(), AppError> {
    if question.trim().is_empty() {
        return Err(AppError::BadRequest(
            "The question must not be blank.".to_string(),
        ));
    }
    Ok(())
}

/// Translates a single question into SQL.
pub async fn sql_handler(
    State(app_state): State<AppState>,
    Json(options): Json<GenerateSqlOptions>,
) -> Result<Json<SqlResponse>, AppError> {
    require_question(&options.question)?;
    if options.result_limit == Some(0) {
        return Err(AppError::BadRequest(
            "result_limit must be at least 1.".to_string(),
        ));
    }
    info!("Received question: '{}'", options.question);

    let query = app_state
        .prompt_client
        .generate_sql_with_options(options)
        .await?;
    Ok(Json(SqlResponse { sql: query.sql }))
}

/// Returns the session's chat transcript, oldest message first.
pub async fn get_chat_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let session = session_id(&headers)?;
    Ok(Json(app_state.chats.snapshot(&session)))
}

/// Answers one chat turn and returns the assistant message.
pub async fn post_chat_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let session = session_id(&headers)?;
    require_question(&request.message)?;
    let question = request.message.trim().to_string();
    app_state
        .chats
        .push(&session, ChatMessage::user(question.clone()));

    let query = app_state.prompt_client.generate_sql(&question).await?;
    let answer = ChatMessage::assistant_sql(query.sql);
    app_state.chats.push(&session, answer.clone());
    Ok(Json(answer))
}

/// Resets the session's transcript to the greeting.
pub async fn reset_chat_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let session = session_id(&headers)?;
    app_state.chats.reset(&session);
    info!(session = %session, "Chat transcript reset.");
    Ok(StatusCode::NO_CONTENT)
}
