//! # `/chat` Transcript Tests

mod common;

use common::TestApp;
use pallas_server::{
    handlers::SESSION_HEADER,
    types::{ChatMessage, ChatRole, GREETING},
};
use pallas_test_utils::MockAiProvider;
use reqwest::StatusCode;
use serde_json::json;

async fn transcript(app: &TestApp) -> anyhow::Result<Vec<ChatMessage>> {
    Ok(app.client.get(app.url("/chat")).send().await?.json().await?)
}

#[tokio::test]
async fn test_transcript_starts_with_greeting() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::new()).await?;

    let messages = transcript(&app).await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, ChatRole::Assistant);
    assert_eq!(messages[0].content, GREETING);
    assert!(!messages[0].is_sql);
    Ok(())
}

#[tokio::test]
async fn test_chat_turn_is_recorded() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::always("```sql\nSELECT * FROM FILIAAL;\n```")).await?;

    let response = app
        .client
        .post(app.url("/chat"))
        .json(&json!({ "message": " list the stores " }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let answer: ChatMessage = response.json().await?;
    assert_eq!(answer.role, ChatRole::Assistant);
    assert_eq!(answer.content, "SELECT * FROM FILIAAL;");
    assert!(answer.is_sql);

    let messages = transcript(&app).await?;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, ChatRole::User);
    assert_eq!(messages[1].content, "list the stores");
    assert_eq!(messages[2].content, "SELECT * FROM FILIAAL;");
    Ok(())
}

#[tokio::test]
async fn test_failed_turn_records_no_answer() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::failing("no quota")).await?;

    let response = app
        .client
        .post(app.url("/chat"))
        .json(&json!({ "message": "stores" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let messages = transcript(&app).await?;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, ChatRole::User);
    assert!(messages.iter().all(|m| !m.is_sql));
    Ok(())
}

#[tokio::test]
async fn test_reset_restores_greeting() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::always("SELECT 1")).await?;
    for message in ["first", "second"] {
        app.client
            .post(app.url("/chat"))
            .json(&json!({ "message": message }))
            .send()
            .await?;
    }
    assert_eq!(transcript(&app).await?.len(), 5);

    let response = app.client.delete(app.url("/chat")).send().await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let messages = transcript(&app).await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, GREETING);
    Ok(())
}

#[tokio::test]
async fn test_blank_chat_message_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::always("SELECT 1")).await?;

    let response = app
        .client
        .post(app.url("/chat"))
        .json(&json!({ "message": "" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(transcript(&app).await?.len(), 1);
    Ok(())
}

async fn session_transcript(app: &TestApp, session: &str) -> anyhow::Result<Vec<ChatMessage>> {
    Ok(app
        .client
        .get(app.url("/chat"))
        .header(SESSION_HEADER, session)
        .send()
        .await?
        .json()
        .await?)
}

#[tokio::test]
async fn test_sessions_keep_separate_transcripts() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::always("SELECT 1")).await?;

    let response = app
        .client
        .post(app.url("/chat"))
        .header(SESSION_HEADER, "alice")
        .json(&json!({ "message": "stores" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(session_transcript(&app, "alice").await?.len(), 3);
    assert_eq!(session_transcript(&app, "bob").await?.len(), 1);
    assert_eq!(transcript(&app).await?.len(), 1);

    let response = app
        .client
        .delete(app.url("/chat"))
        .header(SESSION_HEADER, "bob")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(session_transcript(&app, "alice").await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_malformed_session_id_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::spawn(MockAiProvider::always("SELECT 1")).await?;

    let response = app
        .client
        .post(app.url("/chat"))
        .header(SESSION_HEADER, "not a valid id!")
        .json(&json!({ "message": "stores" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.mock.get_calls().is_empty());
    Ok(())
}
