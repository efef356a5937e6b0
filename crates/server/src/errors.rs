use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pallas::PromptError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The request itself is unusable, e.g. a blank question.
    BadRequest(String),
    /// Errors originating from the `pallas` pipeline.
    Prompt(PromptError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `PromptError` to `AppError`.
impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => {
                warn!("Rejected request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Prompt(err) => {
                error!("PromptError: {:?}", err);
                match &err {
                    PromptError::EmptyResponse { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        err.to_string(),
                    ),
                    PromptError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, err.to_string()),
                    e if e.is_completion_failure() => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
