use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating the schema catalog and example bank.
///
/// These are configuration errors: they are detected once, when the pipeline
/// is built, and must stop it from starting.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog contains no tables")]
    EmptyCatalog,
    #[error("{context} is missing required field `{field}`")]
    MissingField { context: String, field: &'static str },
    #[error("Table `{0}` is described more than once")]
    DuplicateTable(String),
    #[error("Example #{example} references table `{table}`, which is not in the schema catalog")]
    UnknownTable { example: usize, table: String },
    #[error("Malformed catalog document: {0}")]
    Malformed(#[from] serde_yaml::Error),
    #[error("Failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Invalid schema configuration: {0}")]
    Catalog(#[from] CatalogError),
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("API key is missing for the {0} provider")]
    MissingApiKey(String),
    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider rejected the credentials: {0}")]
    AiAuth(String),
    #[error("AI provider quota or rate limit exceeded: {0}")]
    AiRateLimited(String),
    #[error("AI provider returned no completion text")]
    EmptyCompletion,
    #[error("AI provider did not answer within {0:?}")]
    Timeout(Duration),
    #[error("The model response did not contain a SQL statement")]
    EmptyResponse { raw: String },
}

impl PromptError {
    /// Returns `true` when the error originated at the completion boundary
    /// (network, credentials, quota, timeout or a malformed provider response).
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            PromptError::AiRequest(_)
                | PromptError::AiDeserialization(_)
                | PromptError::AiApi(_)
                | PromptError::AiAuth(_)
                | PromptError::AiRateLimited(_)
                | PromptError::EmptyCompletion
                | PromptError::Timeout(_)
        )
    }
}
