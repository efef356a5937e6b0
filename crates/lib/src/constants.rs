//! # Shared Constants
//!
//! Defaults shared by the library and both front ends, kept in one place to
//! avoid "magic" values drifting between the CLI and the server.

/// Number of rows the model is told to limit results to when the caller
/// does not ask for something else.
pub const DEFAULT_RESULT_LIMIT: u32 = 5;

/// The model used when the configuration does not name one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Base URL of the Gemini `generateContent` API. The model name is appended.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fallback endpoint for an OpenAI-compatible local server.
pub const DEFAULT_LOCAL_AI_URL: &str = "http://localhost:1234/v1/chat/completions";

/// Upper bound, in seconds, for a single completion request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Stop sequence that keeps the model from inventing a result section after the query.
pub const COMPLETION_STOP_SEQUENCE: &str = "\nSQLResult:";

/// The default name of the optional YAML configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "pallas.yml";
