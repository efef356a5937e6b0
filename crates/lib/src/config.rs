//! # Application Configuration
//!
//! Configuration shared by the CLI and the server. Values are layered:
//!
//! 1. Built-in defaults.
//! 2. An optional YAML file (`pallas.yml` in the working directory, or an
//!    explicit path). `${VAR}` references in the file are replaced with
//!    environment variables before parsing.
//! 3. `PALLAS_*` environment variables, with `__` separating nested keys
//!    (e.g. `PALLAS_AI__MODEL`, `PALLAS_RESULT_LIMIT`).
//!
//! `GEMINI_API_KEY` or `AI_API_KEY` fill in the API key if no layer set one.

use crate::{
    catalog::LoadedCatalog,
    constants::{
        DEFAULT_CONFIG_FILE, DEFAULT_GEMINI_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
        DEFAULT_RESULT_LIMIT,
    },
    errors::CatalogError,
};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    #[error("Configuration error: {0}")]
    General(String),
    /// Indicates a required configuration file was not found.
    #[error("{0}")]
    NotFound(String),
    /// A value was parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// Settings for the completion provider.
#[derive(Deserialize, Clone)]
pub struct AiConfig {
    /// The type of provider: `gemini` or `local`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// The API URL. Optional for Gemini, where it is derived from the model.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API credential. Required for Gemini, optional for local servers.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: None,
            api_key: None,
            model: default_model(),
        }
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

/// The root configuration structure.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
    /// Row limit the model is told to apply when the user does not give one.
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Upper bound for a single completion request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// A YAML catalog replacing the bundled Pallas schema and examples.
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Connection descriptor of the target database. Queries are never
    /// executed; the value is only reported to the user.
    #[serde(default)]
    pub database_url: Option<String>,
    /// The port for the server to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Where the CLI writes its logs.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_result_limit() -> u32 {
    DEFAULT_RESULT_LIMIT
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_port() -> u16 {
    9090
}

fn default_log_file() -> String {
    "pallas-cli.log".to_string()
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loads the configured catalog, or the bundled one when no path is set.
    pub fn load_catalog(&self) -> Result<LoadedCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => LoadedCatalog::from_path(path),
            None => LoadedCatalog::bundled(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.result_limit == 0 {
            return Err(ConfigError::Invalid(
                "result_limit must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        match self.ai.provider.as_str() {
            "gemini" | "local" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "unsupported AI provider '{other}', expected 'gemini' or 'local'"
            ))),
        }
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// An explicit `config_path_override` must exist; the default `pallas.yml`
/// is optional.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => read_and_substitute(DEFAULT_CONFIG_FILE)?,
    };
    if let Some(content) = file_content {
        info!(
            "Loading configuration from '{}'.",
            config_path_override.unwrap_or(DEFAULT_CONFIG_FILE)
        );
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("PALLAS")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if config.ai.api_key.as_deref().is_none_or(str::is_empty) {
        config.ai.api_key = ["GEMINI_API_KEY", "AI_API_KEY"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|key| !key.is_empty());
    }

    config.validate()?;
    Ok(config)
}
