use crate::{
    catalog::{LoadedCatalog, SchemaCatalog},
    constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RESULT_LIMIT},
    errors::PromptError,
    example_bank::ExampleBank,
    providers::ai::AiProvider,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The text-to-SQL pipeline: prompt assembly, completion and sanitizing.
///
/// Every field is read-only after `build()`, so one client can serve any
/// number of concurrent requests through a shared reference.
pub struct PromptClient {
    pub(crate) ai_provider: Box<dyn AiProvider>,
    pub(crate) catalog: Arc<SchemaCatalog>,
    pub(crate) examples: Arc<ExampleBank>,
    pub(crate) result_limit: u32,
    pub(crate) timeout: Duration,
}

impl fmt::Debug for PromptClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptClient")
            .field("ai_provider", &self.ai_provider)
            .field("tables", &self.catalog.tables().len())
            .field("examples", &self.examples.len())
            .field("result_limit", &self.result_limit)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A builder for creating `PromptClient` instances.
///
/// Only the AI provider is required. Without a catalog the bundled Pallas
/// catalog and examples are used.
pub struct PromptClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    catalog: Option<SchemaCatalog>,
    examples: Option<ExampleBank>,
    result_limit: u32,
    timeout: Duration,
}

impl Default for PromptClientBuilder {
    fn default() -> Self {
        Self {
            ai_provider: None,
            catalog: None,
            examples: None,
            result_limit: DEFAULT_RESULT_LIMIT,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl PromptClientBuilder {
    /// Creates a new `PromptClientBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pallas::PromptClientBuilder;
    ///
    /// let builder = PromptClientBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider.
    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Sets the schema catalog.
    pub fn catalog(mut self, catalog: SchemaCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the few-shot examples.
    pub fn examples(mut self, examples: ExampleBank) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Sets the default row limit used when a request does not give one.
    pub fn result_limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit;
        self
    }

    /// Sets the upper bound for a single completion request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the `PromptClient`.
    ///
    /// Fails if no AI provider was set, or if an example queries a table the
    /// catalog does not describe.
    pub fn build(self) -> Result<PromptClient, PromptError> {
        let ai_provider = self.ai_provider.ok_or(PromptError::MissingAiProvider)?;

        let (catalog, examples) = match (self.catalog, self.examples) {
            (Some(catalog), examples) => (catalog, examples.unwrap_or_default()),
            (None, examples) => {
                let bundled = LoadedCatalog::bundled()?;
                (bundled.catalog, examples.unwrap_or(bundled.examples))
            }
        };
        examples.validate_against(&catalog)?;

        Ok(PromptClient {
            ai_provider,
            catalog: Arc::new(catalog),
            examples: Arc::new(examples),
            result_limit: self.result_limit,
            timeout: self.timeout,
        })
    }
}

/// Options for a single text-to-SQL request.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct GenerateSqlOptions {
    /// The user's question in natural language.
    pub question: String,
    /// Overrides the client's default row limit.
    #[serde(default)]
    pub result_limit: Option<u32>,
}

impl GenerateSqlOptions {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            result_limit: None,
        }
    }
}

/// A successfully generated query.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery {
    /// The sanitized SQL statement.
    pub sql: String,
    /// The model output before sanitizing.
    pub raw: String,
}
