//! # Natural Language to MySQL
//!
//! This crate turns a question about the Pallas retail schema into a MySQL
//! query. It assembles a few-shot prompt from a static schema catalog and an
//! example bank, sends it to a configurable AI provider, and cleans the
//! model's answer into a bare SQL statement. Queries are never executed.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod errors;
pub mod example_bank;
pub mod prompts;
pub mod providers;
pub mod sanitize;
pub mod types;

pub use catalog::{LoadedCatalog, SchemaCatalog};
pub use errors::{CatalogError, PromptError};
pub use example_bank::{Example, ExampleBank};
pub use types::{GenerateSqlOptions, GeneratedQuery, PromptClient, PromptClientBuilder};

use prompts::assemble;
use sanitize::{looks_like_query, sanitize};
use tracing::{debug, error, info, warn};

impl PromptClient {
    /// Converts a question into a SQL query using the default row limit.
    ///
    /// This is a convenience wrapper around `generate_sql_with_options`.
    pub async fn generate_sql(&self, question: &str) -> Result<GeneratedQuery, PromptError> {
        self.generate_sql_with_options(GenerateSqlOptions::new(question))
            .await
    }

    /// Converts a question into a SQL query.
    ///
    /// The completion call is the only fallible step at runtime. It is bounded
    /// by the client's timeout and never retried here. A response that
    /// sanitizes to nothing, or to something that is not a read statement, is
    /// reported as `PromptError::EmptyResponse` rather than returned as SQL.
    pub async fn generate_sql_with_options(
        &self,
        options: GenerateSqlOptions,
    ) -> Result<GeneratedQuery, PromptError> {
        info!("[generate_sql] received question: {:?}", options.question);
        let prompt = self.prompt_for(&options.question, options.result_limit);

        debug!(prompt = %prompt, "--> Sending prompt to AI Provider");

        let completion = tokio::time::timeout(self.timeout, self.ai_provider.generate(&prompt));
        let raw = match completion.await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                error!("[generate_sql] Completion failed: {e}");
                return Err(e);
            }
            Err(_) => {
                error!("[generate_sql] Completion timed out after {:?}", self.timeout);
                return Err(PromptError::Timeout(self.timeout));
            }
        };

        debug!("<-- Completion from AI: {}", &raw);

        let sql = sanitize(&raw);
        if sql.is_empty() || !looks_like_query(&sql) {
            warn!("[generate_sql] Completion contained no SQL statement.");
            return Err(PromptError::EmptyResponse { raw });
        }

        Ok(GeneratedQuery { sql, raw })
    }

    /// Renders the prompt that would be sent for `question`, without calling
    /// the AI provider.
    pub fn prompt_for(&self, question: &str, result_limit: Option<u32>) -> String {
        assemble(
            question,
            result_limit.unwrap_or(self.result_limit),
            &self.catalog,
            self.examples.all(),
        )
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn examples(&self) -> &ExampleBank {
        &self.examples
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }
}
