//! # Prompt Assembly
//!
//! Turns a question, the schema catalog and the example bank into the single
//! prompt string sent to the model. Assembly is a pure function of its inputs.

use super::core::{render_example, render_preamble, render_question, BLOCK_SEPARATOR};
use crate::{catalog::SchemaCatalog, constants::DEFAULT_RESULT_LIMIT, example_bank::Example};

/// Everything needed to render the prompt for one user turn.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub question: &'a str,
    pub result_limit: u32,
    pub catalog: &'a SchemaCatalog,
    pub examples: &'a [Example],
}

impl<'a> PromptRequest<'a> {
    /// Creates a request using [`DEFAULT_RESULT_LIMIT`].
    pub fn new(question: &'a str, catalog: &'a SchemaCatalog, examples: &'a [Example]) -> Self {
        Self {
            question,
            result_limit: DEFAULT_RESULT_LIMIT,
            catalog,
            examples,
        }
    }

    pub fn with_result_limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit;
        self
    }

    pub fn render(&self) -> String {
        assemble(self.question, self.result_limit, self.catalog, self.examples)
    }
}

/// Renders the full prompt: preamble, each example, then the user's question,
/// separated by blank lines.
pub fn assemble(
    question: &str,
    result_limit: u32,
    catalog: &SchemaCatalog,
    examples: &[Example],
) -> String {
    let mut blocks = Vec::with_capacity(examples.len() + 2);
    blocks.push(render_preamble(result_limit, &catalog.render()));
    blocks.extend(
        examples
            .iter()
            .map(|example| render_example(&example.question, &example.sql)),
    );
    blocks.push(render_question(question));
    blocks.join(BLOCK_SEPARATOR)
}
