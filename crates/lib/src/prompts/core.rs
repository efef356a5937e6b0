//! # Default Prompt Templates
//!
//! The fixed text that frames every query-generation prompt.

/// The instruction preamble for query generation.
///
/// This prompt sets the persona and rules for the model and embeds the schema.
///
/// Placeholders: `{result_limit}`, `{schema}`
pub const QUERY_PREAMBLE: &str = r#"You are a MySQL expert for the 'Pallas' retail system.
Your goal is to generate valid MySQL queries based on the user's question.

CRITICAL RULES:
1. Return ONLY the SQL code. Do not wrap it in markdown (no ```sql).
2. Use the Schema Map provided to understand column names (e.g., OMSCH is Name, KLANTENBIJDRAGE is Revenue).
3. Always JOIN tables correctly using the IDs provided in the schema descriptions.
4. Unless the user specifies otherwise, limit the results to {result_limit}.

Here is the database schema you must use:
{schema}

Below are some examples of how to solve questions:"#;

/// Separator placed between the preamble, each example and the final question.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Renders one few-shot example block.
pub fn render_example(question: &str, sql: &str) -> String {
    format!("User Input: {question}\nSQL Query: {sql}")
}

/// Renders the trailing block the model is asked to complete.
pub fn render_question(question: &str) -> String {
    format!("User Input: {question}\nSQL Query:")
}

/// Substitutes the placeholders of [`QUERY_PREAMBLE`].
///
/// The limit is substituted first so that schema text is never rescanned.
pub fn render_preamble(result_limit: u32, schema: &str) -> String {
    QUERY_PREAMBLE
        .replace("{result_limit}", &result_limit.to_string())
        .replace("{schema}", schema)
}
