//! # Interactive Loop
//!
//! Reads one question per line and prints the generated query. A failed turn
//! prints the error and keeps the loop running.

use anyhow::Result;
use pallas::PromptClient;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

const SEPARATOR_WIDTH: usize = 50;

fn is_exit_command(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit" | "q")
}

/// Runs the question/answer loop until an exit command or end of input.
pub async fn run<R, W>(client: &PromptClient, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let separator = "-".repeat(SEPARATOR_WIDTH);
    writeln!(out, "\nPallas SQL Bot is Ready! (Type 'exit' to quit)")?;
    writeln!(out, "{separator}")?;

    let mut lines = reader.lines();
    loop {
        write!(out, "\nAsk Pallas: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out, "\nGoodbye!")?;
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            writeln!(out, "Goodbye!")?;
            break;
        }

        writeln!(out, "Thinking...")?;
        match client.generate_sql(question).await {
            Ok(query) => {
                info!("Generated query for {question:?}");
                writeln!(out, "\n>> Generated MySQL Query:")?;
                writeln!(out, "{}", query.sql)?;
                writeln!(out, "{separator}")?;
            }
            Err(e) => {
                warn!("Failed to generate SQL for {question:?}: {e}");
                writeln!(out, "Error generating SQL: {e}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pallas::PromptClientBuilder;
    use pallas_test_utils::MockAiProvider;

    fn client(mock: &MockAiProvider) -> PromptClient {
        PromptClientBuilder::new()
            .ai_provider(Box::new(mock.clone()))
            .build()
            .unwrap()
    }

    async fn run_with_input(mock: &MockAiProvider, input: &str) -> String {
        let mut out = Vec::new();
        run(&client(mock), input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_answers_until_exit() {
        let mock = MockAiProvider::always("```sql\nSELECT * FROM FILIAAL;\n```");
        let output = run_with_input(&mock, "stores\n\nQUIT\nnever asked\n").await;

        assert!(output.contains(">> Generated MySQL Query:\nSELECT * FROM FILIAAL;\n"));
        assert!(output.ends_with("Goodbye!\n"));
        assert_eq!(mock.get_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_loop() {
        let mock = MockAiProvider::failing("network down");
        let output = run_with_input(&mock, "first\nsecond\n").await;

        assert_eq!(output.matches("Error generating SQL:").count(), 2);
        assert!(!output.contains(">> Generated MySQL Query:"));
        assert!(output.ends_with("\nGoodbye!\n"));
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("Q"));
        assert!(!is_exit_command("query"));
    }
}
