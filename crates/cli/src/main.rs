//! # pallas: A CLI for Pallas text-to-SQL
//!
//! This is the main entry point for the `pallas` command-line interface.

mod repl;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pallas::{
    config::{get_config, AppConfig},
    prompts::assemble,
    providers::factory::build_prompt_client,
    GenerateSqlOptions,
};
use std::fs::OpenOptions;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file (defaults to ./pallas.yml if present)
    #[arg(long, global = true, env = "PALLAS_CONFIG")]
    config: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask questions interactively (the default)
    Repl,
    /// Translate a single question into SQL
    Ask(QuestionArgs),
    /// Print the prompt that would be sent to the model, without sending it
    Prompt(QuestionArgs),
    /// Print the schema catalog as the model sees it
    Schema,
}

#[derive(Args, Debug)]
struct QuestionArgs {
    /// The question, in plain language
    #[arg(required = true, num_args = 1..)]
    question: Vec<String>,
    /// Row limit the model should apply unless the question says otherwise
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    limit: Option<u32>,
}

impl QuestionArgs {
    fn question(&self) -> String {
        self.question.join(" ")
    }
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = get_config(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Repl);

    // Only commands that talk to the model leave a log behind.
    if matches!(command, Commands::Repl | Commands::Ask(_)) {
        init_file_logging(&config)?;
        info!(?config, "Configuration loaded");
    }

    match command {
        Commands::Repl => handle_repl(&config).await,
        Commands::Ask(args) => handle_ask(&config, &args).await,
        Commands::Prompt(args) => handle_prompt(&config, &args),
        Commands::Schema => handle_schema(&config),
    }
}

/// Appends logs to the configured file so the interactive output stays readable.
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file '{}'", config.log_file))?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// --- Command Handlers ---

async fn handle_repl(config: &AppConfig) -> Result<()> {
    let client = build_prompt_client(config)?;
    if let Some(database_url) = &config.database_url {
        info!("Target database (not queried): {database_url}");
    }
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl::run(&client, stdin, &mut stdout).await
}

async fn handle_ask(config: &AppConfig, args: &QuestionArgs) -> Result<()> {
    let client = build_prompt_client(config)?;
    let options = GenerateSqlOptions {
        question: args.question(),
        result_limit: args.limit,
    };
    let query = client
        .generate_sql_with_options(options)
        .await
        .context("Error generating SQL")?;
    println!("{}", query.sql);
    Ok(())
}

fn handle_prompt(config: &AppConfig, args: &QuestionArgs) -> Result<()> {
    let loaded = config.load_catalog()?;
    let prompt = assemble(
        &args.question(),
        args.limit.unwrap_or(config.result_limit),
        &loaded.catalog,
        loaded.examples.all(),
    );
    println!("{prompt}");
    Ok(())
}

fn handle_schema(config: &AppConfig) -> Result<()> {
    let loaded = config.load_catalog()?;
    println!("{}", loaded.catalog.render());
    Ok(())
}
