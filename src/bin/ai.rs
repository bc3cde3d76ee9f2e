//! CLI binary for one-shot LLM questions.
//!
//! Reads the prompt from piped stdin or from the trailing arguments, shows
//! it in a box, and renders the model's Markdown reply in another.

use anyhow::{Context, Result};
use clap::Parser;
use notion_md::config::DEFAULT_CHAT_MODEL;
use notion_md::terminal::{bold, panel, red, render_markdown, yellow};
use notion_md::prompts::choose_prompt;
use notion_md::{ask, check_chat_credentials, ChatConfig};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "ai <your question>  OR  echo 'question' | ai";

/// Ask an LLM a question from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "ai",
    version,
    about = "Ask an LLM a question from the terminal",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// The question. Ignored when a prompt is piped on stdin.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,

    /// Model ID.
    #[arg(long, env = "AI_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    model: String,

    /// LLM provider name.
    #[arg(long, env = "AI_PROVIDER", default_value = "openai")]
    provider: String,

    /// Send the prompt as-is, without asking for a brief answer.
    #[arg(long)]
    no_brief: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "AI_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let color = io::stdout().is_terminal();

    let prompt = read_prompt(&cli)?;
    if prompt.is_empty() {
        let label = if color { bold(&yellow("Usage:")) } else { "Usage:".to_string() };
        println!("{label} {USAGE}");
        return Ok(());
    }

    check_chat_credentials(&cli.provider).context("Missing credentials")?;

    let config = ChatConfig::builder()
        .model(&cli.model)
        .provider_name(&cli.provider)
        .brief(!cli.no_brief)
        .build()
        .context("Invalid configuration")?;

    println!("{}", panel("You", &prompt, color));
    let assistant_title = format!("Assistant ({})", config.model);

    match ask(&prompt, &config).await {
        Ok(reply) => {
            let body = render_markdown(&reply.content, color);
            println!("{}", panel(&assistant_title, &body, color));
            Ok(())
        }
        Err(e) => {
            let msg = format!("Error: {e}");
            let body = if color { red(&msg) } else { msg };
            println!("{}", panel(&assistant_title, &body, color));
            std::process::exit(1);
        }
    }
}

/// Piped stdin wins over arguments; an empty pipe falls back to them.
fn read_prompt(cli: &Cli) -> Result<String> {
    let stdin = io::stdin();
    let piped = if stdin.is_terminal() {
        None
    } else {
        let mut buf = String::new();
        stdin
            .lock()
            .read_to_string(&mut buf)
            .context("Failed to read prompt from stdin")?;
        Some(buf)
    };
    Ok(choose_prompt(piped.as_deref(), &cli.words))
}
