mod chat;
mod cli;
mod config;
mod content;
mod errors;
mod llm_client;
mod models;
mod render;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::terminal::TerminalChat;
use crate::chat::widget::ChatWidget;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::content::completeness::compute_completeness_report;
use crate::content::ContentStore;
use crate::llm_client::{GeminiModel, LlmClient};
use crate::render::RenderOptions;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (.env is applied before the CLI reads anything)
    let config = Config::from_env()?;
    let cli = Cli::parse();

    // Structured logging on stderr; stdout carries page, prompt and chat output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting portfolio v{}", env!("CARGO_PKG_VERSION"));

    let content_path = cli.content.clone().or_else(|| config.content_path.clone());
    let store = ContentStore::load(content_path.as_deref()).map_err(|e| {
        error!(code = e.code(), "Failed to load portfolio content: {e}");
        e
    })?;

    match cli.command {
        Commands::Render { out, reveal_all } => {
            let options = RenderOptions { reveal_all };
            let path = render::write_site(&store, &out, &options)
                .with_context(|| format!("failed to write site to {}", out.display()))?;
            println!("{}", path.display());
        }
        Commands::Chat { export } => run_chat(&config, &store, export).await?,
        Commands::Prompt => {
            // Printed from the client so the output is exactly what each request carries.
            let llm = build_client(&config, &store)?;
            println!("{}", llm.system_instruction());
        }
        Commands::Check => {
            let report = compute_completeness_report(&store);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn build_client(config: &Config, store: &ContentStore) -> Result<LlmClient> {
    let model = GeminiModel::new(config).context("failed to build the Gemini HTTP client")?;
    Ok(LlmClient::new(Arc::new(model), store))
}

async fn run_chat(config: &Config, store: &ContentStore, export: Option<PathBuf>) -> Result<()> {
    if config.gemini_api_key.is_none() {
        info!("No GEMINI_API_KEY set; replies will fall back to the offline message");
    }
    let llm = build_client(config, store)?;
    info!("Chat session using {}", llm.model_name());

    let styled = std::io::stdout().is_terminal();
    let widget = ChatWidget::new(&store.assistant);
    let mut session = TerminalChat::new(llm, widget, tokio::io::stdout(), styled);
    session.run(BufReader::new(tokio::io::stdin())).await?;

    if let Some(path) = export {
        export_transcript(session.widget(), &path)?;
    }
    Ok(())
}

fn export_transcript(widget: &ChatWidget, path: &Path) -> Result<()> {
    let html = chat::transcript_html(widget.transcript());
    std::fs::write(path, html)
        .with_context(|| format!("failed to export transcript to {}", path.display()))?;
    info!("Transcript exported to {}", path.display());
    Ok(())
}
