// src/main.rs
// chatgate - Conversation-managing chat proxy in front of the Gemini API

mod cli;

use anyhow::Result;
use chatgate::config::EnvConfig;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".chatgate/.env"));
    }
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = match &cli.command {
        Some(Commands::Serve { .. }) | None => Level::INFO,
        Some(Commands::Chat { .. }) => Level::WARN, // Keep the terminal readable
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = EnvConfig::load();
    let validation = config.validate();
    if !validation.is_valid() || !validation.warnings.is_empty() {
        warn!("{}", validation.report());
    }

    match cli.command {
        None => cli::run_server(config, "0.0.0.0".into(), 3000).await?,
        Some(Commands::Serve { host, port }) => cli::run_server(config, host, port).await?,
        Some(Commands::Chat { signed_in }) => cli::run_chat(config, signed_in).await?,
    }

    Ok(())
}
