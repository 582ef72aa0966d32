//! Atelier command-line entry point.

mod cli;

use atelier::{AtelierConfig, init_tracing};
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Secrets usually live in a .env next to the binary.
    dotenvy::dotenv().ok();

    init_tracing("info").map_err(anyhow::Error::msg)?;

    let cli = Cli::parse();
    let config = AtelierConfig::load(cli.config.as_deref())?;
    debug!(config_file = ?cli.config, "Configuration loaded");

    match cli.command {
        Commands::Generate {
            prompt,
            output,
            group_members,
        } => cli::handle_generate_command(config, &prompt, &output, group_members).await,
        Commands::Check { prompt } => cli::handle_check_command(&config, &prompt).await,
        Commands::History { limit } => cli::handle_history_command(&config, limit),
    }
}
