//! Reverie CLI - Personal AI diary
//!
//! Usage:
//!   reverie init                 Initialize database
//!   reverie serve --port 5000    Start web server
//!   reverie status               Show database and model status
//!   reverie analyze "text"       Run the analysis pipeline on one text

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve { port, host } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt).await
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt).await,
        Commands::Analyze { text } => commands::cmd_analyze(&text).await,
    }
}
