//! Penny CLI - Transaction categorization and budgeting advice
//!
//! Usage:
//!   penny serve --port 8000            Start the web server
//!   penny categorize "Starbucks" 4.75  Categorize one transaction
//!   penny categories                   Show the keyword table and vocabulary
//!   penny advise --file expenses.json  Audit spending from a JSON file

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

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => commands::cmd_serve(config, host, port).await,
        Commands::Categorize { merchant, amount } => {
            commands::cmd_categorize(&config, &merchant, amount).await
        }
        Commands::Categories => commands::cmd_categories(&config),
        Commands::Advise { file, question } => {
            commands::cmd_advise(&config, &file, question.as_deref()).await
        }
    }
}
