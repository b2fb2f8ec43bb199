//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Penny - Categorize transactions and get budgeting advice
#[derive(Parser)]
#[command(name = "penny")]
#[command(about = "Transaction categorization and budgeting-advice service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/penny/penny.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Categorize a single transaction and print the result as JSON
    Categorize {
        /// Merchant text as it appears on the statement
        merchant: String,

        /// Transaction amount
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Show the keyword table and the remote category vocabulary
    Categories,

    /// Audit spending from a JSON file of expenses
    ///
    /// The file holds either an array of expenses or an object with an
    /// `expenses` array. Each expense has `description`, `amount`, and
    /// optionally `category` and `date`.
    Advise {
        /// Expenses JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Ask a question about the expenses instead of auditing them
        #[arg(short, long)]
        question: Option<String>,
    },
}
