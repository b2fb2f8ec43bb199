//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advise` - Spending audit and chat over an expenses file
//! - `categorize` - Single-transaction categorization and the category listing
//! - `serve` - Web server command

pub mod advise;
pub mod categorize;
pub mod serve;

// Re-export command functions for main.rs
pub use advise::*;
pub use categorize::*;
pub use serve::*;

use std::path::Path;

use anyhow::{Context, Result};
use penny_core::ServiceConfig;

/// Resolve configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(p) => ServiceConfig::load(Some(p))
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => ServiceConfig::load(None).context("Failed to load config"),
    }
}
