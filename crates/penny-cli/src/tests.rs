//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use clap::Parser;
use penny_core::{BackendKind, KeywordTable, ServiceConfig};

use crate::cli::{Cli, Commands};
use crate::commands;

fn mock_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.ai.backend = BackendKind::Mock;
    config
}

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_categorize() {
    let cli = Cli::try_parse_from(["penny", "categorize", "Starbucks", "4.75"]).unwrap();
    match cli.command {
        Commands::Categorize { merchant, amount } => {
            assert_eq!(merchant, "Starbucks");
            assert_eq!(amount, 4.75);
        }
        _ => panic!("expected categorize"),
    }
    assert!(!cli.verbose);
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_negative_amount() {
    let cli = Cli::try_parse_from(["penny", "categorize", "Refund", "-12.50"]).unwrap();
    assert!(matches!(cli.command, Commands::Categorize { amount, .. } if amount == -12.5));
}

#[test]
fn test_parse_serve_overrides_and_globals() {
    let cli = Cli::try_parse_from([
        "penny",
        "serve",
        "--port",
        "9000",
        "--verbose",
        "--config",
        "penny.toml",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_str(), Some("penny.toml"));
    match cli.command {
        Commands::Serve { host, port } => {
            assert_eq!(host, None);
            assert_eq!(port, Some(9000));
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_parse_advise_requires_file() {
    assert!(Cli::try_parse_from(["penny", "advise"]).is_err());
    let cli = Cli::try_parse_from(["penny", "advise", "-f", "x.json", "-q", "Why?"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Advise { question: Some(ref q), .. } if q == "Why?"
    ));
}

// ========== Config Tests ==========

#[test]
fn test_load_config_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = commands::load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_load_config_from_file() {
    let file = write_temp("[server]\nport = 9100\n");
    let config = commands::load_config(Some(file.path())).unwrap();
    // PENNY_PORT may override the file in the test environment
    if std::env::var("PENNY_PORT").is_err() {
        assert_eq!(config.server.port, 9100);
    }
}

// ========== Categorize Command Tests ==========

#[tokio::test]
async fn test_cmd_categorize() {
    let result = commands::cmd_categorize(&mock_config(), "Starbucks", 4.75).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_categorize_unknown_merchant() {
    let result = commands::cmd_categorize(&mock_config(), "Zzyzx Holdings", 10.0).await;
    assert!(result.is_ok());
}

#[test]
fn test_cmd_categories() {
    assert!(commands::cmd_categories(&ServiceConfig::default()).is_ok());
}

#[test]
fn test_format_categories_lists_in_priority_order() {
    let out = commands::format_categories(&KeywordTable::builtin());
    let food = out.find("Food").unwrap();
    let transportation = out.find("Transportation").unwrap();
    assert!(food < transportation);
    assert!(out.contains("starbucks"));
    assert!(out.starts_with("Keyword table"));
}

// ========== Advise Command Tests ==========

#[test]
fn test_read_expenses_array_and_wrapped() {
    let array = write_temp(r#"[{"description": "Coffee", "amount": 4.5}]"#);
    let expenses = commands::read_expenses(array.path()).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Uncategorized");

    let wrapped = write_temp(
        r#"{"expenses": [{"description": "Rent", "amount": 900, "category": "Housing", "date": "2024-01-01"}]}"#,
    );
    let expenses = commands::read_expenses(wrapped.path()).unwrap();
    assert_eq!(expenses[0].category, "Housing");
    assert_eq!(expenses[0].date.as_deref(), Some("2024-01-01"));
}

#[test]
fn test_read_expenses_invalid() {
    let file = write_temp("not json");
    assert!(commands::read_expenses(file.path()).is_err());
}

#[tokio::test]
async fn test_cmd_advise_audit_and_chat() {
    let file = write_temp(r#"[{"description": "Dinner", "amount": 80, "category": "Food"}]"#);
    let config = mock_config();

    assert!(commands::cmd_advise(&config, file.path(), None).await.is_ok());
    assert!(commands::cmd_advise(&config, file.path(), Some("How do I save?"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_cmd_advise_blank_question_is_error() {
    let file = write_temp("[]");
    let result = commands::cmd_advise(&ServiceConfig::default(), file.path(), Some(" ")).await;
    assert!(result.is_err());
}
