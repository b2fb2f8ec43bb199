//! Integration tests for penny-core
//!
//! These tests exercise configuration -> categorizer/advisor workflows through
//! the public API.

use std::io::Write;

use penny_core::{
    AIClient, Advisor, BackendKind, Categorizer, Expense, InsightKind, MockBackend,
    ServiceConfig, Transaction, DEFAULT_CATEGORY,
};

fn statement() -> Vec<Transaction> {
    [
        ("STARBUCKS STORE #1234", 5.75),
        ("UBER *TRIP HELP.UBER.COM", 23.10),
        ("NETFLIX.COM", 15.49),
        ("Acme Quantum Widgets LLC", 250.00),
        ("Shell Oil 5742", 48.00),
    ]
    .into_iter()
    .map(|(merchant, amount)| Transaction {
        merchant: merchant.to_string(),
        amount,
    })
    .collect()
}

// =============================================================================
// Categorizer
// =============================================================================

#[tokio::test]
async fn test_statement_without_backend() {
    let categorizer = Categorizer::new(None);
    let results = categorizer.categorize_batch(&statement()).await;

    let labels: Vec<&str> = results.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Food", "Transportation", "Entertainment", DEFAULT_CATEGORY, "Transportation"]
    );
    assert_eq!(results[3].confidence, 0.0);
    assert!(results
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 3)
        .all(|(_, r)| r.confidence == 1.0));
}

#[tokio::test]
async fn test_statement_with_mock_backend() {
    let mock = MockBackend::new();
    let categorizer = Categorizer::new(Some(AIClient::Mock(mock.clone())));
    let results = categorizer.categorize_batch(&statement()).await;

    // Only the unknown merchant reaches the model
    assert_eq!(mock.call_count(), 1);
    assert_eq!(results[3].category, "Shopping");
    assert_eq!(results[3].confidence, 0.7);
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn test_config_file_drives_categorizer() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[ai]
backend = "mock"

[categorizer]
strict_labels = true
"#
    )
    .unwrap();

    let mut config = ServiceConfig::from_toml_str(&std::fs::read_to_string(file.path()).unwrap())
        .unwrap();
    assert_eq!(config.ai.backend, BackendKind::Mock);
    // Environment overrides are applied on top of the file
    config.apply_env_from(|_| None);

    let ai = AIClient::from_config(&config.ai);
    assert!(ai.is_some());
    let categorizer = Categorizer::from_config(&config.categorizer, ai);
    assert!(categorizer.is_strict());

    let result = categorizer.categorize("Acme Quantum Widgets LLC", 1.0).await;
    assert_eq!(result.category, "Shopping");
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(ServiceConfig::load(Some(&missing)).is_err());
}

// =============================================================================
// Advisor
// =============================================================================

#[tokio::test]
async fn test_audit_and_chat_offline() {
    let expenses = vec![
        Expense::new("Dinner out", 300.0, "Food").with_date("2024-05-02"),
        Expense::new("Groceries", 200.0, "Food").with_date("2024-05-09"),
        Expense::new("Train", 60.0, "Transportation").with_date("2024-05-10"),
    ];
    let advisor = Advisor::new(None);

    let report = advisor.audit(&expenses).await;
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].kind, InsightKind::Warning);
    assert_eq!(report.insights[0].potential_savings, 75.0);

    let reply = advisor.chat("Where does my money go?", &expenses).await.unwrap();
    assert!(reply.response.contains("Food"));
}
