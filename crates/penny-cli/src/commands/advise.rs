//! Advice commands (audit and chat over an expenses file)

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use penny_core::{AIClient, Advisor, Expense, ServiceConfig};

/// Either a bare array or the request body shape used by the HTTP API
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpensesFile {
    List(Vec<Expense>),
    Wrapped { expenses: Vec<Expense> },
}

/// Read expenses from a JSON file
pub fn read_expenses(path: &Path) -> Result<Vec<Expense>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: ExpensesFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse expenses from {}", path.display()))?;
    Ok(match parsed {
        ExpensesFile::List(expenses) => expenses,
        ExpensesFile::Wrapped { expenses } => expenses,
    })
}

pub async fn cmd_advise(config: &ServiceConfig, file: &Path, question: Option<&str>) -> Result<()> {
    let expenses = read_expenses(file)?;
    let advisor = Advisor::new(AIClient::from_config(&config.ai));

    match question {
        Some(q) => {
            let reply = advisor.chat(q, &expenses).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        None => {
            let report = advisor.audit(&expenses).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
