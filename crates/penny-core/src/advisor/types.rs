//! Wire types for the budgeting advisor

use std::fmt;

use serde::{Deserialize, Serialize};

fn default_category() -> String {
    "Uncategorized".to_string()
}

/// An expense as sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Expense {
    pub fn new(description: &str, amount: f64, category: &str) -> Self {
        Self {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }
}

/// Kind of budgeting insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Spending that looks too high
    Warning,
    /// A habit worth changing
    Tip,
    /// Something the user is doing well
    Kudos,
    /// A concrete way to save money
    Saving,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Tip => "tip",
            InsightKind::Kudos => "kudos",
            InsightKind::Saving => "saving",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single budgeting insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub potential_savings: f64,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            potential_savings: 0.0,
        }
    }

    pub fn with_savings(mut self, amount: f64) -> Self {
        self.potential_savings = amount;
        self
    }
}

/// Response body of an audit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub insights: Vec<Insight>,
}

/// Response body of a chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_defaults() {
        let expense: Expense =
            serde_json::from_str(r#"{"description": "Lunch", "amount": 12.5}"#).unwrap();
        assert_eq!(expense.category, "Uncategorized");
        assert_eq!(expense.date, None);
    }

    #[test]
    fn test_insight_wire_format() {
        let insight = Insight::new(InsightKind::Saving, "Cut coffee", "Brew at home.")
            .with_savings(20.0);
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "saving");
        assert_eq!(json["potential_savings"], 20.0);
        assert!(json.get("kind").is_none());
    }
}
