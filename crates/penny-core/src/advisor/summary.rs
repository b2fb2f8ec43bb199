//! Deterministic spending summary
//!
//! Amounts are taken by absolute value so refunds exported as negatives do
//! not cancel out spending.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use super::types::Expense;

/// Purchases below this amount count as "small"
pub const SMALL_PURCHASE_LIMIT: f64 = 10.0;

/// Per-category totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: f64,
    pub count: usize,
    /// Fraction of overall spending (0.0 - 1.0)
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total: f64,
    pub expense_count: usize,
    /// Sorted by total, largest first
    pub categories: Vec<CategorySpend>,
    pub largest: Option<Expense>,
    pub small_purchase_count: usize,
    pub small_purchase_total: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

impl SpendingSummary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();
        let mut total = 0.0;
        let mut largest: Option<&Expense> = None;
        let mut small_purchase_count = 0;
        let mut small_purchase_total = 0.0;
        let mut first_date: Option<NaiveDate> = None;
        let mut last_date: Option<NaiveDate> = None;

        for expense in expenses {
            let amount = expense.amount.abs();
            total += amount;

            let entry = by_category.entry(expense.category.as_str()).or_insert((0.0, 0));
            entry.0 += amount;
            entry.1 += 1;

            if largest.map_or(true, |l| amount > l.amount.abs()) {
                largest = Some(expense);
            }

            if amount > 0.0 && amount < SMALL_PURCHASE_LIMIT {
                small_purchase_count += 1;
                small_purchase_total += amount;
            }

            if let Some(date) = expense.date.as_deref().and_then(parse_date) {
                first_date = Some(first_date.map_or(date, |d| d.min(date)));
                last_date = Some(last_date.map_or(date, |d| d.max(date)));
            }
        }

        let mut categories: Vec<CategorySpend> = by_category
            .into_iter()
            .map(|(category, (cat_total, count))| CategorySpend {
                category: category.to_string(),
                total: cat_total,
                count,
                share: if total > 0.0 { cat_total / total } else { 0.0 },
            })
            .collect();
        categories.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            total,
            expense_count: expenses.len(),
            categories,
            largest: largest.cloned(),
            small_purchase_count,
            small_purchase_total,
            first_date,
            last_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expense_count == 0
    }

    pub fn top_category(&self) -> Option<&CategorySpend> {
        self.categories.first()
    }

    /// Plain-text rendering for prompts and CLI output
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Total spent: {:.2} across {} expenses",
            self.total, self.expense_count
        );
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            let _ = writeln!(out, "Period: {} to {}", first, last);
        }
        if !self.categories.is_empty() {
            let _ = writeln!(out, "By category:");
            for cat in &self.categories {
                let _ = writeln!(
                    out,
                    "- {}: {:.2} ({} expenses, {:.0}%)",
                    cat.category,
                    cat.total,
                    cat.count,
                    cat.share * 100.0
                );
            }
        }
        if let Some(largest) = &self.largest {
            let _ = writeln!(
                out,
                "Largest expense: {} ({:.2})",
                largest.description,
                largest.amount.abs()
            );
        }
        let _ = write!(
            out,
            "Purchases under {:.2}: {} totaling {:.2}",
            SMALL_PURCHASE_LIMIT, self.small_purchase_count, self.small_purchase_total
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Expense> {
        vec![
            Expense::new("Rent", 1200.0, "Housing").with_date("2024-03-01"),
            Expense::new("Groceries", 150.0, "Food").with_date("2024-03-05T10:00:00Z"),
            Expense::new("Coffee", 4.5, "Food").with_date("2024-03-07"),
            Expense::new("Refund", -30.0, "Shopping"),
        ]
    }

    #[test]
    fn test_totals_and_ordering() {
        let summary = SpendingSummary::from_expenses(&sample());
        assert_eq!(summary.expense_count, 4);
        assert!((summary.total - 1384.5).abs() < 1e-9);

        let names: Vec<&str> = summary.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Housing", "Food", "Shopping"]);
        assert_eq!(summary.categories[1].count, 2);
        assert_eq!(summary.largest.as_ref().unwrap().description, "Rent");
        assert_eq!(summary.small_purchase_count, 1);
    }

    #[test]
    fn test_date_range_mixes_formats() {
        let summary = SpendingSummary::from_expenses(&sample());
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("2024-02-29T23:59:59+02:00").is_some());
        assert!(parse_date("last tuesday").is_none());
    }

    #[test]
    fn test_empty() {
        let summary = SpendingSummary::from_expenses(&[]);
        assert!(summary.is_empty());
        assert!(summary.top_category().is_none());
        assert_eq!(summary.total, 0.0);
        assert!(summary.render().starts_with("Total spent: 0.00"));
    }

    #[test]
    fn test_render_mentions_categories() {
        let rendered = SpendingSummary::from_expenses(&sample()).render();
        assert!(rendered.contains("- Housing: 1200.00 (1 expenses, 87%)"));
        assert!(rendered.contains("Period: 2024-03-01 to 2024-03-07"));
    }
}
