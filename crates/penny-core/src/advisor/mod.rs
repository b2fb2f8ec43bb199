//! Budgeting advisor
//!
//! Produces spending insights and answers questions about a list of expenses.
//! The remote model is asked first; when it is unavailable or answers with
//! something unusable, a local rule set over [`SpendingSummary`] takes over,
//! so both operations always produce an answer.

mod summary;
mod types;

pub use summary::{parse_date, CategorySpend, SpendingSummary, SMALL_PURCHASE_LIMIT};
pub use types::{AuditReport, ChatReply, Expense, Insight, InsightKind};

use std::collections::HashMap;
use std::fmt::Write;

use tracing::{debug, warn};

use crate::ai::parsing::parse_insights;
use crate::ai::{AIBackend, AIClient, CompletionOptions};
use crate::error::{Error, Result};
use crate::prompts::{Prompt, PromptId};

/// Maximum insights returned by an audit
pub const MAX_INSIGHTS: usize = 3;

/// Maximum expenses considered for a chat turn
pub const MAX_CHAT_CONTEXT: usize = 100;

/// Category share above which spending counts as dominant
pub const DOMINANT_SHARE: f64 = 0.4;

/// Fraction of a dominant category suggested as savings
pub const DOMINANT_SAVINGS_RATE: f64 = 0.15;

/// Number of small purchases that triggers a saving insight
pub const SMALL_PURCHASE_MIN_COUNT: usize = 5;

/// Fraction of small purchases suggested as savings
pub const SMALL_PURCHASE_SAVINGS_RATE: f64 = 0.5;

const CHAT_TEMPERATURE: f32 = 0.7;
const AUDIT_TEMPERATURE: f32 = 0.3;
const AUDIT_MAX_TOKENS: u32 = 600;

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone, Default)]
pub struct Advisor {
    ai: Option<AIClient>,
}

impl Advisor {
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Review spending and return at most [`MAX_INSIGHTS`] insights
    pub async fn audit(&self, expenses: &[Expense]) -> AuditReport {
        if expenses.is_empty() {
            return AuditReport::default();
        }

        let summary = SpendingSummary::from_expenses(expenses);

        let insights = match self.audit_remote(&summary).await {
            Ok(insights) if !insights.is_empty() => {
                debug!("AI produced {} insights", insights.len());
                insights
            }
            Ok(_) => {
                debug!("AI produced no insights, using local rules");
                local_insights(&summary)
            }
            Err(Error::BackendUnavailable) => local_insights(&summary),
            Err(e) => {
                warn!("AI audit failed, using local rules: {}", e);
                local_insights(&summary)
            }
        };

        AuditReport {
            insights: insights
                .into_iter()
                .take(MAX_INSIGHTS)
                .map(|mut insight| {
                    insight.potential_savings = round_cents(insight.potential_savings.max(0.0));
                    insight
                })
                .collect(),
        }
    }

    /// Answer a question about the given expenses
    ///
    /// Only the first [`MAX_CHAT_CONTEXT`] expenses are considered. Fails only
    /// for a blank message.
    pub async fn chat(&self, message: &str, context: &[Expense]) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidData("message must not be empty".into()));
        }

        let context = &context[..context.len().min(MAX_CHAT_CONTEXT)];
        let summary = SpendingSummary::from_expenses(context);

        let response = match self.chat_remote(message, context, &summary).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("AI returned an empty chat reply");
                local_reply(&summary)
            }
            Err(Error::BackendUnavailable) => local_reply(&summary),
            Err(e) => {
                warn!("AI chat failed: {}", e);
                local_reply(&summary)
            }
        };

        Ok(ChatReply { response })
    }

    async fn audit_remote(&self, summary: &SpendingSummary) -> Result<Vec<Insight>> {
        let ai = self.ai.as_ref().ok_or(Error::BackendUnavailable)?;

        let prompt = Prompt::get(PromptId::AuditSpending);
        let rendered = summary.render();
        let max = MAX_INSIGHTS.to_string();
        let mut vars = HashMap::new();
        vars.insert("summary", rendered.as_str());
        vars.insert("max_insights", max.as_str());

        let options = CompletionOptions::default()
            .with_system(prompt.system)
            .with_temperature(AUDIT_TEMPERATURE)
            .with_max_tokens(AUDIT_MAX_TOKENS);
        let response = ai.complete(&prompt.render_user(&vars), &options).await?;

        parse_insights(&response)
    }

    async fn chat_remote(
        &self,
        message: &str,
        context: &[Expense],
        summary: &SpendingSummary,
    ) -> Result<String> {
        let ai = self.ai.as_ref().ok_or(Error::BackendUnavailable)?;

        let prompt = Prompt::get(PromptId::ChatAdvisor);
        let rendered = summary.render();
        let expenses = render_expenses(context);
        let mut vars = HashMap::new();
        vars.insert("summary", rendered.as_str());
        vars.insert("expenses", expenses.as_str());
        vars.insert("message", message);

        let options = CompletionOptions::default()
            .with_system(prompt.system)
            .with_temperature(CHAT_TEMPERATURE);
        ai.complete(&prompt.render_user(&vars), &options).await
    }
}

fn render_expenses(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "(none)".to_string();
    }
    let mut out = String::new();
    for expense in expenses {
        let _ = write!(out, "- ");
        if let Some(date) = &expense.date {
            let _ = write!(out, "{} ", date);
        }
        let _ = writeln!(
            out,
            "{}: {:.2} ({})",
            expense.description, expense.amount, expense.category
        );
    }
    out.trim_end().to_string()
}

/// Rule-based insights used when the remote model is unavailable
pub fn local_insights(summary: &SpendingSummary) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(top) = summary
        .top_category()
        .filter(|top| top.share > DOMINANT_SHARE)
    {
        insights.push(
            Insight::new(
                InsightKind::Warning,
                format!("{} dominates your spending", top.category),
                format!(
                    "{} makes up {:.0}% of your spending ({:.2}). Trimming it by 15% would free up money for other goals.",
                    top.category,
                    top.share * 100.0,
                    top.total
                ),
            )
            .with_savings(round_cents(top.total * DOMINANT_SAVINGS_RATE)),
        );
    }

    if summary.small_purchase_count >= SMALL_PURCHASE_MIN_COUNT {
        insights.push(
            Insight::new(
                InsightKind::Saving,
                "Small purchases add up",
                format!(
                    "You made {} purchases under {:.2}, totaling {:.2}. Cutting half of them would save real money.",
                    summary.small_purchase_count,
                    SMALL_PURCHASE_LIMIT,
                    summary.small_purchase_total
                ),
            )
            .with_savings(round_cents(
                summary.small_purchase_total * SMALL_PURCHASE_SAVINGS_RATE,
            )),
        );
    }

    if insights.is_empty() {
        insights.push(Insight::new(
            InsightKind::Kudos,
            "Balanced spending",
            format!(
                "No single category dominates your {:.2} of spending. Keep it up!",
                summary.total
            ),
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Deterministic chat answer used when the remote model is unavailable
pub fn local_reply(summary: &SpendingSummary) -> String {
    match summary.top_category() {
        None => "I don't see any expenses yet. Add a few and ask again.".to_string(),
        Some(top) => format!(
            "You spent {:.2} across {} expenses. Your top category is {} at {:.2} ({:.0}% of spending).",
            summary.total,
            summary.expense_count,
            top.category,
            top.total,
            top.share * 100.0
        ),
    }
}
