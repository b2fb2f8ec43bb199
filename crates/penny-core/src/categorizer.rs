//! Two-tier transaction categorizer
//!
//! Priority: keyword table -> remote model -> "Miscellaneous".
//!
//! The keyword tier is offline and deterministic: the first category (in table
//! order) with a token contained in the lower-cased merchant text wins, with
//! confidence 1.0. Only merchants the table does not recognize reach the
//! remote model. Every remote failure resolves to the default result, so
//! [`Categorizer::categorize`] never fails.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::parsing::parse_category_label;
use crate::ai::{AIBackend, AIClient, CompletionOptions};
use crate::categories::{KeywordTable, DEFAULT_CATEGORY, REMOTE_CATEGORIES};
use crate::config::CategorizerConfig;
use crate::error::{Error, Result};
use crate::prompts::{Prompt, PromptId};

/// Confidence reported for keyword matches
pub const KEYWORD_CONFIDENCE: f64 = 1.0;

/// Confidence reported for remote model answers
pub const REMOTE_CONFIDENCE: f64 = 0.7;

/// Confidence reported when the default category was applied
pub const FALLBACK_CONFIDENCE: f64 = 0.0;

/// A transaction to categorize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub merchant: String,
    #[serde(default)]
    pub amount: f64,
}

/// Category label with an advisory confidence in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizationResult {
    pub category: String,
    pub confidence: f64,
}

impl CategorizationResult {
    /// The result used when the remote tier fails
    pub fn fallback() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

/// Categorizer with an optional remote model behind the keyword table
///
/// Cheap to clone; the keyword table is shared.
#[derive(Clone)]
pub struct Categorizer {
    table: Arc<KeywordTable>,
    ai: Option<AIClient>,
    strict_labels: bool,
}

impl Categorizer {
    /// Built-in keyword table with an optional remote backend
    pub fn new(ai: Option<AIClient>) -> Self {
        Self::with_table(KeywordTable::builtin(), ai)
    }

    /// Custom keyword table with an optional remote backend
    pub fn with_table(table: KeywordTable, ai: Option<AIClient>) -> Self {
        Self {
            table: Arc::new(table),
            ai,
            strict_labels: false,
        }
    }

    /// Build from configuration
    pub fn from_config(config: &CategorizerConfig, ai: Option<AIClient>) -> Self {
        Self::new(ai).strict_labels(config.strict_labels)
    }

    /// Validate remote answers against the closed vocabulary
    pub fn strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict_labels
    }

    /// Keyword tier only
    pub fn keyword_match(&self, merchant: &str) -> Option<CategorizationResult> {
        self.table.find(merchant).map(|category| CategorizationResult {
            category: category.label.clone(),
            confidence: KEYWORD_CONFIDENCE,
        })
    }

    /// Categorize a transaction
    ///
    /// Never fails: a remote failure (or no configured backend) yields
    /// `{"Miscellaneous", 0.0}`.
    pub async fn categorize(&self, merchant: &str, amount: f64) -> CategorizationResult {
        if let Some(result) = self.keyword_match(merchant) {
            debug!(
                "Keyword matched for '{}': {}",
                merchant, result.category
            );
            return result;
        }

        match self.classify_remote(merchant, amount).await {
            Ok(category) => {
                debug!("AI classified '{}': {}", merchant, category);
                CategorizationResult {
                    category,
                    confidence: REMOTE_CONFIDENCE,
                }
            }
            Err(Error::BackendUnavailable) => {
                debug!(
                    "No AI backend, falling back to '{}' for '{}'",
                    DEFAULT_CATEGORY, merchant
                );
                CategorizationResult::fallback()
            }
            Err(e) => {
                warn!("AI classification failed for '{}': {}", merchant, e);
                CategorizationResult::fallback()
            }
        }
    }

    /// Categorize many transactions, preserving input order
    ///
    /// Identical unmatched merchants within one batch share a single remote call.
    pub async fn categorize_batch(&self, transactions: &[Transaction]) -> Vec<CategorizationResult> {
        let mut remote_cache: HashMap<String, CategorizationResult> = HashMap::new();
        let mut results = Vec::with_capacity(transactions.len());

        for tx in transactions {
            if let Some(result) = self.keyword_match(&tx.merchant) {
                results.push(result);
                continue;
            }
            if let Some(cached) = remote_cache.get(&tx.merchant) {
                debug!("AI cache hit for '{}'", tx.merchant);
                results.push(cached.clone());
                continue;
            }
            let result = self.categorize(&tx.merchant, tx.amount).await;
            remote_cache.insert(tx.merchant.clone(), result.clone());
            results.push(result);
        }

        results
    }

    /// Ask the remote model for a label from the closed vocabulary
    async fn classify_remote(&self, merchant: &str, amount: f64) -> Result<String> {
        let ai = self.ai.as_ref().ok_or(Error::BackendUnavailable)?;

        let prompt = Prompt::get(PromptId::ClassifyTransaction);
        let categories = REMOTE_CATEGORIES.join(", ");
        let amount = format!("{:.2}", amount);
        let mut vars = HashMap::new();
        vars.insert("categories", categories.as_str());
        vars.insert("merchant", merchant);
        vars.insert("amount", amount.as_str());
        let user = prompt.render_user(&vars);

        let options = CompletionOptions::classification().with_system(prompt.system);
        let response = ai.complete(&user, &options).await?;

        parse_category_label(&response, self.strict_labels)
    }
}
