//! Penny Core Library
//!
//! Shared functionality for the Penny categorization and budgeting-advice service:
//! - Keyword table and category vocabularies
//! - Two-tier transaction categorizer (keywords, then a remote model)
//! - Budgeting advisor (spending audit and chat)
//! - Pluggable remote AI backends (OpenAI-compatible, Ollama, mock)
//! - Prompt library for remote model calls
//! - Service configuration (environment plus optional TOML file)

pub mod advisor;
pub mod ai;
pub mod categories;
pub mod categorizer;
pub mod config;
pub mod error;
pub mod prompts;

/// Test utilities including a mock completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advisor, AuditReport, ChatReply, Expense, Insight, InsightKind, SpendingSummary};
pub use ai::{AIBackend, AIClient, CompletionOptions, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use categories::{KeywordCategory, KeywordTable, DEFAULT_CATEGORY, REMOTE_CATEGORIES};
pub use categorizer::{CategorizationResult, Categorizer, Transaction};
pub use config::{AiConfig, BackendKind, CategorizerConfig, ServerSettings, ServiceConfig};
pub use error::{Error, Result};
pub use prompts::{Prompt, PromptId};
