//! Mock backend for testing
//!
//! Provides scripted, fixed or failing completions. Useful for unit tests and
//! for running the service locally without a model server (`AI_BACKEND=mock`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::prompts::PromptId;

use super::types::CompletionOptions;
use super::AIBackend;

#[derive(Clone, Debug)]
enum MockReply {
    /// Answer based on which prompt was sent
    Scripted,
    /// Always answer with this text
    Fixed(String),
    /// Always fail as if the remote service were down
    Fail,
}

/// Mock AI backend for testing
///
/// Clones share their call counter, so a clone handed to a categorizer can be
/// inspected from the test.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: MockReply,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, scripted answers)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: MockReply::Scripted,
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// A backend that always answers with `text`
    pub fn with_reply(text: &str) -> Self {
        Self {
            reply: MockReply::Fixed(text.to_string()),
            ..Self::new()
        }
    }

    /// A backend whose every completion fails
    pub fn failing() -> Self {
        Self {
            healthy: false,
            reply: MockReply::Fail,
            ..Self::new()
        }
    }

    /// Create an unhealthy mock backend that still answers
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    pub(crate) fn scripted(prompt: &str) -> String {
        match PromptId::detect(prompt) {
            Some(PromptId::ClassifyTransaction) => "Shopping".to_string(),
            Some(PromptId::AuditSpending) => r#"{"insights": [{"type": "tip", "title": "Set a weekly budget", "message": "Decide on a weekly limit for your top category and check in every Sunday.", "potential_savings": 0}]}"#.to_string(),
            Some(PromptId::ChatAdvisor) | None => {
                "Try tracking your top category for a month, then set a limit slightly below it."
                    .to_string()
            }
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, prompt: &str, _options: &CompletionOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match self.reply {
            MockReply::Scripted => Ok(Self::scripted(prompt)),
            MockReply::Fixed(ref text) => Ok(text.clone()),
            MockReply::Fail => Err(Error::InvalidData(
                "mock backend configured to fail".into(),
            )),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reply_and_call_count() {
        let mock = MockBackend::with_reply("Travel");
        let shared = mock.clone();

        let text = mock
            .complete("anything", &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "Travel");
        assert_eq!(shared.call_count(), 1);
        assert_eq!(shared.last_prompt().as_deref(), Some("anything"));
    }

    #[tokio::test]
    async fn test_failing() {
        let mock = MockBackend::failing();
        assert!(mock
            .complete("anything", &CompletionOptions::default())
            .await
            .is_err());
        assert!(!mock.health_check().await);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_unhealthy_still_answers() {
        let mock = MockBackend::unhealthy();
        assert!(!mock.healthy);
        assert!(matches!(mock.reply, MockReply::Scripted));
    }
}
