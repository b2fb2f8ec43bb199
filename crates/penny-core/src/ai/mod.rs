//! Pluggable remote AI backend abstraction
//!
//! This module provides a backend-agnostic interface for text completion. The
//! categorizer and the advisor only ever ask for "prompt in, text out"; how the
//! text is produced is up to the backend.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = ServiceConfig::load(None)?;
//! let ai = AIClient::from_config(&config.ai);
//!
//! if let Some(ref client) = ai {
//!     let text = client.complete("Say hi", &CompletionOptions::default()).await?;
//! }
//! ```
//!
//! # Configuration
//!
//! See [`crate::config::AiConfig`]. Environment variables:
//! - `AI_BACKEND`: Backend to use (openai_compatible, ollama, mock). Default: openai_compatible
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `AI_TIMEOUT_SECS`: Per-request timeout (default: 30)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{AiConfig, BackendKind};
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks. A backend
/// makes exactly one attempt per call; callers decide what a failure means.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Run a single completion and return the raw generated text
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible chat completions API (OpenAI, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from resolved configuration
    ///
    /// Returns None if the selected backend's host is not configured.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let timeout = config.timeout();
        match config.backend {
            BackendKind::OpenAICompatible => {
                let host = config.openai_host.as_deref()?;
                let mut backend =
                    OpenAICompatibleBackend::new(host, &config.openai_model).with_timeout(timeout);
                if let Some(ref key) = config.openai_api_key {
                    backend = backend.with_api_key(key);
                }
                Some(AIClient::OpenAICompatible(backend))
            }
            BackendKind::Ollama => {
                let host = config.ollama_host.as_deref()?;
                Some(AIClient::Ollama(
                    OllamaBackend::new(host, &config.ollama_model).with_timeout(timeout),
                ))
            }
            BackendKind::Mock => Some(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai_compatible(host: &str, model: &str) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::new(host, model))
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Log the configured backend and whether it answers
    pub async fn log_status(&self) {
        if self.health_check().await {
            info!(host = %self.host(), model = %self.model(), "AI backend connected");
        } else {
            warn!(
                host = %self.host(),
                model = %self.model(),
                "AI backend configured but not responding"
            );
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(prompt, options).await,
            AIClient::Ollama(b) => b.complete(prompt, options).await,
            AIClient::Mock(b) => b.complete(prompt, options).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_requires_host() {
        let config = AiConfig::default();
        assert!(config.openai_host.is_none());
        assert!(AIClient::from_config(&config).is_none());

        let config = AiConfig {
            backend: BackendKind::Ollama,
            ..AiConfig::default()
        };
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_openai_compatible() {
        let config = AiConfig {
            openai_host: Some("http://localhost:8080/".to_string()),
            openai_model: "gpt-4o-mini".to_string(),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert!(matches!(client, AIClient::OpenAICompatible(_)));
        assert_eq!(client.host(), "http://localhost:8080");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_from_config_ollama() {
        let config = AiConfig {
            backend: BackendKind::Ollama,
            ollama_host: Some("http://localhost:11434".to_string()),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert!(matches!(client, AIClient::Ollama(_)));
        assert_eq!(client.model(), "llama3.2");
    }

    #[test]
    fn test_from_config_mock_needs_no_host() {
        let config = AiConfig {
            backend: BackendKind::Mock,
            ..AiConfig::default()
        };
        assert!(matches!(
            AIClient::from_config(&config),
            Some(AIClient::Mock(_))
        ));
    }
}
