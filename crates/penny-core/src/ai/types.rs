//! AI backend request types
//!
//! These types are backend-agnostic and used across all AI implementations.

/// Sampling options for a single completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    /// Optional system instruction sent ahead of the prompt
    pub system: Option<String>,
    /// Sampling temperature (low = deterministic-ish)
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            system: None,
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

impl CompletionOptions {
    /// Low-variance settings for single-label classification
    pub fn classification() -> Self {
        Self {
            system: None,
            temperature: 0.1,
            max_tokens: Some(10),
        }
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.system = Some(system.to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_options_are_low_variance() {
        let options = CompletionOptions::classification();
        assert!(options.temperature <= 0.2);
        assert_eq!(options.max_tokens, Some(10));
        assert!(options.system.is_none());
    }

    #[test]
    fn test_builder() {
        let options = CompletionOptions::default()
            .with_system("be brief")
            .with_temperature(0.3)
            .with_max_tokens(64);
        assert_eq!(options.system.as_deref(), Some("be brief"));
        assert_eq!(options.temperature, 0.3);
        assert_eq!(options.max_tokens, Some(64));
    }
}
