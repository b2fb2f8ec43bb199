//! Service configuration
//!
//! Configuration is resolved in two layers:
//! 1. An optional TOML file (`--config <path>`, or `penny/penny.toml` in the
//!    platform config dir when it exists)
//! 2. Environment variables, which override the file
//!
//! ```toml
//! [ai]
//! backend = "openai_compatible"
//! openai_host = "https://api.openai.com"
//! openai_model = "gpt-4o-mini"
//! timeout_secs = 20
//!
//! [categorizer]
//! strict_labels = true
//!
//! [server]
//! port = 8000
//! allowed_origins = ["http://localhost:5173"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Which remote model API to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum BackendKind {
    #[default]
    #[serde(rename = "openai_compatible", alias = "openai")]
    OpenAICompatible,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "mock")]
    Mock,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Ok(Self::OpenAICompatible)
            }
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            other => Err(format!("Unknown AI backend: {}", other)),
        }
    }
}

/// Remote model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub backend: BackendKind,
    /// Server root, with or without the `/v1` suffix
    /// (`https://api.openai.com` and `https://api.openai.com/v1` are equivalent)
    pub openai_host: Option<String>,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub ollama_host: Option<String>,
    pub ollama_model: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            openai_host: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_api_key: None,
            ollama_host: None,
            ollama_model: "llama3.2".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Categorizer settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    /// Reject remote answers outside the closed category vocabulary
    pub strict_labels: bool,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec![],
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub ai: AiConfig,
    pub categorizer: CategorizerConfig,
    pub server: ServerSettings,
}

/// Default config file location (`<config dir>/penny/penny.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("penny").join("penny.toml"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ServiceConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config file (if any) and apply environment overrides
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(ref p) => {
                debug!(path = %p.display(), "Loading config file");
                Self::from_toml_str(&fs::read_to_string(p)?)?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("AI_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.ai.backend = kind,
                Err(e) => warn!(backend = %backend, "{}, keeping {:?}", e, self.ai.backend),
            }
        }
        if let Some(host) = get("OPENAI_COMPATIBLE_HOST") {
            self.ai.openai_host = Some(host);
        }
        if let Some(model) = get("OPENAI_COMPATIBLE_MODEL") {
            self.ai.openai_model = model;
        }
        if let Some(key) = get("OPENAI_COMPATIBLE_API_KEY") {
            self.ai.openai_api_key = Some(key);
        }
        if let Some(host) = get("OLLAMA_HOST") {
            self.ai.ollama_host = Some(host);
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.ai.ollama_model = model;
        }
        if let Some(secs) = get("AI_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(secs) => self.ai.timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring invalid AI_TIMEOUT_SECS"),
            }
        }
        if let Some(strict) = get("PENNY_STRICT_LABELS") {
            match parse_bool(&strict) {
                Some(v) => self.categorizer.strict_labels = v,
                None => warn!(value = %strict, "Ignoring invalid PENNY_STRICT_LABELS"),
            }
        }
        if let Some(host) = get("PENNY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PENNY_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid PENNY_PORT"),
            }
        }
        if let Some(origins) = get("PENNY_ALLOWED_ORIGINS") {
            self.server.allowed_origins = parse_list(&origins);
        }
    }
}
