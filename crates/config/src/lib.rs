//! Configuration loading, validation, and management for studentsim.
//!
//! Loads configuration from `studentsim.toml` (or a path given on the
//! command line), then reads a `.env` file, then applies environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "studentsim.toml";

/// The root configuration structure.
///
/// Maps directly to `studentsim.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name, used in logs and diagnostics
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model used for student replies
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens per student reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Directory for persisted state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Knowledge component mastery document
    #[serde(default = "default_knowledge_file")]
    pub knowledge_file: PathBuf,

    /// Directory holding the prompt templates
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_max_tokens() -> u32 {
    150
}
fn default_temperature() -> f32 {
    0.7
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_knowledge_file() -> PathBuf {
    default_data_dir().join("kc_mastery.json")
}
fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("data_dir", &self.data_dir)
            .field("knowledge_file", &self.knowledge_file)
            .field("prompts_dir", &self.prompts_dir)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `path`, `.env`, and the process environment.
    ///
    /// Environment variables, in priority order:
    /// - `STUDENTSIM_API_KEY`, then `OPENAI_API_KEY` (only if no key is configured)
    /// - `STUDENTSIM_MODEL`
    /// - `STUDENTSIM_API_URL`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        match dotenvy::dotenv() {
            Ok(env_path) => tracing::debug!(path = %env_path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
        }

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("STUDENTSIM_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            self.api_key = non_empty("OPENAI_API_KEY");
        }

        if let Some(model) = non_empty("STUDENTSIM_MODEL") {
            self.model = model;
        }

        if let Some(url) = non_empty("STUDENTSIM_API_URL") {
            self.api_url = url;
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".into(),
            ));
        }

        if self.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("api_url must not be empty".into()));
        }

        Ok(())
    }

    /// The configured API key, or an error telling the user how to set one.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }

    /// Create the data and prompts directories if they do not exist.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        let knowledge_parent = self
            .knowledge_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty());

        for dir in [Some(self.data_dir.as_path()), Some(self.prompts_dir.as_path()), knowledge_parent]
            .into_iter()
            .flatten()
        {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::DirectoryError {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            data_dir: default_data_dir(),
            knowledge_file: default_knowledge_file(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("OPENAI_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Failed to create directory {path}: {reason}")]
    DirectoryError { path: PathBuf, reason: String },
}
