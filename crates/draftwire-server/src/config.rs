//! Configuration file parsing for the Draftwire server.
//!
//! Loads settings from TOML files including bind address, webhook secret,
//! OpenAI credentials, Telegram delivery settings, and pipeline pacing.

use draftwire_pipeline::PipelineConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Semantically invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// Shared secret expected in the webhook query string.
    /// When unset, webhook requests are accepted without validation.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// OpenAI API key
    pub openai_api_key: String,

    /// OpenAI chat completions endpoint
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Chat model identifier
    #[serde(default = "default_model")]
    pub openai_model: String,

    /// Telegram bot token
    pub telegram_bot_token: String,

    /// Chat ids that receive approval requests
    #[serde(default)]
    pub telegram_chat_ids: Vec<String>,

    /// SQLite database path. When unset, rows are kept in memory only.
    #[serde(default)]
    pub db_path: Option<String>,

    /// Pacing and background scan settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields and pipeline settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai_api_key.is_empty() {
            return Err(ConfigError::MissingField("openai_api_key".to_string()));
        }
        if self.telegram_bot_token.is_empty() {
            return Err(ConfigError::MissingField("telegram_bot_token".to_string()));
        }
        if self.telegram_chat_ids.is_empty() {
            return Err(ConfigError::MissingField("telegram_chat_ids".to_string()));
        }
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        AppConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            webhook_secret: Some("test-secret-do-not-use-in-production".to_string()),
            openai_api_key: "test-api-key".to_string(),
            openai_api_url: default_openai_api_url(),
            openai_model: default_model(),
            telegram_bot_token: "test-bot-token".to_string(),
            telegram_chat_ids: vec!["1001".to_string()],
            db_path: None,
            pipeline: PipelineConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
