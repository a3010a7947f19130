//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translate.yandex.net/api/v1.5/tr.json";

/// Default per-batch character ceiling
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100_000;

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// API key sent as `key` with every request
    pub api_key: String,
    /// Base URL the method names are appended to
    pub api_endpoint: String,
    /// Default language for `getLangs` names
    pub ui_lang: String,
    /// Character ceiling per translate request
    pub max_batch_size: usize,
}

impl TranslatorConfig {
    /// Config with an explicit key and default everything else
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            ui_lang: "en".to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("YANDEX_API_KEY")
            .map_err(|_| anyhow::anyhow!("YANDEX_API_KEY environment variable is required"))?;

        let api_endpoint = std::env::var("YANDEX_API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let ui_lang = std::env::var("YANDEX_UI_LANG").unwrap_or_else(|_| "en".to_string());

        let max_batch_size = std::env::var("MAX_BATCH_SIZE")
            .unwrap_or_else(|_| DEFAULT_MAX_BATCH_SIZE.to_string())
            .parse::<usize>()?;

        Ok(Self {
            api_key,
            api_endpoint,
            ui_lang,
            max_batch_size,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!("API key is required"));
        }

        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.max_batch_size == 0 {
            return Err(anyhow::anyhow!("max_batch_size must be greater than 0"));
        }

        Ok(())
    }

    /// Endpoint URL for one API method, e.g. `translate`
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_endpoint.trim_end_matches('/'), method)
    }
}
