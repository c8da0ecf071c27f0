//! Configuration for the HTTP transport

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for [`HttpTransport`](crate::core::transport::HttpTransport)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key appended to every request
    pub api_key: String,
    /// Base URL of the remote service, including the API version segment
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("ONESKY_API_KEY").unwrap_or_default(),
            base_url: std::env::var("ONESKY_API_URL")
                .unwrap_or_else(|_| "https://api.oneskyapp.com/1".to_string()),
            timeout_ms: 30000,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("ONESKY_API_KEY")
            .map_err(|_| anyhow::anyhow!("ONESKY_API_KEY environment variable is required"))?;

        let base_url = std::env::var("ONESKY_API_URL")
            .unwrap_or_else(|_| "https://api.oneskyapp.com/1".to_string());

        let timeout_ms = std::env::var("ONESKY_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        Ok(Self {
            api_key,
            base_url,
            timeout_ms,
        })
    }

    /// Load and validate configuration from the environment
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
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

        if self.base_url.is_empty() {
            return Err(anyhow::anyhow!("API base URL is required"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}
