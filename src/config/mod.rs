//! Configuration management for nichepulse
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::dashboard::ServerConfig;
use crate::llm::LlmConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// AI provider configuration
    pub openai: LlmConfig,

    /// Store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Load sample data into a fresh store
    pub seed_sample_data: bool,

    /// JSON snapshot file (optional)
    pub snapshot_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            snapshot_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut server = ServerConfig::default();

        if let Ok(addr) = std::env::var("NICHEPULSE_BIND") {
            server.bind_address = addr
                .parse()
                .map_err(|_| ConfigError::invalid("NICHEPULSE_BIND", format!("Invalid address: {addr}")))?;
        }
        if let Some(cors) = env_bool("NICHEPULSE_CORS") {
            server.enable_cors = cors;
        }
        if let Some(logging) = env_bool("NICHEPULSE_REQUEST_LOGGING") {
            server.enable_request_logging = logging;
        }
        server.static_dir = std::env::var("NICHEPULSE_STATIC_DIR").ok().map(PathBuf::from);

        let store = StoreConfig {
            seed_sample_data: env_bool("NICHEPULSE_SEED").unwrap_or(true),
            snapshot_path: std::env::var("NICHEPULSE_SNAPSHOT").ok().map(PathBuf::from),
        };

        let logging = LoggingConfig {
            level: std::env::var("NICHEPULSE_LOG_LEVEL").unwrap_or_else(|_| String::from("info")),
            format: std::env::var("NICHEPULSE_LOG_FORMAT")
                .unwrap_or_else(|_| String::from("text")),
        };

        Ok(Self {
            server,
            openai: LlmConfig::from_env(),
            store,
            logging,
        })
    }

    /// Load configuration from a file
    ///
    /// `OPENAI_API_KEY` fills in the key when the file does not set one.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if config.openai.api_key.is_none() {
            config.openai.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty());
        }

        Ok(config)
    }

    /// Load from `path` when given, from the environment otherwise, then validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;

        if self.openai.model.trim().is_empty() {
            return Err(ConfigError::invalid("openai.model", "must not be empty"));
        }

        if !(self.openai.base_url.starts_with("http://") || self.openai.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "openai.base_url",
                format!("must be an http(s) URL, got '{}'", self.openai.base_url),
            ));
        }

        if self.openai.timeout_secs == 0 {
            return Err(ConfigError::invalid("openai.timeout_secs", "must be greater than 0"));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::invalid(
                "logging.format",
                format!("expected 'text' or 'json', got '{}'", self.logging.format),
            ));
        }

        Ok(())
    }

    /// Get AI request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.openai.timeout_secs)
    }

    /// Copy with the API key masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.openai.api_key = config.openai.api_key.as_deref().map(mask_key);
        config
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.store.seed_sample_data);
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.openai.base_url = "api.openai.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.openai.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_redacted_masks_key() {
        let mut config = Config::default();
        config.openai.api_key = Some("sk-abcdefghijklmnop".to_string());
        let redacted = config.redacted();
        assert_eq!(redacted.openai.api_key.as_deref(), Some("****mnop"));

        config.openai.api_key = Some("short".to_string());
        assert_eq!(config.redacted().openai.api_key.as_deref(), Some("****"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind_address = "127.0.0.1:9000"

            [openai]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address.port(), 9000);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.logging.format, "text");
    }
}
