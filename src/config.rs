//! Configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! Every section has defaults so the client runs against a local backend
//! with no config file at all.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend endpoint settings
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the CSM backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from an explicit path, or search the usual
    /// locations; defaults apply when nothing is found.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            return toml::from_str(&contents).context("Failed to parse config file");
        }

        let config_paths = vec![
            PathBuf::from("csmctl.toml"),
            dirs::config_dir()
                .map(|d| d.join("csmctl/config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/csmctl/config.toml"),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::debug!("Loading config from: {}", path.display());
                let contents =
                    std::fs::read_to_string(path).context("Failed to read config file")?;

                let config: Config =
                    toml::from_str(&contents).context("Failed to parse config file")?;

                return Ok(config);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://csm.example.net"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://csm.example.net");
        assert_eq!(config.http.timeout, 10);
        assert_eq!(config.http.connect_timeout, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8001");
    }
}
