//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/riskscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/riskscope/` (~/.config/riskscope/)
//! - Data: `$XDG_DATA_HOME/riskscope/` (~/.local/share/riskscope/)
//! - State/Logs: `$XDG_STATE_HOME/riskscope/` (~/.local/state/riskscope/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Collaborator service endpoints
    #[serde(default)]
    pub services: ServicesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Endpoints for the external prediction, narrative, and assistant services.
///
/// All four are plain POST endpoints; see the `services` module for the
/// payload contracts.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    /// Finance prediction endpoint
    #[serde(default = "default_finance_url")]
    pub finance_url: String,

    /// Health prediction endpoint
    #[serde(default = "default_health_url")]
    pub health_url: String,

    /// Narrative generation endpoint
    #[serde(default = "default_analysis_url")]
    pub analysis_url: String,

    /// Q&A assistant endpoint
    #[serde(default = "default_ask_url")]
    pub ask_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            finance_url: default_finance_url(),
            health_url: default_health_url(),
            analysis_url: default_analysis_url(),
            ask_url: default_ask_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServicesConfig {
    /// Validate configuration, returning an error message if invalid
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("services.finance_url", &self.finance_url),
            ("services.health_url", &self.health_url),
            ("services.analysis_url", &self.analysis_url),
            ("services.ask_url", &self.ask_url),
        ] {
            if url.trim().is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::Config(format!("{name} must be an http(s) URL")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "services.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_finance_url() -> String {
    "http://127.0.0.1:8000/finance/predict".to_string()
}

fn default_health_url() -> String {
    "http://127.0.0.1:8000/health/predict".to_string()
}

fn default_analysis_url() -> String {
    "http://127.0.0.1:8080/analysis".to_string()
}

fn default_ask_url() -> String {
    "http://127.0.0.1:8080/ask".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.services.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/riskscope/config.toml` (~/.config/riskscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("riskscope").join("config.toml")
    }

    /// Returns the data directory path (for the document store)
    ///
    /// `$XDG_DATA_HOME/riskscope/` (~/.local/share/riskscope/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("riskscope")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/riskscope/` (~/.local/state/riskscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("riskscope")
    }

    /// Returns the document store file path
    ///
    /// `$XDG_DATA_HOME/riskscope/data.db` (~/.local/share/riskscope/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/riskscope/riskscope.log` (~/.local/state/riskscope/riskscope.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("riskscope.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.services.timeout_secs, 30);
        assert!(config.services.finance_url.ends_with("/finance/predict"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[services]
finance_url = "https://models.example.com/finance/predict"
timeout_secs = 10

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.services.finance_url,
            "https://models.example.com/finance/predict"
        );
        // Unspecified endpoints keep their defaults
        assert!(config.services.health_url.ends_with("/health/predict"));
        assert_eq!(config.services.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_services_validation() {
        let config = ServicesConfig::default();
        assert!(config.validate().is_ok());

        let config = ServicesConfig {
            ask_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServicesConfig {
            analysis_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServicesConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
