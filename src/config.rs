//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - vdb-admin.toml (default configuration)
//! - vdb-admin.local.toml (git-ignored local overrides)
//! - Environment variables (VDB_ADMIN_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # vdb-admin.toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [matching]
//! wildcard = "*"
//! delimiter = "|"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! VDB_ADMIN_LOGGING__LEVEL=trace
//! VDB_ADMIN_MATCHING__WILDCARD=%
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::admin::{DELIMITER, WILDCARD};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Identifier pattern syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Marker matching any run of characters
    #[serde(default = "default_wildcard")]
    pub wildcard: char,

    /// Identifier part separator, dropped from patterns
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_wildcard() -> char {
    WILDCARD
}
fn default_delimiter() -> char {
    DELIMITER
}

/// Configuration that loaded but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] Box<figment::Error>),

    #[error("Wildcard and delimiter markers must differ (both are '{0}')")]
    MarkerClash(char),

    #[error("Unknown log format '{0}', expected 'text' or 'json'")]
    LogFormat(String),
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. vdb-admin.toml (base configuration)
    /// 2. vdb-admin.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (VDB_ADMIN_* prefix)
    pub fn load() -> Result<Self, ConfigError> {
        let config: Config = Figment::new()
            .merge(Toml::file("vdb-admin.toml"))
            .merge(Toml::file("vdb-admin.local.toml"))
            .merge(Env::prefixed("VDB_ADMIN_").split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config: Config = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("VDB_ADMIN_").split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make patterns or logging ambiguous.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.wildcard == self.matching.delimiter {
            return Err(ConfigError::MarkerClash(self.matching.wildcard));
        }
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::LogFormat(other.to_string())),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            wildcard: default_wildcard(),
            delimiter: default_delimiter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert!(config.logging.file.is_none());
        assert_eq!(config.matching.wildcard, '*');
        assert_eq!(config.matching.delimiter, '|');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();

        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[matching]"));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.logging.level, "info");
        assert_eq!(back.matching, MatchingConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let back: Config = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(back.logging.level, "debug");
        assert_eq!(back.logging.format, "text");
        assert_eq!(back.matching.wildcard, '*');
    }

    #[test]
    fn test_marker_clash_rejected() {
        let mut config = Config::default();
        config.matching.delimiter = '*';
        assert!(matches!(config.validate(), Err(ConfigError::MarkerClash('*'))));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::LogFormat(_))));
    }
}
