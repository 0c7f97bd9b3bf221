//! Kit configuration (abckit.toml)
//!
//! Configuration is always passed explicitly; nothing is read from the
//! environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value was syntactically valid but meaningless
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KitConfig {
    /// Container reading options
    #[serde(default)]
    pub file: FileConfig,

    /// Graph handling options
    #[serde(default)]
    pub graph: GraphConfig,

    /// Logging options
    #[serde(default)]
    pub log: LogConfig,
}

/// Container reading options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    /// Reject containers whose payload checksum does not match
    #[serde(default = "default_true")]
    pub verify_checksum: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}

/// Graph handling options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphConfig {
    /// Verify a graph before it replaces a function body
    #[serde(default = "default_true")]
    pub verify_on_set: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            verify_on_set: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

/// Logging options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Default level ("off", "error", "warn", "info", "debug", "trace")
    #[serde(default = "default_level")]
    pub level: String,

    /// Level for the `abckit::file` target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Level for the `abckit::inspect` target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspect: Option<String>,

    /// Level for the `abckit::modify` target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify: Option<String>,

    /// Level for the `abckit::ir` target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ir: Option<String>,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            inspect: None,
            modify: None,
            ir: None,
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    /// Default level filter
    pub fn global(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.level)
    }

    /// Level filter for a target area, falling back to the default level
    pub fn level_for(&self, area: &str) -> Result<LevelFilter, ConfigError> {
        let specific = match area {
            "file" => self.file.as_deref(),
            "inspect" => self.inspect.as_deref(),
            "modify" => self.modify.as_deref(),
            "ir" => self.ir.as_deref(),
            _ => None,
        };
        match specific {
            Some(level) => parse_level(level),
            None => self.global(),
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| ConfigError::ValidationError(format!("unknown log level '{}'", level)))
}

impl KitConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: KitConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that every level string is recognized
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log.global()?;
        for area in ["file", "inspect", "modify", "ir"] {
            self.log.level_for(area)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KitConfig::default();
        assert!(config.file.verify_checksum);
        assert!(config.graph.verify_on_set);
        assert_eq!(config.log.global().unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn test_parse_partial() {
        let config = KitConfig::from_toml_str(
            r#"
            [graph]
            verify_on_set = false

            [log]
            level = "info"
            ir = "trace"
            format = "json"
            "#,
        )
        .unwrap();
        assert!(config.file.verify_checksum);
        assert!(!config.graph.verify_on_set);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level_for("ir").unwrap(), LevelFilter::TRACE);
        assert_eq!(config.log.level_for("modify").unwrap(), LevelFilter::INFO);
    }

    #[test]
    fn test_rejects_bad_level() {
        let err = KitConfig::from_toml_str("[log]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abckit.toml");
        std::fs::write(&path, "[file]\nverify_checksum = false\n").unwrap();
        let config = KitConfig::load(&path).unwrap();
        assert!(!config.file.verify_checksum);
    }
}
