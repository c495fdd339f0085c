//! # Configuration Module
//!
//! Handles loading and validating monitor configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{EnoceanError, Result};

/// Smallest accepted stream buffer
const MIN_BUFFER_BYTES: usize = 64;

/// Largest accepted stream buffer
const MAX_BUFFER_BYTES: usize = 1024 * 1024;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial framing of the input stream
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Esp3,
    Esp2,
}

/// How bytes are represented on the input stream
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputEncoding {
    /// Raw bytes as read from the transceiver
    Binary,
    /// One hex string per line, whitespace ignored
    Hex,
}

/// Input stream configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,

    #[serde(default = "default_encoding")]
    pub encoding: InputEncoding,

    #[serde(default = "default_max_buffer_bytes")]
    pub max_buffer_bytes: usize,
}

/// Telegram output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: String,

    #[serde(default = "default_include_raw")]
    pub include_raw: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files, empty for stderr only
    #[serde(default)]
    pub log_dir: String,
}

// Default value functions
fn default_protocol() -> Protocol { Protocol::Esp3 }
fn default_encoding() -> InputEncoding { InputEncoding::Binary }
fn default_max_buffer_bytes() -> usize { 4096 }

fn default_output_format() -> String { "jsonl".to_string() }
fn default_include_raw() -> bool { true }

fn default_log_level() -> String { "info".to_string() }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            encoding: default_encoding(),
            max_buffer_bytes: default_max_buffer_bytes(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            include_raw: default_include_raw(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use enocean_codec::config::Config;
    ///
    /// let config = Config::load("config/monitor.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.input.max_buffer_bytes < MIN_BUFFER_BYTES || self.input.max_buffer_bytes > MAX_BUFFER_BYTES {
            return Err(EnoceanError::Config(toml::de::Error::custom(format!(
                "max_buffer_bytes must be between {} and {}",
                MIN_BUFFER_BYTES, MAX_BUFFER_BYTES
            ))));
        }

        if self.output.format != "jsonl" {
            return Err(EnoceanError::Config(toml::de::Error::custom(
                "output format must be 'jsonl' (only supported format)",
            )));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(EnoceanError::Config(toml::de::Error::custom(
                "log level must be one of: trace, debug, info, warn, error",
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.input.protocol, Protocol::Esp3);
        assert_eq!(config.input.encoding, InputEncoding::Binary);
        assert_eq!(config.input.max_buffer_bytes, 4096);
        assert_eq!(config.output.format, "jsonl");
        assert!(config.output.include_raw);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_dir.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.input.protocol, Protocol::Esp3);
        assert_eq!(config.input.max_buffer_bytes, 4096);
    }

    #[test]
    fn test_load_config_from_file() {
        let toml_content = r#"
[input]
protocol = "esp2"
encoding = "hex"
max_buffer_bytes = 512

[output]
include_raw = false

[logging]
level = "debug"
log_dir = "./logs"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.input.protocol, Protocol::Esp2);
        assert_eq!(config.input.encoding, InputEncoding::Hex);
        assert_eq!(config.input.max_buffer_bytes, 512);
        assert!(!config.output.include_raw);
        assert_eq!(config.output.format, "jsonl");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_dir, "./logs");
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/monitor.toml");
        let config = Config::load(path).unwrap();
        let defaults = Config::default();
        assert_eq!(config.input.protocol, defaults.input.protocol);
        assert_eq!(config.input.encoding, defaults.input.encoding);
        assert_eq!(config.input.max_buffer_bytes, defaults.input.max_buffer_bytes);
        assert_eq!(config.output.format, defaults.output.format);
        assert_eq!(config.output.include_raw, defaults.output.include_raw);
        assert_eq!(config.logging.level, defaults.logging.level);
        assert_eq!(config.logging.log_dir, defaults.logging.log_dir);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/enocean/monitor.toml");
        assert!(matches!(result, Err(EnoceanError::Io(_))));
    }

    #[test]
    fn test_unknown_protocol() {
        let result = Config::from_toml("[input]\nprotocol = \"esp4\"\n");
        assert!(matches!(result, Err(EnoceanError::Config(_))));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut config = Config::default();
        config.input.max_buffer_bytes = 63;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_buffer_too_large() {
        let mut config = Config::default();
        config.input.max_buffer_bytes = 1024 * 1024 + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_buffer_bounds_are_inclusive() {
        for size in [64, 1024 * 1024] {
            let mut config = Config::default();
            config.input.max_buffer_bytes = size;
            assert!(config.validate().is_ok(), "Buffer size {} should be valid", size);
        }
    }

    #[test]
    fn test_invalid_output_format() {
        let mut config = Config::default();
        config.output.format = "csv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Log level {} should be valid", level);
        }

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_protocol(), Protocol::Esp3);
        assert_eq!(default_encoding(), InputEncoding::Binary);
        assert_eq!(default_max_buffer_bytes(), 4096);
        assert_eq!(default_output_format(), "jsonl");
        assert!(default_include_raw());
        assert_eq!(default_log_level(), "info");
    }
}
