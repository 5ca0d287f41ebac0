//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments (applied by the caller)

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use anyhow::Context;
use contentcheck_core::loader::load_document;
use contentcheck_core::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation settings passed to the core validator
    pub validation: ValidationConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        load_document(path)
            .with_context(|| format!("failed to load {}", path.display()))
            .map_err(|e| Error::config(format!("{:#}", e)))
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) if !path.exists() => Err(Error::FileNotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".contentcheck.yaml"),
            PathBuf::from(".contentcheck.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("contentcheck");
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".contentcheck.yaml"));
            paths.push(home_dir.join(".contentcheck.json"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation, ValidationConfig::default());
        assert_eq!(config.output.format, OutputFormat::Human);
        assert!(config.output.color);
    }

    #[test]
    fn test_yaml_config_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "validation:\n  maxDepth: 4\noutput:\n  format: json-pretty\nlogging:\n  format: json"
        )
        .unwrap();

        let config = Config::load_with_file(Some(file.path())).unwrap();
        assert_eq!(config.validation.max_depth, 4);
        assert_eq!(config.validation.key_scope, "_content");
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_json_config_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"validation": {{"keyScope": "doc"}}, "output": {{"color": false}}}}"#).unwrap();

        let config = Config::load_with_file(Some(file.path())).unwrap();
        assert_eq!(config.validation.key_scope, "doc");
        assert!(!config.output.color);
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::load_with_file(Some(Path::new("/nonexistent/contentcheck.yaml")));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".toml").unwrap();
        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
