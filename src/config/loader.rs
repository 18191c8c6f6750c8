//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a YAML or TOML file.
///
/// Files ending in `.toml` are read as TOML, everything else as YAML.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml(&content)?,
        Some("yml") | Some("yaml") | None => parse_yaml(&content)?,
        Some(other) => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}

/// Parse YAML content. An empty document yields the defaults.
pub fn parse_yaml(content: &str) -> Result<AppConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}
