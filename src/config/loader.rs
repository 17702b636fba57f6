//! Configuration loading from disk.

use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config deserialized but a semantic check failed.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Semantic checks beyond what serde enforces.
pub fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config
        .listener
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Validation(format!(
                "invalid bind_address '{}': {}",
                config.listener.bind_address, e
            ))
        })?;

    if config.document_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "document_root must not be empty".to_string(),
        ));
    }

    Ok(())
}
