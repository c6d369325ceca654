//! Errors surfaced while loading and validating `folio.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid TOML in config file")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Validation(String),
}
