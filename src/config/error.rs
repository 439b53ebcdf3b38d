//! Errors raised while reading or writing `config.yml`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `save` called before `load` chose a file
    #[error("Configuration file path not set")]
    FilePathNotSet,

    /// No home directory to put `.config/portal-listings` under
    #[error("Failed to find home directory")]
    HomeDirectoryNotFound,

    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create configuration directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializationFailed(String),

    /// `config.yml` is not valid YAML or has fields of the wrong type
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationFailed(String),

    /// `base_url` does not parse as an absolute URL
    #[error("Invalid URL '{url}' in configuration: {message}")]
    InvalidUrl { url: String, message: String },
}
