//! Configuration errors

use std::path::PathBuf;

/// Errors that can occur while building `Settings`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
