use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems. Any of these aborts the run before an
/// artifact is written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("missing required config key `{key}` ({context})")]
    MissingKey { key: &'static str, context: String },

    #[error("invalid value for config key `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub fn missing(key: &'static str, context: impl Into<String>) -> Self {
        Self::MissingKey {
            key,
            context: context.into(),
        }
    }

    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
