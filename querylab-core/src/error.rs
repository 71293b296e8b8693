/// Structured error types for querylab-core.
///
/// The binary (querylab-cli) wraps these in `anyhow` with context;
/// library consumers get the typed variants.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for querylab-core operations
#[derive(Error, Debug)]
pub enum QueryLabError {
    /// Statement, connection or pool failure reported by sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation failed (config file read, console write)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file is not valid TOML for `DemoConfig`
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for querylab-core operations
pub type Result<T> = std::result::Result<T, QueryLabError>;

impl QueryLabError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a config parse error for the file at `path`
    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }
}
