//! Store configuration
//!
//! Resolution order (highest wins):
//! 1. Explicit database URL (CLI flag or `QUERYLAB_DATABASE_URL`)
//! 2. TOML file passed with `--config`
//! 3. Built-in defaults

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{QueryLabError, Result};

/// Default SQLite database, relative to the working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://querylab.db";

/// One connection is enough for a single sequential session.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;

/// Resolved configuration for opening a [`crate::Store`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub database_url: String,
    pub max_connections: u32,
}

/// On-disk shape of the config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database_url: Option<String>,
    max_connections: Option<u32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DemoConfig {
    /// Build a config for the given database URL with default pool limits.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Resolve the configuration from an optional file and an optional URL override.
    ///
    /// A file that was asked for but cannot be read is an error; no file means defaults.
    pub fn load(config_path: Option<&Path>, database_url: Option<&str>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                toml::from_str::<ConfigFile>(&content)
                    .map_err(|err| QueryLabError::config_parse(path, err))?
            }
            None => ConfigFile::default(),
        };

        let defaults = Self::default();
        let config = Self {
            database_url: database_url
                .map(str::to_string)
                .or(file.database_url)
                .unwrap_or(defaults.database_url),
            max_connections: file.max_connections.unwrap_or(defaults.max_connections),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(QueryLabError::config("database_url must not be empty"));
        }
        if self.max_connections == 0 {
            return Err(QueryLabError::config("max_connections must be at least 1"));
        }
        Ok(())
    }
}
