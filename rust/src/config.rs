//! Configuration for the hasher. Values come from built-in defaults, an
//! optional JSON file, and finally the command line (see `main.rs`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::crypto::passwords::DEFAULT_COST;
use crate::env_file::{self, DEFAULT_ENV_FILE, DEFAULT_KEY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HasherConfig {
    /// bcrypt cost, `4..=31`.
    pub cost: u32,
    /// File the `KEY=VALUE` line is appended to.
    pub env_file: PathBuf,
    /// Variable name written in front of the hash.
    pub key: String,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl HasherConfig {
    /// Checks the key and target path. The cost range is enforced by
    /// `passwords::hash_password` so it always surfaces as a hashing error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        env_file::validate_key(&self.key).map_err(|e| ConfigError::Invalid(format!("{e}")))?;
        if self.env_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("env file path is empty".into()));
        }
        Ok(())
    }
}

/// Loads a JSON config file. Missing fields fall back to the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<HasherConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let config: HasherConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.validate()?;
    tracing::debug!(path = %path.as_ref().display(), "loaded config");
    Ok(config)
}
