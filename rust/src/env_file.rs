//! Appends `KEY=VALUE` lines to dotenv-style files. Existing content is never
//! read or rewritten; every call adds exactly one line.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Variable name the hash is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "AUTH_PASSWORD_HASH";
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("invalid env entry: {0}")]
    InvalidEntry(String),
    #[error("unable to append to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Checks that `key` can be used as a variable name in an env file.
pub fn validate_key(key: &str) -> Result<(), EnvFileError> {
    if key.is_empty() {
        return Err(EnvFileError::InvalidEntry("key is empty".into()));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| *c == '=' || c.is_whitespace() || c.is_control())
    {
        return Err(EnvFileError::InvalidEntry(format!(
            "key {key:?} contains forbidden character {bad:?}"
        )));
    }
    Ok(())
}

/// Builds the `KEY=VALUE\n` line, rejecting input that would span lines.
pub fn format_entry(key: &str, value: &str) -> Result<String, EnvFileError> {
    validate_key(key)?;
    if value.contains(['\n', '\r']) {
        return Err(EnvFileError::InvalidEntry(format!(
            "value for {key} contains a line break"
        )));
    }
    Ok(format!("{key}={value}\n"))
}

/// Appends one entry to `path`, creating the file when it is missing.
///
/// The line goes out in a single `write_all` on an append-mode handle. No lock
/// is taken, so concurrent writers get no ordering guarantee.
pub fn append_entry(path: impl AsRef<Path>, key: &str, value: &str) -> Result<(), EnvFileError> {
    let path = path.as_ref();
    let line = format_entry(key, value)?;
    let io_err = |source| EnvFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(line.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), key, "appended entry");
    Ok(())
}
