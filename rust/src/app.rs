//! The one-shot pipeline: hash, print, append, done.

use std::io::{self, Write};

use thiserror::Error;

use crate::config::{ConfigError, HasherConfig};
use crate::crypto::passwords::{self, HashingError};
use crate::env_file::{self, EnvFileError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("hashing error: {0}")]
    Hashing(#[from] HashingError),
    #[error("io error: {0}")]
    Io(#[from] EnvFileError),
    #[error("output error: {0}")]
    Output(#[source] io::Error),
}

impl AppError {
    /// Process exit status for this failure. Success is 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Input(_) => 2,
            AppError::Hashing(_) => 3,
            AppError::Io(EnvFileError::InvalidEntry(_)) => 2,
            AppError::Io(EnvFileError::Io { .. }) | AppError::Output(_) => 4,
        }
    }
}

/// Hashes `plaintext` and prints the hash to `out` without persisting it.
pub fn hash_only<W: Write>(plaintext: &str, cost: u32, out: &mut W) -> Result<String, AppError> {
    let hash = passwords::hash_password(plaintext, cost)?;
    writeln!(out, "{hash}").map_err(AppError::Output)?;
    Ok(hash)
}

/// Hashes `plaintext`, prints the hash, then appends `KEY=<hash>` to the
/// configured env file and prints a confirmation.
///
/// The hash reaches `out` before the file is touched, so it is still visible
/// when the append fails.
pub fn hash_and_store<W: Write>(
    plaintext: &str,
    config: &HasherConfig,
    out: &mut W,
) -> Result<String, AppError> {
    config.validate()?;
    let hash = hash_only(plaintext, config.cost, out)?;

    env_file::append_entry(&config.env_file, &config.key, &hash)?;
    writeln!(
        out,
        "The password hash has been stored in {}.",
        config.env_file.display()
    )
    .map_err(AppError::Output)?;
    Ok(hash)
}
