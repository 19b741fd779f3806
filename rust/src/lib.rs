//! Hashes a password with bcrypt and appends it to a dotenv file as
//! `AUTH_PASSWORD_HASH=<hash>`. The CLI lives in `main.rs`; everything it
//! does is reachable from here so it can be tested without a process.

pub mod app;
pub mod config;
pub mod crypto;
pub mod env_file;
