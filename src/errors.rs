// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! At the moment this is just a thin wrapper around `anyhow`, but the module
//! gives you a single place to add more structured error types later.
//!
//! Exit-code conventions (applied only in `main.rs`):
//! - 0: success
//! - 1: refused start (already running), stop verification failure, or any
//!   other runtime failure
//! - 2: unrecognized command (clap's own parse-error code)
//! - 4: configuration file unreadable or invalid

pub use anyhow::{Error, Result};

/// Exit code used when the configuration file cannot be read or parsed.
pub const EXIT_BAD_CONFIG: i32 = 4;
