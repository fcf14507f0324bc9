// src/logging.rs

//! Logging setup for `watcherd` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `WATCHERD_LOG` environment variable (e.g. "info", "debug")
//! 3. a command-dependent fallback (`debug` runs at DEBUG, daemonized
//!    commands at INFO)
//!
//! Sink selection mirrors the process model: the foreground `debug` command
//! logs to stderr, everything else appends to the configured logfile.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Where log lines go.
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Foreground mode: write to stderr.
    Stderr,
    /// Daemon mode: append to the logfile from `[default]`.
    File(PathBuf),
}

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup. Must be called before daemonizing so that
/// the logfile is open by the time stdio is redirected.
pub fn init_logging(
    cli_level: Option<LogLevel>,
    fallback: tracing::Level,
    sink: &LogSink,
) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("WATCHERD_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(fallback),
    };

    // `init()` does not return a Result, so this cannot fail at runtime
    // (if called more than once, it will panic; we only call once in main).
    match sink {
        LogSink::Stderr => {
            fmt()
                .with_max_level(level)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening logfile at {path:?}"))?;
            fmt()
                .with_max_level(level)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
    }

    Ok(())
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
