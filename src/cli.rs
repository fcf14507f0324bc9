// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watcherd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watcherd",
    version,
    about = "Monitor directories for filesystem changes and run commands when they occur.",
    long_about = None
)]
pub struct CliArgs {
    /// What to do.
    #[arg(value_enum, value_name = "COMMAND")]
    pub command: DaemonCommand,

    /// Path to the config file.
    ///
    /// Default: `/etc/watcherd.toml`, then `~/.watcherd.toml`.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHERD_LOG` or a command-dependent default is used
    /// (`debug` defaults to debug, everything else to info).
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// The supervisor operation requested on the command line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DaemonCommand {
    /// Daemonize and start watching.
    Start,
    /// Stop a running daemon.
    Stop,
    /// Stop, then start again.
    Restart,
    /// Run in the foreground without detaching.
    Debug,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
