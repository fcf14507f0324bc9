// src/lib.rs

pub mod cli;
pub mod config;
pub mod daemon;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod media;
pub mod watch;

use anyhow::Result;

use crate::cli::DaemonCommand;
use crate::config::WatcherConfig;
use crate::daemon::Supervisor;

/// High-level entry point used by `main.rs`.
///
/// Wires the resolved configuration into a [`Supervisor`] and executes the
/// requested lifecycle command. `start` and `debug` do not return while the
/// daemon is alive.
///
/// Deliberately synchronous: `start` forks before any async runtime may
/// exist, so the tokio runtime is built inside the supervisor once the
/// process has detached.
pub fn run(command: DaemonCommand, cfg: WatcherConfig) -> Result<()> {
    let supervisor = Supervisor::new(cfg.daemon, cfg.jobs);

    match command {
        DaemonCommand::Start => supervisor.start(),
        DaemonCommand::Stop => supervisor.stop(),
        DaemonCommand::Restart => supervisor.restart(),
        DaemonCommand::Debug => supervisor.debug(),
    }
}
