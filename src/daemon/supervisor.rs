// src/daemon/supervisor.rs

use anyhow::{Context, Result, bail};
use nix::unistd::getpid;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

use crate::config::{DaemonSettings, JobConfig};
use crate::daemon::pidfile::{DaemonStatus, PidFile, PidfileGuard};
use crate::daemon::process;
use crate::watch;

/// The process lifecycle state machine.
///
/// Owns the pidfile-based single-instance check, daemonization, and the
/// start/stop/restart/debug transitions. The watch sessions themselves are
/// built and torn down inside [`Supervisor::run_sessions`].
pub struct Supervisor {
    pidfile: PidFile,
    settings: DaemonSettings,
    jobs: Vec<JobConfig>,
}

impl Supervisor {
    pub fn new(settings: DaemonSettings, jobs: Vec<JobConfig>) -> Self {
        Self {
            pidfile: PidFile::new(settings.pidfile.clone()),
            settings,
            jobs,
        }
    }

    /// Current daemon status, from the pidfile.
    pub fn status(&self) -> DaemonStatus {
        self.pidfile.status()
    }

    /// Daemonize and run the watch sessions. Does not return while the
    /// daemon is alive.
    pub fn start(&self) -> Result<()> {
        match self.pidfile.status() {
            DaemonStatus::NoPidfile => {}
            DaemonStatus::Stale(pid) => {
                info!(%pid, "clearing stale pidfile");
                self.pidfile.remove()?;
            }
            DaemonStatus::Running(pid) => {
                info!(
                    %pid,
                    pidfile = ?self.pidfile.path(),
                    "pidfile already exists, daemon already running"
                );
                bail!("daemon already running (pid {pid})");
            }
            DaemonStatus::Unknown(pid) => {
                warn!(?pid, "daemon status is indeterminate");
                bail!("daemon status is indeterminate; refusing to start");
            }
        }

        process::detach()?;
        process::redirect_stdio(&self.settings.logfile)?;
        self.pidfile.write(getpid())?;
        let _guard = PidfileGuard::new(self.pidfile.clone());

        info!("daemon started");
        self.run_sessions(false)
    }

    /// Stop a running daemon, verifying the final state.
    pub fn stop(&self) -> Result<()> {
        match self.pidfile.status() {
            DaemonStatus::NoPidfile => {
                info!(
                    pidfile = ?self.pidfile.path(),
                    "pidfile does not exist, daemon not running?"
                );
                return Ok(());
            }
            DaemonStatus::Stale(pid) => {
                self.pidfile.remove()?;
                info!(%pid, "cleared stale pid");
                return Ok(());
            }
            DaemonStatus::Running(pid) => {
                process::terminate(pid)?;
                self.pidfile.remove()?;
                info!("daemon stopped");
            }
            DaemonStatus::Unknown(pid) => {
                warn!(?pid, "daemon status is indeterminate; not acting");
                bail!("daemon status is indeterminate; refusing to stop");
            }
        }

        // Re-query to check that everything went well.
        match self.pidfile.status() {
            DaemonStatus::NoPidfile => Ok(()),
            other => {
                warn!(code = other.code(), "daemon not stopped");
                bail!("daemon did not stop cleanly (status code {})", other.code());
            }
        }
    }

    /// Stop, then start again. Stop failures propagate.
    pub fn restart(&self) -> Result<()> {
        self.stop()?;
        self.start()
    }

    /// Run the watch sessions in the foreground without detaching.
    pub fn debug(&self) -> Result<()> {
        warn!("press Ctrl-C to quit...");
        self.run_sessions(true)
    }

    /// Start every job's watch session and stay resident until a
    /// termination signal arrives, then stop every session.
    ///
    /// Built as an explicit runtime rather than `#[tokio::main]` because
    /// `start` has to fork before any runtime threads exist.
    fn run_sessions(&self, foreground: bool) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("building tokio runtime")?;

        runtime.block_on(async {
            let mut sessions = Vec::new();
            for job in &self.jobs {
                match watch::spawn_session(job.clone()) {
                    Ok(handle) => sessions.push(handle),
                    Err(err) => {
                        warn!(
                            job = %job.name,
                            error = format!("{err:#}"),
                            "failed to start watch session"
                        );
                    }
                }
            }
            info!(sessions = sessions.len(), "watch sessions running");

            let mut sigterm =
                signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
            let mut sigint =
                signal(SignalKind::interrupt()).context("installing SIGINT handler")?;

            loop {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("received SIGTERM, shutting down");
                        break;
                    }
                    _ = sigint.recv() => {
                        if foreground {
                            // Route Ctrl-C through the same SIGTERM shutdown
                            // path the daemonized process takes.
                            info!("interrupted, signalling own process");
                            process::terminate_self()?;
                        } else {
                            info!("received SIGINT, shutting down");
                            break;
                        }
                    }
                }
            }

            for session in sessions {
                session.stop();
            }
            Ok(())
        })
    }
}
