// src/daemon/pidfile.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tracing::debug;

/// Observable daemon state, derived from the pidfile plus a liveness probe.
///
/// `Running` implies the pidfile content exactly matches the pid of a live
/// process; a recorded pid with no matching process is the definition of
/// `Stale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    /// No pidfile present, not running.
    NoPidfile,
    /// Pidfile present but the recorded process does not exist.
    Stale(Pid),
    /// Pidfile present and the recorded process is alive.
    Running(Pid),
    /// Indeterminate, e.g. a permission error probing the process or an
    /// unreadable pidfile. Never auto-resolved.
    Unknown(Option<Pid>),
}

impl DaemonStatus {
    /// Conventional numeric code for this status.
    pub fn code(&self) -> u8 {
        match self {
            DaemonStatus::NoPidfile => 0,
            DaemonStatus::Stale(_) => 1,
            DaemonStatus::Running(_) => 2,
            DaemonStatus::Unknown(_) => 9,
        }
    }
}

/// The pidfile: a plain-text file holding the decimal pid plus a newline.
///
/// Its presence plus liveness of the recorded pid is the sole source of
/// truth for "is the daemon running".
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded pid. `Ok(None)` when the file does not exist.
    pub fn read(&self) -> Result<Option<Pid>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading pidfile at {:?}", self.path));
            }
        };
        let pid: i32 = contents
            .trim()
            .parse()
            .with_context(|| format!("parsing pid from {:?}", self.path))?;
        Ok(Some(Pid::from_raw(pid)))
    }

    /// Record a pid, replacing any previous content.
    pub fn write(&self, pid: Pid) -> Result<()> {
        fs::write(&self.path, format!("{pid}\n"))
            .with_context(|| format!("writing pidfile at {:?}", self.path))
    }

    /// Delete the pidfile. Already-absent is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "pidfile does not exist anymore");
                Ok(())
            }
            Err(err) => Err(err)
                .with_context(|| format!("removing pidfile at {:?}", self.path)),
        }
    }

    /// Derive the daemon status: read the recorded pid, then probe the
    /// process with a null signal.
    pub fn status(&self) -> DaemonStatus {
        let pid = match self.read() {
            Ok(Some(pid)) => pid,
            Ok(None) => return DaemonStatus::NoPidfile,
            Err(_) => return DaemonStatus::Unknown(None),
        };

        match kill(pid, None) {
            Ok(()) => DaemonStatus::Running(pid),
            Err(Errno::ESRCH) => DaemonStatus::Stale(pid),
            Err(_) => DaemonStatus::Unknown(Some(pid)),
        }
    }
}

/// Best-effort pidfile removal on scope exit, covering both graceful stop
/// and abnormal (but unwound) process exit. A SIGKILL-equivalent crash skips
/// this and leaves a stale pidfile, healed on the next start or stop.
#[derive(Debug)]
pub struct PidfileGuard {
    pidfile: PidFile,
}

impl PidfileGuard {
    pub fn new(pidfile: PidFile) -> Self {
        Self { pidfile }
    }
}

impl Drop for PidfileGuard {
    fn drop(&mut self) {
        if let Err(err) = self.pidfile.remove() {
            debug!(error = %err, "failed to remove pidfile on exit");
        }
    }
}
