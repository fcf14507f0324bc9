// src/daemon/process.rs

//! OS process-management primitives: detach, redirect stdio, signal, poll.
//!
//! These are isolated here so the supervisor's state machine and the watch
//! engine stay testable without actually forking.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::sys::stat::{Mode, umask};
use nix::unistd::{ForkResult, Pid, chdir, dup2, fork, getpid, setsid};
use tracing::debug;

const TERM_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Detach from the controlling terminal with the classic double fork.
///
/// First fork and exit the parent, decouple from the parent environment
/// (chdir to `/`, new session, reset umask), then fork again so the daemon
/// can never reacquire a controlling terminal. Both intermediate parents
/// exit with status 0, which is what returns control to the invoking shell.
pub fn detach() -> Result<()> {
    match unsafe { fork() }.context("first fork failed")? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }

    chdir("/").context("chdir to / failed")?;
    setsid().context("setsid failed")?;
    umask(Mode::empty());

    match unsafe { fork() }.context("second fork failed")? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }

    Ok(())
}

/// Redirect standard streams: stdin from `/dev/null`, stdout and stderr
/// appended to the logfile.
pub fn redirect_stdio(logfile: &Path) -> Result<()> {
    let devnull = File::open("/dev/null").context("opening /dev/null")?;
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logfile)
        .with_context(|| format!("opening logfile at {logfile:?}"))?;

    let stdin = std::io::stdin().as_raw_fd();
    let stdout = std::io::stdout().as_raw_fd();
    let stderr = std::io::stderr().as_raw_fd();

    dup2(devnull.as_raw_fd(), stdin).context("redirecting stdin")?;
    dup2(log.as_raw_fd(), stdout).context("redirecting stdout")?;
    dup2(log.as_raw_fd(), stderr).context("redirecting stderr")?;

    Ok(())
}

/// Terminate a process: SIGTERM repeatedly at short intervals until it
/// disappears.
///
/// "Process no longer exists" counts as success. Any other failure on the
/// first attempt is surfaced as fatal (something is wrong beyond "already
/// gone"); the identical failure on a later attempt is the expected end of a
/// successfully terminated process.
pub fn terminate(pid: Pid) -> Result<()> {
    let mut first_attempt = true;

    loop {
        match kill(pid, Signal::SIGTERM) {
            Ok(()) => {
                first_attempt = false;
                debug!(%pid, "sent SIGTERM");
                thread::sleep(TERM_POLL_INTERVAL);
            }
            Err(Errno::ESRCH) if !first_attempt => return Ok(()),
            Err(err) if first_attempt => {
                return Err(err)
                    .with_context(|| format!("failed to signal pid {pid}"));
            }
            Err(_) => return Ok(()),
        }
    }
}

/// Send the current process its own SIGTERM, exercising the normal shutdown
/// path. Used by the foreground `debug` command on interrupt.
pub fn terminate_self() -> Result<()> {
    kill(getpid(), Signal::SIGTERM).context("failed to signal own process")
}
