// src/exec/command.rs

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

/// Execute a rendered command line through the shell, fire-and-forget.
///
/// Only immediate spawn success or failure is observed synchronously; a
/// detached task reaps the child and logs its exit so concurrent events can
/// produce overlapping executions without blocking event delivery. Failures
/// of any kind are logged and swallowed; one failing command must not stop
/// the watch session or sibling sessions.
///
/// The child inherits the daemon's stdio, so command output lands in the
/// logfile once the process has detached.
pub fn spawn_command(job: &str, command: &str) {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).stdin(Stdio::null());

    match cmd.spawn() {
        Ok(mut child) => {
            info!(job, %command, "running command");
            let job = job.to_string();
            let command = command.to_string();
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) if status.success() => {
                        debug!(job, %command, "command finished");
                    }
                    Ok(status) => {
                        warn!(
                            job,
                            %command,
                            code = status.code().unwrap_or(-1),
                            "command exited with failure"
                        );
                    }
                    Err(err) => {
                        warn!(job, %command, error = %err, "failed to wait for command");
                    }
                }
            });
        }
        Err(err) => {
            warn!(job, %command, error = %err, "failed to run command");
        }
    }
}
