// src/config/validate.rs

use anyhow::{Result, anyhow};
use tracing::warn;

use crate::config::model::WatcherConfig;

/// Run basic semantic validation against a resolved configuration.
///
/// This checks:
/// - there is at least one job
/// - every job has a non-empty watch path and command
///
/// A job whose `events` option produced an empty mask is warn-logged rather
/// than rejected: unrecognized tokens are tolerated individually, so the
/// same goes for a set made entirely of them. The job simply never fires.
pub fn validate_config(cfg: &WatcherConfig) -> Result<()> {
    if cfg.jobs.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [job.<name>] section"
        ));
    }

    for job in &cfg.jobs {
        if job.watch_path.as_os_str().is_empty() {
            return Err(anyhow!("job '{}' has an empty `watch` path", job.name));
        }
        if job.command.trim().is_empty() {
            return Err(anyhow!("job '{}' has an empty `command`", job.name));
        }
        if job.event_mask.is_empty() {
            warn!(
                job = %job.name,
                "`events` contains no recognized token; job will never trigger"
            );
        }
        if job.autoadd && !job.recursive {
            warn!(
                job = %job.name,
                "`autoadd` has no effect without `recursive`"
            );
        }
    }

    Ok(())
}
