// src/config/loader.rs

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::config::model::{
    ConfigFile, DaemonSettings, JobConfig, JobSection, WatcherConfig,
};
use crate::config::validate::validate_config;
use crate::media::VIDEO_EXTENSIONS;
use crate::watch::parse_events;

/// Load a configuration file from a given path and return the raw
/// `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** resolve jobs or
/// run semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {path:?}"))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {path:?}"))?;

    Ok(config)
}

/// Load, resolve and validate a configuration.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML (from `path`, or the first readable default location).
/// - Splits the comma-separated list options, expands the `video` token and
///   translates event tokens into a mask.
/// - Validates the result (at least one job, non-empty commands, ...).
pub fn load_and_validate(path: Option<&Path>) -> Result<WatcherConfig> {
    let raw = match path {
        Some(path) => load_from_path(path)?,
        None => load_from_default_paths()?,
    };
    let resolved = resolve(raw)?;
    validate_config(&resolved)?;
    Ok(resolved)
}

/// Default config locations, probed in order when `-c` is not given. The
/// first existing file wins; later locations are not merged in.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/watcherd.toml")];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".watcherd.toml"));
    }
    paths
}

fn load_from_default_paths() -> Result<ConfigFile> {
    let candidates = default_config_paths();
    for candidate in &candidates {
        if candidate.is_file() {
            return load_from_path(candidate);
        }
    }
    Err(anyhow!(
        "no config file found (looked for {candidates:?}); try the -c parameter"
    ))
}

/// Resolve the raw serde model into runtime types.
fn resolve(raw: ConfigFile) -> Result<WatcherConfig> {
    let mut jobs = Vec::with_capacity(raw.job.len());
    for (name, section) in raw.job {
        jobs.push(resolve_job(name, section)?);
    }

    Ok(WatcherConfig {
        daemon: DaemonSettings {
            logfile: raw.default.logfile,
            pidfile: raw.default.pidfile,
        },
        jobs,
    })
}

fn resolve_job(name: String, section: JobSection) -> Result<JobConfig> {
    let event_mask = parse_events(section.events.split(','));

    let excluded = split_set(&section.excluded)
        .map(|set| set.into_iter().map(PathBuf::from).collect());
    let include_extensions =
        split_set(&section.include_extensions).map(|set| expand_video(&name, set));
    let exclude_extensions = split_set(&section.exclude_extensions);

    info!(job = %name, watch = ?section.watch, "configured job");

    Ok(JobConfig {
        name,
        watch_path: section.watch,
        recursive: section.recursive,
        autoadd: section.autoadd,
        event_mask,
        excluded,
        include_extensions,
        exclude_extensions,
        command: section.command,
    })
}

/// Split a comma-separated option into a set. Entries are trimmed; empty
/// entries are dropped. An option that yields no entries means "no
/// restriction" and resolves to `None`.
fn split_set(raw: &str) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if set.is_empty() { None } else { Some(set) }
}

/// Replace the literal `video` token with the known video extension list.
///
/// If the expansion contributes nothing the job is flagged here, at load
/// time, since its include set would then match nothing from that token.
fn expand_video(job: &str, mut set: BTreeSet<String>) -> BTreeSet<String> {
    if set.remove("video") {
        if VIDEO_EXTENSIONS.is_empty() {
            warn!(
                job,
                "video extension list is unavailable; the `video` token matches nothing"
            );
        }
        set.extend(VIDEO_EXTENSIONS.iter().map(|s| s.to_string()));
    }
    set
}
