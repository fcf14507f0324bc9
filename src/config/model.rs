// src/config/model.rs

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::watch::EventMask;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [default]
/// logfile = "/var/log/watcherd.log"
/// pidfile = "/var/run/watcherd.pid"
///
/// [job.downloads]
/// watch = "/home/user/downloads"
/// events = "create,move"
/// recursive = true
/// autoadd = true
/// command = "handle-download $filename $tflags"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// `[default]`: supervisor paths. Required.
    pub default: DefaultSection,

    /// All jobs from `[job.<name>]`. Keys are the job names.
    #[serde(default)]
    pub job: BTreeMap<String, JobSection>,
}

/// `[default]` section: paths the supervisor needs.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSection {
    pub logfile: PathBuf,
    pub pidfile: PathBuf,
}

/// `[job.<name>]` section, one configured watch-plus-command unit.
///
/// The list-valued options are comma-separated strings, matching the
/// operator-facing format; they are split and resolved in the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    /// Directory path to subscribe.
    pub watch: PathBuf,

    /// Comma-separated event-kind tokens, e.g. `"create,write_close,move"`.
    pub events: String,

    /// Subscribe to subdirectories too.
    #[serde(default)]
    pub recursive: bool,

    /// Auto-subscribe subdirectories created after startup.
    #[serde(default)]
    pub autoadd: bool,

    /// Comma-separated path prefixes pruned from the watch set. Empty means
    /// nothing is pruned.
    #[serde(default)]
    pub excluded: String,

    /// Comma-separated suffixes (or the `video` token). Empty means no
    /// restriction.
    #[serde(default)]
    pub include_extensions: String,

    /// Comma-separated suffixes. Empty means no restriction.
    #[serde(default)]
    pub exclude_extensions: String,

    /// Command template, see the templater for placeholder syntax.
    pub command: String,
}

/// Fully resolved configuration, ready for the supervisor.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub daemon: DaemonSettings,
    pub jobs: Vec<JobConfig>,
}

/// Supervisor paths from `[default]`.
#[derive(Debug, Clone)]
pub struct DaemonSettings {
    pub logfile: PathBuf,
    pub pidfile: PathBuf,
}

/// One resolved job. Immutable once loaded; lives for the process lifetime.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub name: String,
    pub watch_path: PathBuf,
    pub recursive: bool,
    pub autoadd: bool,
    pub event_mask: EventMask,
    pub excluded: Option<BTreeSet<PathBuf>>,
    pub include_extensions: Option<BTreeSet<String>>,
    pub exclude_extensions: Option<BTreeSet<String>>,
    pub command: String,
}
