// src/watch/session.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::JobConfig;
use crate::exec;
use crate::watch::EventRecord;
use crate::watch::filter::ExtensionFilter;
use crate::watch::mask::{EventMask, classify};

/// Handle for one running job watch session.
///
/// The watcher itself lives inside the delivery task so the task can extend
/// the subscription (auto-add); stopping the handle aborts the task, which
/// drops the watcher and ends the subscription.
pub struct SessionHandle {
    name: String,
    task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("name", &self.name)
            .finish()
    }
}

impl SessionHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop delivering events for this job.
    pub fn stop(self) {
        self.task.abort();
        debug!(job = %self.name, "watch session stopped");
    }
}

/// Build and start the watch session for one job.
///
/// Registration strategy: a non-recursive job watches its root directory
/// only. A recursive job registers every directory under the root
/// individually; that per-directory watch set is what the excluded-prefix
/// prune operates on before the session starts listening. Subdirectories
/// created in, or moved into, the tree are registered on the fly when
/// `autoadd` is set.
///
/// Each session owns its own watcher, filter and delivery task; jobs share
/// no mutable state.
pub fn spawn_session(job: JobConfig) -> Result<SessionHandle> {
    let job = Arc::new(job);
    let filter = ExtensionFilter::new(
        job.include_extensions.clone(),
        job.exclude_extensions.clone(),
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("watcherd: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("watcherd: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut subscription = BTreeSet::new();
    if job.recursive {
        collect_watch_dirs(&job.watch_path, &mut subscription)?;
    } else {
        subscription.insert(job.watch_path.clone());
    }

    if let Some(excluded) = &job.excluded {
        for dir in prune_excluded(&mut subscription, excluded) {
            debug!(job = %job.name, ?dir, "excluded dir");
        }
    }

    for dir in &subscription {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {dir:?} for job '{}'", job.name))?;
    }

    info!(
        job = %job.name,
        path = ?job.watch_path,
        watches = subscription.len(),
        "watch session started"
    );

    let name = job.name.clone();
    let task = tokio::spawn(async move {
        // The watcher must live here for the subscription to stay alive.
        let mut watcher = watcher;
        while let Some(event) = event_rx.recv().await {
            handle_event(&mut watcher, &mut subscription, &job, &filter, &event);
        }
        debug!(job = %job.name, "event channel closed; session loop ended");
    });

    Ok(SessionHandle { name, task })
}

/// One filter + dispatch pass over a delivered raw event.
fn handle_event(
    watcher: &mut RecommendedWatcher,
    subscription: &mut BTreeSet<PathBuf>,
    job: &JobConfig,
    filter: &ExtensionFilter,
    event: &Event,
) {
    let cookie = event.tracker();

    for (kind, path) in classify_event(event, &job.watch_path) {
        maybe_autoadd(watcher, subscription, job, kind, &path);

        // The notify subscription carries no kernel-side mask, so the job
        // mask is applied here, at the delivery boundary. Every kind inside
        // the mask dispatches.
        if !job.event_mask.contains(kind) {
            debug!(
                job = %job.name,
                kind = kind.token_name(),
                ?path,
                "event kind outside job mask"
            );
            continue;
        }

        info!(job = %job.name, kind = kind.token_name(), ?path, "event");

        if !filter.include(&path.to_string_lossy()) {
            continue;
        }

        // For events on a watched root itself (self_delete, self_move) the
        // watched directory is that root, not its never-watched parent.
        let watched = if path == job.watch_path {
            path.clone()
        } else {
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| job.watch_path.clone())
        };

        let record = EventRecord {
            watched,
            filename: path,
            tflags: kind.token_name(),
            nflags: kind.bits(),
            cookie,
        };

        let command = exec::render(&job.command, &record);
        exec::spawn_command(&job.name, &command);
    }
}

/// Resolve a raw event into (atomic kind, path) pairs.
///
/// A paired rename carries both sides in one event and splits into a
/// `move_from` for the old path and a `move_to` for the new one. Catch-all
/// kinds the backend cannot attribute are debug-logged and skipped.
pub fn classify_event(event: &Event, root: &Path) -> Vec<(EventMask, PathBuf)> {
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if let [from, to] = event.paths.as_slice() {
            return vec![
                (EventMask::MOVED_FROM, from.clone()),
                (EventMask::MOVED_TO, to.clone()),
            ];
        }
    }

    event
        .paths
        .iter()
        .filter_map(|path| match classify(event.kind, path == root) {
            Some(kind) => Some((kind, path.clone())),
            None => {
                debug!(?path, kind = ?event.kind, "unclassifiable event kind");
                None
            }
        })
        .collect()
}

/// Remove every registered directory that begins with an excluded prefix.
///
/// The prune set is computed first and the removals applied afterwards.
/// Returns the pruned paths.
pub fn prune_excluded(
    dirs: &mut BTreeSet<PathBuf>,
    excluded: &BTreeSet<PathBuf>,
) -> Vec<PathBuf> {
    let pruned: Vec<PathBuf> = dirs
        .iter()
        .filter(|dir| excluded.iter().any(|prefix| dir.starts_with(prefix)))
        .cloned()
        .collect();

    for dir in &pruned {
        dirs.remove(dir);
    }
    pruned
}

/// Extend a recursive, auto-adding subscription to a subdirectory that was
/// created in, or moved into, the watched tree. Excluded prefixes stay
/// pruned.
fn maybe_autoadd(
    watcher: &mut RecommendedWatcher,
    subscription: &mut BTreeSet<PathBuf>,
    job: &JobConfig,
    kind: EventMask,
    path: &Path,
) {
    if kind != EventMask::CREATE && kind != EventMask::MOVED_TO {
        return;
    }
    if !job.recursive || !job.autoadd {
        return;
    }
    if !path.is_dir() {
        return;
    }
    if let Some(excluded) = &job.excluded {
        if excluded.iter().any(|prefix| path.starts_with(prefix)) {
            return;
        }
    }
    if !subscription.insert(path.to_path_buf()) {
        return;
    }

    match watcher.watch(path, RecursiveMode::NonRecursive) {
        Ok(()) => {
            debug!(job = %job.name, dir = ?path, "auto-added watch for new subdirectory");
        }
        Err(err) => {
            warn!(job = %job.name, dir = ?path, error = %err, "failed to auto-add watch");
            subscription.remove(path);
        }
    }
}

fn collect_watch_dirs(root: &Path, out: &mut BTreeSet<PathBuf>) -> Result<()> {
    out.insert(root.to_path_buf());
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("listing watch directory {root:?}"))?;
    for entry in entries {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() && !file_type.is_symlink() {
            collect_watch_dirs(&entry.path(), out)?;
        }
    }
    Ok(())
}
