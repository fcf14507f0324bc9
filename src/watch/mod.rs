// src/watch/mod.rs

//! Event watching and routing.
//!
//! This module is responsible for:
//! - Translating `events` config tokens into a composite mask (`mask.rs`).
//! - Per-job include/exclude extension filtering (`filter.rs`).
//! - Owning one watch subscription plus one delivery task per job and turning
//!   raw filesystem events into command executions (`session.rs`).
//!
//! It does **not** know about daemonization or pidfiles; the supervisor
//! starts and stops sessions around it.

pub mod filter;
pub mod mask;
pub mod session;

use std::path::PathBuf;

pub use filter::ExtensionFilter;
pub use mask::{classify, parse_events, EventMask};
pub use session::{prune_excluded, spawn_session, SessionHandle};

/// One delivered filesystem occurrence, as consumed by the command templater.
///
/// Created per raw event, consumed by exactly one filter + dispatch pass,
/// then discarded.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// Directory whose watch produced the event.
    pub watched: PathBuf,
    /// Full path of the affected entry.
    pub filename: PathBuf,
    /// Textual event name, same vocabulary as the `events` config option.
    pub tflags: &'static str,
    /// Numeric event mask bits.
    pub nflags: u32,
    /// Identifier pairing the two halves of a rename, when the backend
    /// provides one.
    pub cookie: Option<usize>,
}
