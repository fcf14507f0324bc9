// src/daemon/mod.rs

//! Daemon lifecycle: pidfile, process primitives and the supervisor state
//! machine.
//!
//! - [`pidfile`] derives the four-state daemon status from the pidfile plus
//!   a liveness probe.
//! - [`process`] wraps the OS idioms (double fork, stdio redirection,
//!   signal-and-poll termination) so nothing else has to fork.
//! - [`supervisor`] implements start/stop/restart/debug on top of both.

pub mod pidfile;
pub mod process;
pub mod supervisor;

pub use pidfile::{DaemonStatus, PidFile, PidfileGuard};
pub use supervisor::Supervisor;
