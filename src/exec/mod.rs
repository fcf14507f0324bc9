// src/exec/mod.rs

//! Command rendering and execution.
//!
//! - [`template`] turns a job's command template plus one event into a
//!   shell-ready string with every substituted value quoted.
//! - [`command`] spawns the rendered string through `sh -c`, fire-and-forget.

pub mod command;
pub mod template;

pub use command::spawn_command;
pub use template::{render, shell_quote};
