// src/config/mod.rs

//! Configuration loading and validation for watcherd.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the resolved runtime model
//!   (`model.rs`).
//! - Load a config file from disk, split the comma-separated options and
//!   expand the `video` token (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_paths, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, DaemonSettings, DefaultSection, JobConfig, JobSection,
    WatcherConfig,
};
pub use validate::validate_config;
