// src/config/mod.rs

//! Configuration loading and validation for runkeeper.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer CLI flags on top (`loader.rs`).
//! - Apply defaults and validate into a `ServerConfig` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_overrides, load_from_path, resolve};
pub use model::{RawConfigFile, SchedulerSection, ServerConfig, ServerSection, StorageSection};
