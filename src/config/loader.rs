// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::ServeArgs;
use crate::config::model::{RawConfigFile, ServerConfig};
use crate::errors::{Result, RunkeeperError};

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; defaults and validation happen
/// in `ServerConfig::try_from`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Resolve the effective service configuration for `serve`.
///
/// - An explicit `--config` must exist.
/// - Without `--config`, [`default_config_path`] is read when present and
///   silently skipped otherwise.
/// - Command-line flags override file values; missing values take the
///   built-in defaults.
pub fn resolve(args: &ServeArgs) -> Result<ServerConfig> {
    let raw = match &args.config {
        Some(path) => load_from_path(path).map_err(|e| {
            RunkeeperError::ConfigError(format!("cannot load config {path:?}: {e}"))
        })?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_from_path(&path)?
            } else {
                debug!(path = ?path, "no config file; using flags and defaults");
                RawConfigFile::default()
            }
        }
    };

    ServerConfig::try_from(apply_overrides(raw, args))
}

/// Layer command-line flags over values read from the config file.
pub fn apply_overrides(mut raw: RawConfigFile, args: &ServeArgs) -> RawConfigFile {
    if let Some(host) = &args.host {
        raw.server.host = Some(host.clone());
    }
    if let Some(port) = args.port {
        raw.server.port = Some(port);
    }
    if let Some(interval) = args.interval {
        raw.scheduler.interval_secs = Some(interval);
    }
    if let Some(file) = &args.programs_file {
        raw.storage.programs_file = Some(file.clone());
    }
    if let Some(dir) = &args.programs_dir {
        raw.storage.programs_dir = Some(dir.clone());
    }
    raw
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Runkeeper.toml")
}
