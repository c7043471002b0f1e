// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 12345;
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_PROGRAMS_FILE: &str = "programs.json";
pub const DEFAULT_PROGRAMS_DIR: &str = "programs";

/// Configuration as read from a TOML file, before defaults and validation.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 12345
///
/// [scheduler]
/// interval_secs = 10
///
/// [storage]
/// programs_file = "programs.json"
/// programs_dir = "programs"
/// ```
///
/// All sections and keys are optional. Command-line flags are layered on
/// top of this (see [`crate::config::loader::apply_overrides`]) before it
/// is turned into a [`ServerConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub storage: StorageSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerSection {
    /// Pause between the end of one batch and the start of the next.
    pub interval_secs: Option<u64>,
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Registry snapshot (JSON array of program identifiers).
    pub programs_file: Option<String>,

    /// Root directory holding one captured output record per program.
    pub programs_dir: Option<String>,
}

/// Fully-resolved, validated service configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    interval: Duration,
    programs_file: PathBuf,
    programs_dir: PathBuf,
}

impl ServerConfig {
    pub(crate) fn new_unchecked(
        host: String,
        port: u16,
        interval: Duration,
        programs_file: PathBuf,
        programs_dir: PathBuf,
    ) -> Self {
        Self {
            host,
            port,
            interval,
            programs_file,
            programs_dir,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn programs_file(&self) -> &PathBuf {
        &self.programs_file
    }

    pub fn programs_dir(&self) -> &PathBuf {
        &self.programs_dir
    }
}
