use std::path::Path;

use runkeeper::config::{RawConfigFile, ServerConfig};

/// Builder for `ServerConfig` to simplify test setup.
///
/// Defaults to an ephemeral port on `127.0.0.1` and a one second interval.
pub struct ServerConfigBuilder {
    config: RawConfigFile,
}

impl ServerConfigBuilder {
    /// Snapshot and output records live under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let mut config = RawConfigFile::default();
        config.server.host = Some("127.0.0.1".to_string());
        config.server.port = Some(0);
        config.scheduler.interval_secs = Some(1);
        config.storage.programs_file =
            Some(dir.join("programs.json").to_string_lossy().into_owned());
        config.storage.programs_dir = Some(dir.join("outputs").to_string_lossy().into_owned());
        Self { config }
    }

    pub fn interval_secs(mut self, secs: u64) -> Self {
        self.config.scheduler.interval_secs = Some(secs);
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
