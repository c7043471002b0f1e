// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    DEFAULT_HOST, DEFAULT_INTERVAL_SECS, DEFAULT_PORT, DEFAULT_PROGRAMS_DIR,
    DEFAULT_PROGRAMS_FILE, RawConfigFile, ServerConfig,
};
use crate::errors::{Result, RunkeeperError};

impl TryFrom<RawConfigFile> for ServerConfig {
    type Error = crate::errors::RunkeeperError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let host = raw
            .server
            .host
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = raw.server.port.unwrap_or(DEFAULT_PORT);
        let interval_secs = raw
            .scheduler
            .interval_secs
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        let programs_file = raw
            .storage
            .programs_file
            .unwrap_or_else(|| DEFAULT_PROGRAMS_FILE.to_string());
        let programs_dir = raw
            .storage
            .programs_dir
            .unwrap_or_else(|| DEFAULT_PROGRAMS_DIR.to_string());

        validate_host(&host)?;
        validate_interval(interval_secs)?;
        validate_path("[storage].programs_file", &programs_file)?;
        validate_path("[storage].programs_dir", &programs_dir)?;

        Ok(ServerConfig::new_unchecked(
            host,
            port,
            Duration::from_secs(interval_secs),
            PathBuf::from(programs_file),
            PathBuf::from(programs_dir),
        ))
    }
}

fn validate_host(host: &str) -> Result<()> {
    if host.trim().is_empty() {
        return Err(RunkeeperError::ConfigError(
            "[server].host must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_interval(secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(RunkeeperError::ConfigError(
            "[scheduler].interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_path(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RunkeeperError::ConfigError(format!(
            "{key} must not be empty"
        )));
    }
    Ok(())
}
