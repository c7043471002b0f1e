// src/registry/snapshot.rs

//! On-disk snapshot of the registry: a pretty-printed JSON array of
//! program identifiers, in registry order.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::errors::{Result, RunkeeperError};
use crate::fs::FileSystem;

/// Load the persisted program list.
///
/// A missing snapshot is an empty registry. A snapshot that exists but does
/// not parse is an error; callers treat it as fatal at startup.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>> {
    if !fs.exists(path) {
        debug!(path = %path.display(), "no registry snapshot; starting empty");
        return Ok(Vec::new());
    }

    let contents = fs.read_to_string(path)?;
    let programs: Vec<String> =
        serde_json::from_str(&contents).map_err(|source| RunkeeperError::SnapshotError {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), count = programs.len(), "registry snapshot loaded");
    Ok(programs)
}

/// Atomically overwrite the snapshot with `programs`.
pub fn save(fs: &dyn FileSystem, path: &Path, programs: &[String]) -> anyhow::Result<()> {
    let mut buf = serde_json::to_string_pretty(programs).context("serializing registry")?;
    buf.push('\n');
    fs.write_atomic(path, buf.as_bytes())
        .with_context(|| format!("saving registry snapshot {}", path.display()))?;
    debug!(path = %path.display(), count = programs.len(), "registry snapshot saved");
    Ok(())
}
