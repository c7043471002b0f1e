// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface used by the registry.
///
/// Program execution and output capture always hit the real filesystem;
/// this seam only covers snapshot persistence and the registration
/// precondition, which is what tests need to control.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace `path` with `contents` so readers never observe a partial
    /// file.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Regular file with at least one execute bit set.
    fn is_executable(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
        }

        let mut tmp_name = path
            .file_name()
            .with_context(|| format!("snapshot path has no file name {:?}", path))?
            .to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating file {:?}", tmp_path))?;
        file.write_all(contents)
            .with_context(|| format!("writing to file {:?}", tmp_path))?;
        file.sync_all()
            .with_context(|| format!("syncing file {:?}", tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, path)
            .with_context(|| format!("replacing {:?} with {:?}", path, tmp_path))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        match fs::metadata(path) {
            Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    fn is_executable(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_contents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("programs.json");

        RealFileSystem.write_atomic(&path, b"[\"a\"]").unwrap();
        RealFileSystem.write_atomic(&path, b"[\"b\"]").unwrap();

        assert_eq!(RealFileSystem.read_to_string(&path).unwrap(), "[\"b\"]");
        assert!(!dir.path().join("nested").join("programs.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn execute_bit_decides_executability() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!RealFileSystem.is_executable(&path));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(RealFileSystem.is_executable(&path));

        assert!(!RealFileSystem.is_executable(dir.path()));
    }
}
