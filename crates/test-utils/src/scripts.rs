use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `sh` script named `name` into `dir` and return its
/// path as a string suitable for registration.
pub fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    set_mode(&path, 0o755);
    path.to_string_lossy().into_owned()
}

/// Write a regular file without any execute bit.
pub fn write_plain_file(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write file");
    set_mode(&path, 0o644);
    path.to_string_lossy().into_owned()
}

pub fn output_path(output_root: &Path, program: &str) -> PathBuf {
    runkeeper::exec::output::output_file(output_root, program)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}
