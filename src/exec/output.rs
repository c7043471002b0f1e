// src/exec/output.rs

//! Where a program's captured output lives.
//!
//! Layout: `<root>/<stem>-<hash>/<stem>_output.txt`, where `stem` is the
//! last path component of the identifier and `hash` is a short blake3
//! digest of the full identifier. The directory name never contains a
//! separator or `..`, so the record always stays under `root`, and two
//! identifiers sharing a file name (`a/run.sh`, `b/run.sh`) get distinct
//! records.

use std::path::{Path, PathBuf};

const OUTPUT_SUFFIX: &str = "_output.txt";
const HASH_PREFIX_LEN: usize = 16;

/// Last path component of `program`, or `"program"` when it has none
/// (`"/"`, `".."`, empty).
pub fn program_stem(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "program".to_string())
}

pub fn output_dir(root: &Path, program: &str) -> PathBuf {
    let hash = blake3::hash(program.as_bytes());
    let hex = hash.to_hex();
    root.join(format!(
        "{}-{}",
        program_stem(program),
        &hex.as_str()[..HASH_PREFIX_LEN]
    ))
}

/// The captured output record for `program`.
pub fn output_file(root: &Path, program: &str) -> PathBuf {
    output_dir(root, program).join(output_file_name(program))
}

/// File name (without directory) of the record, also used by the client
/// when saving a fetched copy.
pub fn output_file_name(program: &str) -> String {
    format!("{}{OUTPUT_SUFFIX}", program_stem(program))
}
