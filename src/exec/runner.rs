// src/exec/runner.rs

//! Runs one program to completion with its output appended to the
//! program's captured output record.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::exec::RunOutcome;
use crate::exec::output::output_file;

/// Run `program`, appending stdout and stderr to its output record under
/// `output_root`.
///
/// Never fails: launch and IO errors are logged with the program and
/// reported as [`RunOutcome::LaunchFailed`].
pub async fn run_program(program: &str, output_root: &Path) -> RunOutcome {
    match run_program_inner(program, output_root).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let detail = format!("{err:#}");
            error!(program = %program, error = %detail, "program launch failed");
            RunOutcome::LaunchFailed(detail)
        }
    }
}

async fn run_program_inner(program: &str, output_root: &Path) -> Result<RunOutcome> {
    let record = output_file(output_root, program);
    if let Some(dir) = record.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating output dir {}", dir.display()))?;
    }

    let stdout = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&record)
        .await
        .with_context(|| format!("opening output record {}", record.display()))?
        .into_std()
        .await;
    let stderr = stdout
        .try_clone()
        .with_context(|| format!("duplicating handle for {}", record.display()))?;

    info!(program = %program, output = %record.display(), "starting program");

    // No kill_on_drop: a child outlives an aborted scheduler on shutdown.
    let mut child = Command::new(launch_path(program))
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .with_context(|| format!("spawning program '{program}'"))?;

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for program '{program}'"))?;

    let code = status.code().unwrap_or(-1);
    if status.success() {
        info!(program = %program, exit_code = code, "program exited");
        Ok(RunOutcome::Success)
    } else {
        warn!(program = %program, exit_code = code, "program exited unsuccessfully");
        Ok(RunOutcome::Failed(code))
    }
}

/// A bare name like `job.sh` refers to a file in the working directory,
/// not to something on `PATH`.
fn launch_path(program: &str) -> PathBuf {
    let path = Path::new(program);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Path::new(".").join(path),
        _ => path.to_path_buf(),
    }
}
