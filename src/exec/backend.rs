// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The scheduler talks to an `ExecutorBackend` instead of spawning
//! processes itself, so tests can swap in a fake that records which
//! programs ran and in which order.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::exec::RunOutcome;
use crate::exec::runner::run_program;

/// Trait abstracting how one program is executed.
pub trait ExecutorBackend: Send + Sync {
    /// Run `program` to completion. Must not fail; problems are reported
    /// through the returned outcome.
    fn run<'a>(
        &'a self,
        program: &'a str,
    ) -> Pin<Box<dyn Future<Output = RunOutcome> + Send + 'a>>;
}

/// Real executor backend: spawns the program and captures its output
/// under `output_root`.
#[derive(Debug, Clone)]
pub struct RealExecutorBackend {
    output_root: PathBuf,
}

impl RealExecutorBackend {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn run<'a>(
        &'a self,
        program: &'a str,
    ) -> Pin<Box<dyn Future<Output = RunOutcome> + Send + 'a>> {
        Box::pin(run_program(program, &self.output_root))
    }
}
