// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`output`] derives the captured output record path for a program.
//! - [`runner`] launches one program with stdout/stderr appended to that
//!   record and waits for it.
//! - [`backend`] provides the `ExecutorBackend` trait the scheduler drives,
//!   with `RealExecutorBackend` for production.

pub mod backend;
pub mod output;
pub mod runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use runner::run_program;

/// Result of one program execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// Non-zero exit; `-1` when terminated by a signal.
    Failed(i32),
    /// The program could not be started (or its output record opened).
    LaunchFailed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}
