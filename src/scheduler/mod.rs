// src/scheduler/mod.rs

//! Periodic batch execution of every registered program.
//!
//! Each cycle: take a registry snapshot, run every program in it one after
//! the other in registry order, then sleep for the configured interval.
//! Programs registered while a batch is running are picked up by the next
//! snapshot. A hung program blocks the whole loop; there is no timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::exec::{ExecutorBackend, RunOutcome};
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningBatch,
    Sleeping,
}

/// Outcomes of one batch, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub results: Vec<(String, RunOutcome)>,
}

impl CycleReport {
    pub fn programs(&self) -> Vec<&str> {
        self.results.iter().map(|(p, _)| p.as_str()).collect()
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|(_, o)| !o.is_success()).count()
    }
}

pub struct Scheduler<E: ExecutorBackend> {
    registry: Arc<Registry>,
    executor: E,
    interval: Duration,
    state: SchedulerState,
    cycles: u64,
}

impl<E: ExecutorBackend> Scheduler<E> {
    pub fn new(registry: Arc<Registry>, executor: E, interval: Duration) -> Self {
        Self {
            registry,
            executor,
            interval,
            state: SchedulerState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one batch over a fresh registry snapshot. Leaves the scheduler
    /// in `Sleeping`; the caller owns the wait before the next batch.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.state = SchedulerState::RunningBatch;
        self.cycles += 1;

        let programs = self.take_snapshot().await;
        debug!(cycle = self.cycles, count = programs.len(), "batch started");

        let mut report = CycleReport::default();
        for program in programs {
            let outcome = self.executor.run(&program).await;
            if !outcome.is_success() {
                warn!(program = %program, ?outcome, "program run did not succeed");
            }
            report.results.push((program, outcome));
        }

        info!(
            cycle = self.cycles,
            ran = report.results.len(),
            failed = report.failures(),
            "batch finished"
        );
        self.state = SchedulerState::Sleeping;
        report
    }

    // The registry lock can be held across a disk write by a concurrent
    // REGISTER, so the snapshot is taken off the async workers.
    async fn take_snapshot(&self) -> Vec<String> {
        let registry = Arc::clone(&self.registry);
        match tokio::task::spawn_blocking(move || registry.snapshot()).await {
            Ok(programs) => programs,
            Err(e) => {
                warn!(error = %e, "registry snapshot task failed; skipping batch");
                Vec::new()
            }
        }
    }

    /// Batch, sleep, repeat. Only returns when the task is aborted.
    pub async fn run(mut self) {
        info!(interval = ?self.interval, "scheduler started");
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
            self.state = SchedulerState::Idle;
        }
    }
}
