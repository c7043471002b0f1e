use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use runkeeper::exec::{ExecutorBackend, RunOutcome};

/// A fake executor that:
/// - records which programs were "run", in order
/// - reports a preset outcome per program (default `Success`).
#[derive(Clone, Default)]
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<String>>>,
    outcomes: Arc<Mutex<HashMap<String, RunOutcome>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, program: &str, outcome: RunOutcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(program.to_string(), outcome);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn run<'a>(
        &'a self,
        program: &'a str,
    ) -> Pin<Box<dyn Future<Output = RunOutcome> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(program.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .get(program)
                .cloned()
                .unwrap_or(RunOutcome::Success)
        })
    }
}
