// tests/execution_cycle.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use runkeeper::exec::{RealExecutorBackend, RunOutcome};
use runkeeper::fs::RealFileSystem;
use runkeeper::registry::Registry;
use runkeeper::scheduler::Scheduler;
use runkeeper_test_utils::fake_executor::FakeExecutor;

type TestResult = Result<(), Box<dyn Error>>;

fn registry_with(dir: &std::path::Path, programs: &[String]) -> Arc<Registry> {
    Arc::new(Registry::with_programs(
        Arc::new(RealFileSystem),
        dir.join("programs.json"),
        programs.to_vec(),
    ))
}

#[cfg(unix)]
#[tokio::test]
async fn each_cycle_appends_to_every_record() -> TestResult {
    use runkeeper_test_utils::scripts::{output_path, write_script};

    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("outputs");
        let a = write_script(dir.path(), "a.sh", "echo alpha");
        let b = write_script(dir.path(), "b.sh", "echo beta 1>&2\nexit 3");
        let silent = write_script(dir.path(), "silent.sh", "true");

        let registry = registry_with(dir.path(), &[a.clone(), b.clone(), silent.clone()]);
        let mut scheduler = Scheduler::new(
            registry,
            RealExecutorBackend::new(&out),
            Duration::from_secs(60),
        );

        let first = scheduler.run_cycle().await;
        assert_eq!(
            first.results,
            vec![
                (a.clone(), RunOutcome::Success),
                (b.clone(), RunOutcome::Failed(3)),
                (silent.clone(), RunOutcome::Success),
            ]
        );
        let a_len = std::fs::metadata(output_path(&out, &a))?.len();
        let b_len = std::fs::metadata(output_path(&out, &b))?.len();
        assert!(a_len > 0 && b_len > 0);
        assert_eq!(std::fs::metadata(output_path(&out, &silent))?.len(), 0);

        scheduler.run_cycle().await;
        assert!(std::fs::metadata(output_path(&out, &a))?.len() > a_len);
        assert!(std::fs::metadata(output_path(&out, &b))?.len() > b_len);
        assert_eq!(
            std::fs::read_to_string(output_path(&out, &a))?,
            "alpha\nalpha\n"
        );

        Ok(())
    })
    .await
}

#[cfg(unix)]
#[tokio::test]
async fn program_deleted_after_registration_does_not_stop_the_batch() -> TestResult {
    use runkeeper_test_utils::scripts::{output_path, write_script};

    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("outputs");
        let gone = write_script(dir.path(), "gone.sh", "echo never");
        let after = write_script(dir.path(), "after.sh", "echo still here");

        let registry = registry_with(dir.path(), &[]);
        assert_eq!(registry.append(&gone), Ok(()));
        assert_eq!(registry.append(&after), Ok(()));
        std::fs::remove_file(&gone)?;

        let mut scheduler = Scheduler::new(
            registry,
            RealExecutorBackend::new(&out),
            Duration::from_secs(60),
        );
        let report = scheduler.run_cycle().await;

        assert!(matches!(report.results[0].1, RunOutcome::LaunchFailed(_)));
        assert_eq!(report.results[1], (after.clone(), RunOutcome::Success));
        assert_eq!(
            std::fs::read_to_string(output_path(&out, &after))?,
            "still here\n"
        );

        Ok(())
    })
    .await
}

#[tokio::test]
async fn loop_keeps_cycling_with_fresh_snapshots() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let registry = registry_with(dir.path(), &["first".to_string()]);
        let executor = FakeExecutor::new();

        let scheduler = Scheduler::new(
            Arc::clone(&registry),
            executor.clone(),
            Duration::from_millis(20),
        );
        let handle = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(60)).await;
        registry.seed(vec!["second".to_string()]);
        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.abort();

        let executed = executor.executed();
        let firsts = executed.iter().filter(|p| *p == "first").count();
        let seconds = executed.iter().filter(|p| *p == "second").count();
        assert!(firsts >= 2, "expected repeated cycles, got {executed:?}");
        assert!(seconds >= 1, "late program never ran: {executed:?}");
        assert_eq!(executed[0], "first");

        Ok(())
    })
    .await
}

#[tokio::test]
async fn preset_failures_are_reported_per_program() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let registry = registry_with(dir.path(), &["ok".to_string(), "bad".to_string()]);
        let executor = FakeExecutor::new().with_outcome("bad", RunOutcome::Failed(2));

        let mut scheduler = Scheduler::new(registry, executor.clone(), Duration::ZERO);
        let report = scheduler.run_cycle().await;

        assert_eq!(report.failures(), 1);
        assert_eq!(executor.executed(), vec!["ok", "bad"]);
        Ok(())
    })
    .await
}
