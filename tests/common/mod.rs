#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use runkeeper::client::{Client, FetchOutcome};
use runkeeper::fs::RealFileSystem;
use runkeeper::registry::Registry;
use runkeeper::service::Service;
use runkeeper_test_utils::builders::ServerConfigBuilder;

pub use runkeeper_test_utils::{init_tracing, with_timeout};

/// A service running on an ephemeral port, with its snapshot and output
/// records under a test directory.
pub struct RunningService {
    pub addr: SocketAddr,
    pub registry: Arc<Registry>,
    pub snapshot_path: PathBuf,
    pub output_root: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl RunningService {
    pub async fn client(&self) -> Client {
        Client::connect(self.addr.to_string())
            .await
            .expect("connect to test service")
    }

    /// Trigger the same path Ctrl-C takes and wait for `run` to return.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await?
    }
}

pub async fn start_service(dir: &Path, interval_secs: u64) -> RunningService {
    let cfg = ServerConfigBuilder::in_dir(dir)
        .interval_secs(interval_secs)
        .build();
    let snapshot_path = cfg.programs_file().clone();
    let output_root = cfg.programs_dir().clone();

    let registry = Arc::new(
        Registry::open(Arc::new(RealFileSystem), snapshot_path.clone()).expect("open registry"),
    );
    let service = Service::bind(cfg, Arc::clone(&registry))
        .await
        .expect("bind service");
    let addr = service.local_addr().expect("local addr");

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(service.run(async move {
        let _ = rx.await;
    }));

    RunningService {
        addr,
        registry,
        snapshot_path,
        output_root,
        shutdown: Some(tx),
        handle,
    }
}

/// Poll FETCH until the output satisfies `done`, or give up after `limit`.
pub async fn fetch_until<P>(client: &mut Client, program: &str, limit: Duration, done: P) -> FetchOutcome
where
    P: Fn(&[u8]) -> bool,
{
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        let outcome = client.fetch(program).await.expect("fetch");
        if let FetchOutcome::Output(ref body) = outcome {
            if done(body) {
                return outcome;
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return outcome;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
