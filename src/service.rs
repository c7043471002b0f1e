// src/service.rs

//! Wires the registry, scheduler and listener into one running service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::exec::RealExecutorBackend;
use crate::registry::Registry;
use crate::scheduler::Scheduler;
use crate::server::{Listener, ServiceContext};

pub struct Service {
    config: ServerConfig,
    registry: Arc<Registry>,
    listener: Listener,
}

impl Service {
    /// Bind the listening socket. Nothing runs until [`Service::run`].
    pub async fn bind(config: ServerConfig, registry: Arc<Registry>) -> Result<Self> {
        let ctx = Arc::new(ServiceContext::new(
            Arc::clone(&registry),
            config.programs_dir().clone(),
        ));
        let listener = Listener::bind(&config.bind_addr(), ctx).await?;
        Ok(Self {
            config,
            registry,
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the scheduler and the accept loop until `shutdown` resolves,
    /// then save the registry.
    ///
    /// The scheduler task is aborted rather than awaited, and running
    /// children and connection handlers are left to finish or die with the
    /// process.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Service {
            config,
            registry,
            listener,
        } = self;

        if let Ok(addr) = listener.local_addr() {
            info!(
                addr = %addr,
                programs = registry.len(),
                interval = ?config.interval(),
                "runkeeper service started"
            );
        }

        let executor = RealExecutorBackend::new(config.programs_dir().clone());
        let scheduler = Scheduler::new(Arc::clone(&registry), executor, config.interval());
        let scheduler_handle = tokio::spawn(scheduler.run());

        listener.run(shutdown).await;

        scheduler_handle.abort();
        let saver = Arc::clone(&registry);
        let saved = tokio::task::spawn_blocking(move || saver.save())
            .await
            .context("registry save task failed")?;
        if saved {
            info!(path = %registry.snapshot_path().display(), "registry saved on shutdown");
        } else {
            warn!("registry could not be saved on shutdown");
        }
        Ok(())
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed the service runs
/// until killed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
