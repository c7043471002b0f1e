// src/server/listener.rs

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::server::ServiceContext;
use crate::server::handler::handle_connection;

/// Owns the accepting socket; every accepted connection gets its own task.
pub struct Listener {
    listener: TcpListener,
    ctx: Arc<ServiceContext>,
}

impl Listener {
    pub async fn bind(addr: &str, ctx: Arc<ServiceContext>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding listener on {addr}"))?;
        Ok(Self { listener, ctx })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("reading listener address")
    }

    /// Accept until `shutdown` resolves. Handlers already running are left
    /// alone; dropping the socket only stops new connections.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested; no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!(peer = %peer, "client connected");
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(handle_connection(stream, peer.to_string(), ctx));
                    }
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        // Back off so a persistent error (e.g. fd exhaustion)
                        // does not spin.
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                }
            }
        }
    }
}
