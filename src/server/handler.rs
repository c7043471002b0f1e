// src/server/handler.rs

//! Per-connection request processing.

use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::exec::output::output_file;
use crate::server::ServiceContext;
use crate::server::protocol::{
    MAX_REQUEST_BYTES, OUTPUT_NOT_FOUND, PROGRAM_ADDED, Request, parse_request, rejection_reply,
};

/// Serve one client connection until it closes, sends a FETCH, or sends
/// something unparseable.
///
/// REGISTER keeps the connection open for further requests. FETCH and
/// invalid input end it. Errors are logged here and never escape.
pub async fn handle_connection<S>(stream: S, peer: String, ctx: Arc<ServiceContext>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    debug!(peer = %peer, "connection accepted");
    match handle_connection_inner(stream, &peer, &ctx).await {
        Ok(()) => debug!(peer = %peer, "connection closed"),
        Err(err) => {
            let detail = format!("{err:#}");
            warn!(peer = %peer, error = %detail, "connection ended with error");
        }
    }
}

async fn handle_connection_inner<S>(mut stream: S, peer: &str, ctx: &Arc<ServiceContext>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; MAX_REQUEST_BYTES];

    loop {
        let n = stream.read(&mut buf).await.context("reading request")?;
        if n == 0 {
            return Ok(());
        }

        let request = match parse_request(&buf[..n]) {
            Ok(request) => request,
            Err(e) => {
                warn!(peer = %peer, error = %e, "invalid request; closing connection");
                return Ok(());
            }
        };

        match request {
            Request::Register(program) => {
                let reply = register(ctx, program).await?;
                stream
                    .write_all(reply.as_bytes())
                    .await
                    .context("writing register reply")?;
                stream.flush().await?;
            }
            Request::Fetch(program) => {
                fetch(&mut stream, ctx, &program).await?;
                stream.shutdown().await.context("closing after fetch")?;
                return Ok(());
            }
        }
    }
}

async fn register(ctx: &Arc<ServiceContext>, program: String) -> Result<&'static str> {
    info!(program = %program, "register requested");

    // The registry persists under a blocking mutex; keep that off the
    // async workers.
    let registry = Arc::clone(&ctx.registry);
    let outcome = tokio::task::spawn_blocking(move || registry.append(&program))
        .await
        .context("registration task failed")?;

    Ok(match outcome {
        Ok(()) => PROGRAM_ADDED,
        Err(reason) => rejection_reply(reason),
    })
}

async fn fetch<S>(stream: &mut S, ctx: &ServiceContext, program: &str) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let record = output_file(&ctx.output_root, program);

    let mut file = match tokio::fs::File::open(&record).await {
        Ok(file) => file,
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                info!(program = %program, "no captured output");
            } else {
                warn!(program = %program, path = %record.display(), error = %e, "cannot open output record");
            }
            stream
                .write_all(OUTPUT_NOT_FOUND.as_bytes())
                .await
                .context("writing not-found reply")?;
            return Ok(());
        }
    };

    let sent = tokio::io::copy(&mut file, stream)
        .await
        .with_context(|| format!("sending output of '{program}'"))?;
    info!(program = %program, bytes = sent, "output sent");
    Ok(())
}
