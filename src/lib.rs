// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod scheduler;
pub mod server;
pub mod service;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::{CliArgs, Command, ServeArgs};
use crate::fs::{FileSystem, RealFileSystem};
use crate::registry::Registry;
use crate::service::{Service, shutdown_signal};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Serve(serve_args) => serve(serve_args).await,
        Command::Client(client_args) => client::run_interactive(client_args).await,
    }
}

/// `serve`: wires together
/// - config resolution (file + flags)
/// - registry load and command-line seeding
/// - scheduler + listener
/// - Ctrl-C handling
pub async fn serve(args: ServeArgs) -> Result<()> {
    let cfg = config::resolve(&args)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = Arc::new(Registry::open(fs, cfg.programs_file().clone())?);
    if !args.programs.is_empty() {
        info!(programs = ?args.programs, "seeding registry from command line");
        registry.seed(args.programs);
    }

    let service = Service::bind(cfg, registry).await?;
    service.run(shutdown_signal()).await
}
