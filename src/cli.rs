// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every `serve` flag is optional: a missing flag falls back to the TOML
//! config file, then to the built-in default (see [`crate::config`]).

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `runkeeper`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runkeeper",
    version,
    about = "Periodically run registered programs and serve their captured output.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNKEEPER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the scheduler and the request listener.
    Serve(ServeArgs),
    /// Interactive client: register programs and fetch their output.
    Client(ClientArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Path to the config file (TOML).
    ///
    /// When omitted, `Runkeeper.toml` is used if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Host to bind.
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Seconds to sleep between two scheduler cycles.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// File the registry snapshot is loaded from and saved to.
    #[arg(long, value_name = "PATH")]
    pub programs_file: Option<String>,

    /// Root directory for captured program output.
    #[arg(long, value_name = "PATH")]
    pub programs_dir: Option<String>,

    /// Programs appended to the registry before the service starts.
    #[arg(value_name = "PROGRAM")]
    pub programs: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// Server host.
    #[arg(long, value_name = "HOST", default_value = "localhost")]
    pub host: String,

    /// Server port.
    #[arg(long, value_name = "PORT", default_value_t = 12345)]
    pub port: u16,

    /// Local directory fetched output is saved under.
    #[arg(long, value_name = "PATH", default_value = "programs")]
    pub download_dir: String,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
