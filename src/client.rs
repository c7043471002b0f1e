// src/client.rs

//! Client side of the protocol plus the interactive prompt behind the
//! `client` subcommand.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::cli::ClientArgs;
use crate::exec::output::{output_file_name, program_stem};
use crate::server::protocol::{MAX_REQUEST_BYTES, OUTPUT_NOT_FOUND, Request, parse_request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Output(Vec<u8>),
    NotFound,
}

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Send(Request),
    /// Ends the input loop; never sent to the server.
    Disconnect,
}

pub fn parse_client_line(line: &str) -> Option<ClientCommand> {
    if line.trim().eq_ignore_ascii_case("exit") {
        return Some(ClientCommand::Disconnect);
    }
    parse_request(line.as_bytes()).ok().map(ClientCommand::Send)
}

/// A connection to a runkeeper server.
///
/// The server closes the connection after every FETCH; the next request
/// reconnects transparently.
#[derive(Debug)]
pub struct Client {
    addr: String,
    stream: Option<TcpStream>,
}

impl Client {
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let stream = TcpStream::connect(&addr)
            .await
            .with_context(|| format!("connecting to {addr}"))?;
        info!(addr = %addr, "connected");
        Ok(Self {
            addr,
            stream: Some(stream),
        })
    }

    async fn stream(&mut self) -> Result<&mut TcpStream> {
        if self.stream.is_none() {
            debug!(addr = %self.addr, "reconnecting");
            let stream = TcpStream::connect(&self.addr)
                .await
                .with_context(|| format!("reconnecting to {}", self.addr))?;
            self.stream = Some(stream);
        }
        self.stream.as_mut().context("no connection")
    }

    /// Register `program`; returns the server's acknowledgment text.
    ///
    /// The connection is kept for the next request only if the exchange
    /// succeeded; any failure drops it so the next call reconnects.
    pub async fn register(&mut self, program: &str) -> Result<String> {
        let request = Request::Register(program.to_string()).to_string();
        self.stream().await?;
        let mut stream = self.stream.take().context("no connection")?;
        stream
            .write_all(request.as_bytes())
            .await
            .with_context(|| format!("sending registration of '{program}'"))?;

        let mut buf = [0u8; MAX_REQUEST_BYTES];
        let n = stream
            .read(&mut buf)
            .await
            .with_context(|| format!("receiving reply for '{program}'"))?;
        if n == 0 {
            bail!("server closed the connection without a reply");
        }
        self.stream = Some(stream);
        Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
    }

    /// Fetch the full captured output of `program`.
    pub async fn fetch(&mut self, program: &str) -> Result<FetchOutcome> {
        let request = Request::Fetch(program.to_string()).to_string();
        self.stream().await?;
        let mut stream = self.stream.take().context("no connection")?;
        stream.write_all(request.as_bytes()).await?;

        let mut body = Vec::new();
        stream
            .read_to_end(&mut body)
            .await
            .with_context(|| format!("receiving output of '{program}'"))?;
        debug!(program = %program, bytes = body.len(), "fetch finished");

        if body == OUTPUT_NOT_FOUND.as_bytes() {
            Ok(FetchOutcome::NotFound)
        } else {
            Ok(FetchOutcome::Output(body))
        }
    }
}

/// Where a fetched copy of `program`'s output is stored locally.
pub fn download_path(download_dir: &Path, program: &str) -> PathBuf {
    download_dir
        .join(program_stem(program))
        .join(output_file_name(program))
}

/// Interactive loop for the `client` subcommand.
pub async fn run_interactive(args: ClientArgs) -> Result<()> {
    let mut client = Client::connect(format!("{}:{}", args.host, args.port)).await?;
    let download_dir = PathBuf::from(&args.download_dir);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Enter command (REGISTER <program>, FETCH <program> or EXIT): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_client_line(&line) {
            Some(ClientCommand::Disconnect) => break,
            Some(ClientCommand::Send(Request::Register(program))) => {
                match client.register(&program).await {
                    Ok(reply) => println!("{reply}"),
                    Err(e) => {
                        let detail = format!("{e:#}");
                        warn!(error = %detail, "register failed");
                    }
                }
            }
            Some(ClientCommand::Send(Request::Fetch(program))) => {
                match client.fetch(&program).await {
                    Ok(FetchOutcome::Output(body)) => {
                        let path = download_path(&download_dir, &program);
                        save_output(&path, &body).await?;
                        println!("Saved {} bytes to {}", body.len(), path.display());
                    }
                    Ok(FetchOutcome::NotFound) => println!("{OUTPUT_NOT_FOUND}"),
                    Err(e) => {
                        let detail = format!("{e:#}");
                        warn!(error = %detail, "fetch failed");
                    }
                }
            }
            None => println!("Unrecognized command: {}", line.trim()),
        }
    }

    info!("client exiting");
    Ok(())
}

async fn save_output(path: &Path, body: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))
}
