// src/server/mod.rs

//! Network side of runkeeper.
//!
//! - [`protocol`] parses requests and holds the reply texts.
//! - [`handler`] serves one connection (REGISTER / FETCH).
//! - [`listener`] accepts connections and spawns a handler per client.

pub mod handler;
pub mod listener;
pub mod protocol;

use std::path::PathBuf;
use std::sync::Arc;

use crate::registry::Registry;

pub use handler::handle_connection;
pub use listener::Listener;
pub use protocol::{ParseError, Request, parse_request};

/// State every connection handler shares.
#[derive(Debug)]
pub struct ServiceContext {
    pub registry: Arc<Registry>,
    pub output_root: PathBuf,
}

impl ServiceContext {
    pub fn new(registry: Arc<Registry>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            output_root: output_root.into(),
        }
    }
}
