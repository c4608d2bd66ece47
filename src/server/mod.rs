//! Server module
//!
//! The host HTTP layer around the dispatch engine: owns the listener and
//! accept loop, buffers request bodies, binds a fresh request context per
//! request, and serializes the dispatcher's response triples onto the wire.

mod connection;
mod listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::logger;

pub use listener::create_listener;

/// Shared serving state: the configuration and the frozen dispatcher.
pub struct ServerState {
    pub config: Config,
    pub dispatcher: Dispatcher,
}

impl ServerState {
    #[must_use]
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }
}

/// Accept connections until the process exits.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<ServerState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::accept_connection(stream, peer_addr, &state, &active_connections);
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
