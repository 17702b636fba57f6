//! Network layer: listener and per-connection handling.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → accept loop (this module)
//!     → one detached task per connection (unbounded, by design)
//!     → connection.rs (parse → dispatch → serialize → write → close)
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpSocket};

use crate::config::ServerConfig;
use crate::server::connection::Connection;

pub mod connection;

/// Fixed listen backlog, matching the small queue the server has always used.
const LISTEN_BACKLOG: u32 = 5;

/// The accept loop and the configuration it hands to every connection.
pub struct Server {
    config: Arc<ServerConfig>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Bind the configured address with SO_REUSEADDR and the fixed backlog.
    pub fn bind(&self) -> std::io::Result<TcpListener> {
        let addr: SocketAddr = self
            .config
            .listener
            .bind_address
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(LISTEN_BACKLOG)?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            address = %local_addr,
            document_root = %self.config.document_root.display(),
            "listener bound"
        );
        Ok(listener)
    }

    /// Accept connections forever, spawning a handler task for each.
    ///
    /// There is no cap on live connections or spawned children; a slow
    /// client or CGI program only ever blocks its own task.
    pub async fn run(&self, listener: TcpListener) -> std::io::Result<()> {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let conn = Connection::new(stream);
                    tracing::debug!(peer = %peer, conn = %conn.id(), "connection accepted");
                    let config = Arc::clone(&self.config);
                    tokio::spawn(conn.handle(config));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
