//! Per-connection request pipeline.
//!
//! Each accepted connection is owned by exactly one task, which parses one
//! request, dispatches it, writes one response and closes the socket. Any
//! parse or dispatch failure is answered with the fixed 404 response; the
//! socket is shut down exactly once on every path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::handlers::{self, HandlerError};
use crate::http::parser::{self, ParseError};
use crate::http::reader::RequestReader;
use crate::http::Response;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient: only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection, used for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Everything that can fail between accept and response serialization.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// One accepted connection: the socket plus the request/response pair
/// produced while handling it. Never shared between tasks.
pub struct Connection {
    stream: TcpStream,
    id: ConnectionId,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            id: ConnectionId::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Run the full pipeline for this connection, consuming it.
    ///
    /// The socket is closed when `self` drops at the end of this function,
    /// on the success and the failure path alike.
    pub async fn handle(mut self, config: Arc<ServerConfig>) {
        let response = match self.process(&config).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(conn = %self.id, error = %e, "request failed, answering 404");
                Response::not_found()
            }
        };

        // write errors are terminal: no retries, the connection is abandoned
        if let Err(e) = self.stream.write_all(&response.to_bytes()).await {
            tracing::warn!(conn = %self.id, error = %e, "response write failed");
        }
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(conn = %self.id, error = %e, "socket shutdown failed");
        }
    }

    async fn process(&mut self, config: &ServerConfig) -> Result<Response, ConnectionError> {
        let mut reader = RequestReader::new(&mut self.stream);
        let request = parser::read_request(&mut reader).await?;
        tracing::debug!(
            conn = %self.id,
            method = %request.method,
            url = %request.url,
            "request parsed"
        );
        let response = handlers::dispatch(&request, config).await?;
        Ok(response)
    }
}
