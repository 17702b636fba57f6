//! Request handlers and dispatch.
//!
//! # Data Flow
//! ```text
//! Request
//!     → classify(): GET without query  → static_file.rs
//!                   GET with query, or POST → cgi.rs
//!                   anything else → UnsupportedMethod
//!     → Response
//! ```

use thiserror::Error;

use crate::config::ServerConfig;
use crate::http::{Request, Response};

pub mod cgi;
pub mod static_file;

/// Errors that can occur while computing a response. The connection handler
/// converts every variant into the fixed 404 response; the distinction only
/// reaches the logs.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Method other than GET or POST.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Static file could not be read.
    #[error("file read failed: {0}")]
    File(#[source] std::io::Error),

    /// CGI child process could not be created.
    #[error("process spawn failed: {0}")]
    Spawn(#[source] std::io::Error),

    /// Pipe I/O with the CGI child failed.
    #[error("CGI I/O failed: {0}")]
    CgiIo(#[source] std::io::Error),

    /// CGI child wrote nothing to stdout, the observable signature of an
    /// exec failure inside the child.
    #[error("CGI produced no output")]
    EmptyCgiResponse,
}

/// How a request will be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// GET with no query string: serve a file under the document root.
    StaticFile,
    /// GET with a query string, or any POST: delegate to a CGI executable.
    Cgi,
}

/// Classify a request as static or dynamic.
pub fn classify(request: &Request) -> Result<RouteKind, HandlerError> {
    match request.method.as_str() {
        "GET" if request.query_string.is_empty() => Ok(RouteKind::StaticFile),
        "GET" | "POST" => Ok(RouteKind::Cgi),
        other => Err(HandlerError::UnsupportedMethod(other.to_string())),
    }
}

/// Compute the response for a parsed request.
pub async fn dispatch(request: &Request, config: &ServerConfig) -> Result<Response, HandlerError> {
    match classify(request)? {
        RouteKind::StaticFile => static_file::serve(request, config).await,
        RouteKind::Cgi => {
            let output = cgi::execute(request, config).await?;
            Ok(Response::cgi_passthrough(output))
        }
    }
}
