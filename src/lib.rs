//! A single-process HTTP/1.1-style server with static-file and CGI handling.
//!
//! # Architecture Overview
//!
//! ```text
//! Client Request                ┌──────────────────────────────────────────┐
//! ─────────────────────────────▶│  server   (accept loop, task per conn)   │
//!                               │     │                                    │
//!                               │     ▼                                    │
//!                               │  http::reader ──▶ http::parser           │
//!                               │  (line reader)    (Request)              │
//!                               │     │                                    │
//!                               │     ▼                                    │
//!                               │  handlers (dispatch)                     │
//!                               │   ├─ static_file: doc root + index.html  │
//!                               │   └─ cgi: child process over pipes       │
//!                               │     │                                    │
//!                               │     ▼                                    │
//! Client Response               │  http::response (assembled | CGI bytes)  │
//! ◀─────────────────────────────┤                                          │
//!                               └──────────────────────────────────────────┘
//! ```
//!
//! Every accepted connection is handled by its own detached task; nothing is
//! shared between connections. A connection serves exactly one request and is
//! then closed (no keep-alive). Any parse or dispatch failure is answered
//! with a fixed 404 response.

pub mod config;
pub mod handlers;
pub mod http;
pub mod server;

pub use config::ServerConfig;
pub use server::Server;
