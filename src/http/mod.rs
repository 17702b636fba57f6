//! HTTP wire protocol subsystem.
//!
//! # Data Flow
//! ```text
//! Socket bytes
//!     → reader.rs (line reader: \n, \r\n and bare \r terminators)
//!     → parser.rs (request line, headers, Content-Length body)
//!     → Request (request.rs)
//!
//! Request handling produces:
//!     → Response (response.rs): assembled headers + body, or
//!       captured CGI bytes passed through verbatim
//!     → serialized back onto the socket
//! ```
//!
//! # Design Decisions
//! - The reader is buffered but keeps the exact byte-level terminator
//!   recognition of a byte-at-a-time loop
//! - Header keys are stored as received: no case folding, last write wins
//! - The two response representations are a tagged enum so exactly one
//!   can be populated

pub mod parser;
pub mod query;
pub mod reader;
pub mod request;
pub mod response;

pub use parser::ParseError;
pub use request::Request;
pub use response::{Payload, Response};
