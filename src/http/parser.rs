//! Request parsing: request line, headers, and Content-Length body.
//!
//! The parse sequence is a straight-line state machine:
//! request line → header lines (until an empty line) → body (POST only).
//! Any failure is terminal for the request; the connection handler maps it
//! to the fixed 404 response.

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::http::reader::RequestReader;
use crate::http::request::{Headers, Request};

/// Errors that can occur while parsing a request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Request line did not have exactly 3 tokens, or the version token
    /// did not contain "HTTP".
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Header line had no colon, no room for a value after "`: `", or a
    /// Content-Length value that is not a non-negative decimal.
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// POST request without a Content-Length header.
    #[error("POST request has no Content-Length")]
    ContentLengthMissing,

    /// The socket closed or errored before a full request was read.
    #[error("socket read failed: {0}")]
    SocketRead(#[from] std::io::Error),
}

/// Read and parse one full request from the connection.
pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut RequestReader<R>,
) -> Result<Request, ParseError> {
    let first_line = read_utf8_line(reader, LinePos::RequestLine).await?;
    let (method, url) = parse_first_line(&first_line)?;
    let (url_path, query_string) = parse_url(&url);

    let mut headers = Headers::new();
    loop {
        let line = read_utf8_line(reader, LinePos::Header).await?;
        // an empty line terminates the header section
        if line.is_empty() {
            break;
        }
        let (key, value) = parse_header_line(&line)?;
        headers.insert(key, value);
    }

    let body = if method == "POST" {
        let value = headers
            .get("Content-Length")
            .ok_or(ParseError::ContentLengthMissing)?;
        let len: usize = value
            .trim()
            .parse()
            .map_err(|_| ParseError::MalformedHeaderLine(format!("Content-Length: {value}")))?;
        reader.read_exact_body(len).await?
    } else {
        // GET requests never carry a body
        Vec::new()
    };

    Ok(Request {
        method,
        url,
        url_path,
        query_string,
        headers,
        body,
    })
}

#[derive(Clone, Copy)]
enum LinePos {
    RequestLine,
    Header,
}

async fn read_utf8_line<R: AsyncRead + Unpin>(
    reader: &mut RequestReader<R>,
    pos: LinePos,
) -> Result<String, ParseError> {
    let raw = reader.read_line().await?;
    String::from_utf8(raw).map_err(|e| {
        let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
        match pos {
            LinePos::RequestLine => ParseError::MalformedRequestLine(lossy),
            LinePos::Header => ParseError::MalformedHeaderLine(lossy),
        }
    })
}

/// Split the request line on spaces into method, url and version; the
/// version must contain "HTTP". Returns (method, url).
pub fn parse_first_line(line: &str) -> Result<(String, String), ParseError> {
    let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() != 3 {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    }
    if !tokens[2].contains("HTTP") {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    }
    Ok((tokens[0].to_string(), tokens[1].to_string()))
}

/// Split a URL on the first `?`. No `?` yields an empty query string.
pub fn parse_url(url: &str) -> (String, String) {
    match url.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (url.to_string(), String::new()),
    }
}

/// Split a header line on the first `:`. The value begins two characters
/// after the colon (past the "`: `" separator), and must be non-empty.
pub fn parse_header_line(line: &str) -> Result<(String, String), ParseError> {
    let pos = line
        .find(':')
        .ok_or_else(|| ParseError::MalformedHeaderLine(line.to_string()))?;
    if pos + 2 >= line.len() {
        return Err(ParseError::MalformedHeaderLine(line.to_string()));
    }
    // pos + 2 can land inside a multibyte character; that is a malformed
    // line, not a reason to die
    let value = line
        .get(pos + 2..)
        .ok_or_else(|| ParseError::MalformedHeaderLine(line.to_string()))?;
    Ok((line[..pos].to_string(), value.to_string()))
}
