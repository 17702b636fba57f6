//! Response data model and wire serialization.

use crate::http::request::Headers;

/// Fixed body sent for every failed request.
pub const NOT_FOUND_BODY: &str = "<head><meta http-equiv=\"content-type\" \
     content=\"text/html;charset=utf-8\"></head><h1>404 Not Found</h1>";

/// The two mutually exclusive response representations.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A response the server assembles itself: headers plus body, framed
    /// by the serializer.
    Assembled { headers: Headers, body: Vec<u8> },
    /// Captured CGI output: a complete HTTP response (status line, headers,
    /// blank line, body) written to the socket verbatim. Never re-parsed.
    CgiPassthrough(Vec<u8>),
}

/// A response ready for serialization.
#[derive(Debug, Clone)]
pub struct Response {
    pub code: u16,
    pub desc: String,
    pub payload: Payload,
}

impl Response {
    /// 200 response with a body and a computed Content-Length.
    pub fn ok(body: Vec<u8>) -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Length".to_string(), body.len().to_string());
        Self {
            code: 200,
            desc: "OK".to_string(),
            payload: Payload::Assembled { headers, body },
        }
    }

    /// The fixed 404 response used for every failure.
    pub fn not_found() -> Self {
        let body = NOT_FOUND_BODY.as_bytes().to_vec();
        let mut headers = Headers::new();
        headers.insert("Content-Length".to_string(), body.len().to_string());
        Self {
            code: 404,
            desc: "Not Found".to_string(),
            payload: Payload::Assembled { headers, body },
        }
    }

    /// A response whose bytes were produced in full by a CGI child.
    pub fn cgi_passthrough(output: Vec<u8>) -> Self {
        Self {
            code: 200,
            desc: "OK".to_string(),
            payload: Payload::CgiPassthrough(output),
        }
    }

    /// Serialize to wire bytes.
    ///
    /// Assembled responses get a status line, header lines and a blank
    /// line; CGI output is copied through untouched since it already
    /// carries its own framing.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.payload {
            Payload::Assembled { headers, body } => {
                let mut out = Vec::with_capacity(128 + body.len());
                out.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", self.code, self.desc).as_bytes());
                for (key, value) in headers {
                    out.extend_from_slice(format!("{key}: {value}\r\n").as_bytes());
                }
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(body);
                out
            }
            Payload::CgiPassthrough(bytes) => bytes.clone(),
        }
    }
}
