//! Parsed request data model.

use std::collections::HashMap;

/// Header mapping. Keys are stored exactly as received (no case folding);
/// a duplicate key overwrites the earlier value.
pub type Headers = HashMap<String, String>;

/// A parsed request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Method token exactly as received. Only "GET" and "POST" are ever
    /// dispatched; anything else is rejected at dispatch time.
    pub method: String,
    /// The raw URL from the request line.
    pub url: String,
    /// Path component of the URL; never empty ("/" at minimum). Not
    /// normalized: `..` segments pass through to resolution as-is.
    pub url_path: String,
    /// Everything after the first `?`. The empty string means "absent".
    pub query_string: String,
    /// Request headers.
    pub headers: Headers,
    /// Raw body bytes; only ever non-empty for POST.
    pub body: Vec<u8>,
}

impl Request {
    /// The Content-Length header value, if present.
    pub fn content_length(&self) -> Option<&str> {
        self.headers.get("Content-Length").map(String::as_str)
    }
}
