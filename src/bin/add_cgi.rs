//! Sample CGI program: adds the `a` and `b` parameters.
//!
//! Follows the server's CGI contract: request metadata arrives in the
//! `METHOD`, `QUERY_STRING` and `CONTENT_LENGTH` environment variables, a
//! POST body arrives on stdin, and stdout must carry a complete HTTP
//! response, which the server forwards to the client verbatim.

use std::collections::HashMap;
use std::io::{Read, Write};

use cgi_httpd::http::query::parse_params;

fn respond(body: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(
        stdout,
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
}

fn read_params() -> Result<HashMap<String, String>, String> {
    let method = std::env::var("METHOD").map_err(|_| "no METHOD in environment".to_string())?;
    match method.as_str() {
        "GET" => {
            let query = std::env::var("QUERY_STRING")
                .map_err(|_| "no QUERY_STRING in environment".to_string())?;
            Ok(parse_params(&query))
        }
        "POST" => {
            let len: usize = std::env::var("CONTENT_LENGTH")
                .map_err(|_| "no CONTENT_LENGTH in environment".to_string())?
                .trim()
                .parse()
                .map_err(|_| "CONTENT_LENGTH is not a number".to_string())?;
            let mut body = vec![0u8; len];
            std::io::stdin()
                .read_exact(&mut body)
                .map_err(|e| format!("reading body failed: {e}"))?;
            let body = String::from_utf8_lossy(&body).into_owned();
            Ok(parse_params(&body))
        }
        other => Err(format!("unsupported METHOD: {other}")),
    }
}

fn main() {
    let params = match read_params() {
        Ok(params) => params,
        Err(e) => {
            respond(&format!("<h1>bad request: {e}</h1>\n"));
            std::process::exit(1);
        }
    };

    let (a, b) = match (
        params.get("a").and_then(|v| v.parse::<i64>().ok()),
        params.get("b").and_then(|v| v.parse::<i64>().ok()),
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            respond("<h1>parameters a and b must be integers</h1>\n");
            std::process::exit(1);
        }
    };

    respond(&format!(
        "<meta charset=\"UTF-8\">\n<h1>result = {}</h1>\n",
        a + b
    ));
}
