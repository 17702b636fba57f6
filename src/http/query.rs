//! Query-string / form-body parameter parsing.
//!
//! Shared with CGI programs (see `src/bin/add_cgi.rs`): the server passes
//! the raw query string or body through, and the child decodes it with the
//! same rules.

use std::collections::HashMap;

/// Parse an `&`-joined, `=`-delimited parameter string.
///
/// A pair that does not split into exactly one key and one value is skipped
/// with a warning; parsing continues with the remaining pairs.
pub fn parse_params(input: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in input.split('&') {
        let fields: Vec<&str> = pair.split('=').collect();
        if fields.len() != 2 {
            tracing::warn!(pair, "skipping malformed parameter");
            continue;
        }
        params.insert(fields[0].to_string(), fields[1].to_string());
    }
    params
}
