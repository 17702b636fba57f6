//! CGI execution engine.
//!
//! # Data Flow
//! ```text
//! Request ──▶ resolve executable path (document root rules)
//!         ──▶ spawn child: piped stdin/stdout, per-child env
//!               METHOD          always
//!               QUERY_STRING    GET only
//!               CONTENT_LENGTH  POST only (header value verbatim)
//!         ──▶ write body to child stdin ─┐ concurrently
//!             drain child stdout to EOF ─┘
//!         ──▶ wait() the child (reap)
//!         ──▶ captured stdout = the complete response bytes
//! ```
//!
//! The environment variables are set on the spawned child only; the
//! server's own environment is never touched, so concurrent connections
//! cannot observe each other's variables.

use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::config::ServerConfig;
use crate::handlers::{static_file, HandlerError};
use crate::http::Request;

/// Run the CGI executable the request addresses and capture its stdout.
pub async fn execute(request: &Request, config: &ServerConfig) -> Result<Vec<u8>, HandlerError> {
    let script_path = static_file::resolve(&config.document_root, &request.url_path).await;

    let mut command = Command::new(&script_path);
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .env("METHOD", &request.method);
    if request.method == "GET" {
        command.env("QUERY_STRING", &request.query_string);
    } else if request.method == "POST" {
        if let Some(len) = request.content_length() {
            command.env("CONTENT_LENGTH", len);
        }
    }

    let mut child = command.spawn().map_err(|e| {
        tracing::warn!(script = %script_path.display(), error = %e, "CGI spawn failed");
        HandlerError::Spawn(e)
    })?;

    let stdin = child.stdin.take();
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| HandlerError::CgiIo(std::io::Error::other("child stdout not captured")))?;

    // Write the body and drain the output concurrently so a body larger
    // than the pipe's kernel buffer cannot deadlock against a child that
    // reads all of stdin before writing anything.
    let body = &request.body;
    let feed_stdin = async {
        if let Some(mut stdin) = stdin {
            if request.method == "POST" && !body.is_empty() {
                match stdin.write_all(body).await {
                    Ok(()) => {}
                    // a child that exits without draining stdin is not an error
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    Err(e) => return Err(e),
                }
            }
            // dropping the handle closes the pipe: the child sees EOF
        }
        Ok(())
    };
    let drain_stdout = async {
        let mut output = Vec::new();
        stdout.read_to_end(&mut output).await?;
        Ok::<_, std::io::Error>(output)
    };
    let (fed, drained) = tokio::join!(feed_stdin, drain_stdout);
    fed.map_err(HandlerError::CgiIo)?;
    let output = drained.map_err(HandlerError::CgiIo)?;

    // reap the child so it cannot linger as a zombie
    let status = child.wait().await.map_err(HandlerError::CgiIo)?;

    if output.is_empty() {
        tracing::warn!(
            script = %script_path.display(),
            exit = %status,
            "CGI wrote no output; likely exec failure inside the child"
        );
        return Err(HandlerError::EmptyCgiResponse);
    }

    tracing::debug!(
        script = %script_path.display(),
        exit = %status,
        bytes = output.len(),
        "CGI completed"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::Headers;
    use std::io::Write as _;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn scratch_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cgi-httpd-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_script(root: &PathBuf, name: &str, contents: &str) {
        let path = root.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn get_request(path: &str, query: &str) -> Request {
        Request {
            method: "GET".to_string(),
            url: format!("{path}?{query}"),
            url_path: path.to_string(),
            query_string: query.to_string(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    #[tokio::test]
    async fn get_child_sees_method_and_query_string() {
        let root = scratch_root("cgi-env");
        write_script(
            &root,
            "env_echo",
            "#!/bin/sh\nprintf 'HTTP/1.1 200 OK\\r\\n\\r\\n%s|%s' \"$METHOD\" \"$QUERY_STRING\"\n",
        );
        let config = ServerConfig {
            document_root: root,
            ..Default::default()
        };
        let output = execute(&get_request("/env_echo", "a=2&b=3"), &config)
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("GET|a=2&b=3"), "got: {text}");
    }

    #[tokio::test]
    async fn post_streams_body_and_sets_content_length() {
        let root = scratch_root("cgi-post");
        write_script(
            &root,
            "body_echo",
            "#!/bin/sh\nbody=$(cat)\nprintf 'HTTP/1.1 200 OK\\r\\n\\r\\n%s|%s' \"$CONTENT_LENGTH\" \"$body\"\n",
        );
        let mut headers = Headers::new();
        headers.insert("Content-Length".to_string(), "7".to_string());
        let request = Request {
            method: "POST".to_string(),
            url: "/body_echo".to_string(),
            url_path: "/body_echo".to_string(),
            query_string: String::new(),
            headers,
            body: b"a=2&b=3".to_vec(),
        };
        let config = ServerConfig {
            document_root: root,
            ..Default::default()
        };
        let output = execute(&request, &config).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("7|a=2&b=3"), "got: {text}");
    }

    #[tokio::test]
    async fn missing_executable_is_a_spawn_error() {
        let root = scratch_root("cgi-missing");
        let config = ServerConfig {
            document_root: root,
            ..Default::default()
        };
        assert!(matches!(
            execute(&get_request("/nope", "a=1"), &config).await,
            Err(HandlerError::Spawn(_))
        ));
    }

    #[tokio::test]
    async fn silent_child_is_reported_distinctly() {
        let root = scratch_root("cgi-silent");
        write_script(&root, "silent", "#!/bin/sh\nexit 0\n");
        let config = ServerConfig {
            document_root: root,
            ..Default::default()
        };
        assert!(matches!(
            execute(&get_request("/silent", "a=1"), &config).await,
            Err(HandlerError::EmptyCgiResponse)
        ));
    }
}
