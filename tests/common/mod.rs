//! Shared utilities for the end-to-end tests.

use std::io::Write as _;
use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use cgi_httpd::{Server, ServerConfig};

/// A throwaway document root under the system temp directory.
pub struct TestSite {
    pub root: PathBuf,
}

impl TestSite {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("cgi-httpd-e2e-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn write_file(&self, rel: &str, contents: &[u8]) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Write an executable shell script CGI under the root.
    pub fn write_script(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Copy a compiled binary (e.g. from CARGO_BIN_EXE_*) under the root,
    /// preserving its executable bit.
    pub fn install_binary(&self, rel: &str, source: &Path) {
        std::fs::copy(source, self.root.join(rel)).unwrap();
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Start a server over the given document root on an ephemeral port.
pub async fn start_server(document_root: &Path) -> SocketAddr {
    let mut config = ServerConfig {
        document_root: document_root.to_path_buf(),
        ..Default::default()
    };
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let server = Server::new(config);
    let listener = server.bind().unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Write raw request bytes, half-close, and read the whole response (the
/// server closes the connection after one response).
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

/// Split a raw response into (status line, headers, body).
pub fn split_response(raw: &[u8]) -> (String, Vec<String>, Vec<u8>) {
    let boundary = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header/body boundary");
    let head = String::from_utf8(raw[..boundary].to_vec()).unwrap();
    let body = raw[boundary + 4..].to_vec();
    let mut lines = head.split("\r\n").map(str::to_string);
    let status = lines.next().unwrap();
    (status, lines.collect(), body)
}
