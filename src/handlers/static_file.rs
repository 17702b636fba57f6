//! Static file resolution and serving.

use std::path::{Path, PathBuf};

use crate::config::ServerConfig;
use crate::handlers::HandlerError;
use crate::http::{Request, Response};

/// Map a URL path to a filesystem path under the document root.
///
/// The URL path is appended to the root as-is (no normalization). When the
/// result names a directory, `index.html` inside it is the target, with a
/// separator inserted if the URL path did not end in one. No existence
/// check happens here; the caller's read is what discovers a missing file.
pub async fn resolve(document_root: &Path, url_path: &str) -> PathBuf {
    let mut path = format!("{}{}", document_root.display(), url_path);
    let is_dir = tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if is_dir {
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str("index.html");
    }
    PathBuf::from(path)
}

/// Serve a file under the document root as a 200 response.
pub async fn serve(request: &Request, config: &ServerConfig) -> Result<Response, HandlerError> {
    let file_path = resolve(&config.document_root, &request.url_path).await;
    let body = tokio::fs::read(&file_path).await.map_err(|e| {
        tracing::warn!(path = %file_path.display(), error = %e, "static file read failed");
        HandlerError::File(e)
    })?;
    tracing::debug!(path = %file_path.display(), bytes = body.len(), "static file served");
    Ok(Response::ok(body))
}
