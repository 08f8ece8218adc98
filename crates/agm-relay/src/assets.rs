//! Static asset serving for the dashboard bundle.
//!
//! Everything outside `/api` falls through to here. Paths resolve inside
//! one configured root directory; `/` maps to `index.html`. Any path with
//! a non-plain component (`..`, absolute prefixes) is rejected before it
//! touches the filesystem. Responses are marked `no-cache` so a rebuilt
//! bundle is picked up on the next reload.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::server::RelayState;

/// File served when the root path is requested.
pub const INDEX_FILE: &str = "index.html";

/// Fallback handler serving files from the static root.
pub async fn serve_static(
    State(state): State<Arc<RelayState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return not_found();
    }

    let Some(path) = resolve_asset(&state.static_root, uri.path()) else {
        warn!(path = uri.path(), "Rejected asset path");
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(contents) => {
            debug!(path = %path.display(), bytes = contents.len(), "Serving asset");
            asset_response(&path, contents)
        }
        Err(_) => not_found(),
    }
}

/// Resolves a request path to a file under the root, or rejects it.
///
/// Returns `None` for any path containing a component that is not a plain
/// name, which covers `..` traversal and absolute paths.
pub fn resolve_asset(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        INDEX_FILE
    } else {
        relative
    };

    let candidate = Path::new(relative);
    let plain = candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain {
        return None;
    }

    Some(root.join(candidate))
}

/// Maps a file extension to its content type.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn asset_response(path: &Path, contents: Vec<u8>) -> Response {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(path))
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    match builder.body(Body::from(contents)) {
        Ok(response) => response,
        Err(_) => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Not found",
    )
        .into_response()
}
