//! Gateway proxying for `/api/*` requests.
//!
//! Requests are forwarded to the upstream gateway with the `/api` prefix
//! stripped. The `Authorization` header passes through untouched; request
//! bodies are always sent with a JSON content type because the gateway
//! rejects bodies without one. Any upstream failure maps to a single
//! `502 Bad Gateway` JSON shape so the dashboard has one error contract
//! to handle.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, warn};

use crate::server::RelayState;

/// Timeout for one upstream request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum upstream response size the relay will pass through.
pub const MAX_UPSTREAM_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Handler for all `/api/*` traffic.
pub async fn forward_api(
    State(state): State<Arc<RelayState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = upstream_url(&state.upstream, &uri);
    debug!(method = %method, url = %url, "Forwarding request upstream");

    // The gateway rejects anything that is not JSON, so the content type
    // is forced on every outbound request, body or not
    let mut request = state
        .http
        .request(method, &url)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        request = request.header(header::AUTHORIZATION, auth.clone());
    }
    if !body.is_empty() {
        request = request.body(body.to_vec());
    }

    match request.send().await {
        Ok(response) => relay_response(response).await,
        Err(e) => {
            warn!(error = %e, url = %url, "Upstream request failed");
            bad_gateway(&e.to_string())
        }
    }
}

/// Builds the upstream URL: strip the `/api` prefix, keep the query.
fn upstream_url(base: &str, uri: &Uri) -> String {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path());
    let path = if path.is_empty() { "/" } else { path };
    match uri.query() {
        Some(query) => format!("{base}{path}?{query}"),
        None => format!("{base}{path}"),
    }
}

/// Translates an upstream response into the relay's own response.
///
/// Status and content type pass through. The body is read chunk by chunk
/// so an oversized upstream is cut off as soon as the cap is crossed,
/// not after the whole body has been buffered.
async fn relay_response(mut response: reqwest::Response) -> Response {
    let status = response.status();
    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

    // A declared length over the cap never needs a single body read
    if let Some(length) = response.content_length() {
        if length as usize > MAX_UPSTREAM_RESPONSE_BYTES {
            warn!(length, "Upstream declared an oversized response");
            return bad_gateway("upstream response too large");
        }
    }

    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if body.len().saturating_add(chunk.len()) > MAX_UPSTREAM_RESPONSE_BYTES {
                    warn!(
                        buffered = body.len(),
                        "Upstream response exceeds size limit"
                    );
                    return bad_gateway("upstream response too large");
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read upstream body");
                return bad_gateway(&e.to_string());
            }
        }
    }

    let mut builder = Response::builder().status(status);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    match builder.body(Body::from(body)) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Failed to rebuild upstream response");
            bad_gateway(&e.to_string())
        }
    }
}

/// The single upstream-failure response shape.
fn bad_gateway(message: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "ok": false, "error": message })),
    )
        .into_response()
}
