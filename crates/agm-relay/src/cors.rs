//! CORS injection middleware.
//!
//! Every response leaving the relay carries permissive CORS headers, and
//! preflight `OPTIONS` requests are answered locally with `204 No Content`
//! instead of being forwarded upstream. The relay only ever binds to
//! loopback, so a wildcard origin is acceptable here.

use axum::extract::Request;
use axum::http::header::{HeaderMap, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Allowed origin header value.
pub const ALLOW_ORIGIN: &str = "*";

/// Allowed methods header value.
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Allowed request headers header value.
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Middleware that short-circuits preflights and stamps CORS headers on
/// every response.
pub async fn inject_cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

/// Writes the three CORS headers into a header map.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_cors_headers() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers);

        assert_eq!(
            headers.get("access-control-allow-origin").map(|v| v.as_bytes()),
            Some(b"*".as_slice())
        );
        assert_eq!(
            headers.get("access-control-allow-methods").map(|v| v.as_bytes()),
            Some(b"GET, POST, PUT, DELETE, OPTIONS".as_slice())
        );
        assert_eq!(
            headers.get("access-control-allow-headers").map(|v| v.as_bytes()),
            Some(b"Content-Type, Authorization".as_slice())
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers);
        apply_cors_headers(&mut headers);
        assert_eq!(headers.get_all("access-control-allow-origin").iter().count(), 1);
    }
}
