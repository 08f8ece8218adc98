//! Relay server: listener setup, routing, and graceful shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{RelayError, RelayResult};
use crate::proxy::UPSTREAM_TIMEOUT;
use crate::{assets, cors, proxy};

/// Default listen port.
pub const DEFAULT_RELAY_PORT: u16 = 8080;

/// Default upstream gateway URL.
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:18789";

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Loopback port to listen on.
    pub port: u16,

    /// Base URL of the upstream gateway.
    pub upstream: String,

    /// Directory the static dashboard bundle is served from.
    pub static_root: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_RELAY_PORT,
            upstream: DEFAULT_UPSTREAM_URL.to_string(),
            static_root: PathBuf::from("."),
        }
    }
}

/// Shared state for the request handlers.
pub struct RelayState {
    /// Upstream base URL, normalized without a trailing slash.
    pub upstream: String,

    /// Outbound HTTP client, shared for connection reuse.
    pub http: reqwest::Client,

    /// Static asset root.
    pub static_root: PathBuf,
}

/// The relay HTTP server.
///
/// Binding and serving are split so callers can learn the bound address
/// (and surface a port conflict) before the accept loop starts.
pub struct RelayServer {
    listener: TcpListener,
    router: Router,
    cancel_token: CancellationToken,
}

impl RelayServer {
    /// Binds the listen socket and builds the router.
    ///
    /// A port conflict maps to [`RelayError::PortInUse`]; callers should
    /// treat that as fatal rather than probing for a free port, since a
    /// conflict almost always means another relay is already running.
    pub async fn bind(config: RelayConfig, cancel_token: CancellationToken) -> RelayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;

        let state = Arc::new(RelayState {
            upstream: config.upstream.trim_end_matches('/').to_string(),
            http,
            static_root: config.static_root,
        });

        let router = Router::new()
            .route("/api", any(proxy::forward_api))
            .route("/api/*path", any(proxy::forward_api))
            .fallback(assets::serve_static)
            .layer(middleware::from_fn(cors::inject_cors))
            .with_state(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                RelayError::PortInUse { port: config.port }
            } else {
                RelayError::Bind { addr, source: e }
            }
        })?;

        Ok(Self {
            listener,
            router,
            cancel_token,
        })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> RelayResult<SocketAddr> {
        self.listener.local_addr().map_err(RelayError::Serve)
    }

    /// Serves requests until the cancellation token fires.
    pub async fn serve(self) -> RelayResult<()> {
        let addr = self.local_addr()?;
        info!(addr = %addr, "Relay listening");

        let cancel = self.cancel_token.clone();
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                info!("Relay shutdown requested");
            })
            .await
            .map_err(RelayError::Serve)
    }
}
