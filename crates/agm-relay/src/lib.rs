//! Local HTTP relay for the dashboard.
//!
//! The relay sits between a browser-grade HTTP client and the remote
//! gateway. It does two jobs:
//!
//! - Serves the static dashboard assets from a local directory
//! - Forwards `/api/*` requests to the gateway, injecting permissive CORS
//!   headers on every response so a page served from `localhost` can talk
//!   to the gateway without same-origin restrictions
//!
//! The relay is deliberately dumb: no caching, no auth of its own, no
//! request rewriting beyond stripping the `/api` prefix. Credentials pass
//! through untouched in the `Authorization` header.

pub mod assets;
pub mod cors;
pub mod error;
pub mod proxy;
pub mod server;

pub use error::{RelayError, RelayResult};
pub use server::{RelayConfig, RelayServer, DEFAULT_RELAY_PORT, DEFAULT_UPSTREAM_URL};
