//! AGM relay - local HTTP front for a gateway
//!
//! Serves a static dashboard and forwards `/api/*` requests to the
//! gateway with permissive CORS headers, so a browser-hosted dashboard
//! on localhost can talk to a gateway that does not speak CORS itself.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: port 8080, upstream http://127.0.0.1:18789, assets from ./public
//! agm-relay
//!
//! # Explicit configuration
//! agm-relay --port 9000 --upstream http://gateway:18789 --static-root ./dist
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use agm_relay::{RelayConfig, RelayError, RelayServer, DEFAULT_RELAY_PORT, DEFAULT_UPSTREAM_URL};

/// AGM relay - static file server and CORS-injecting API proxy
#[derive(Parser, Debug)]
#[command(name = "agm-relay", version, about)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_RELAY_PORT)]
    port: u16,

    /// Upstream gateway base URL
    #[arg(short, long, default_value = DEFAULT_UPSTREAM_URL)]
    upstream: String,

    /// Directory of static dashboard assets
    #[arg(short, long, default_value = "public")]
    static_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("agm_relay=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        "AGM relay starting"
    );

    let config = RelayConfig {
        port: args.port,
        upstream: args.upstream,
        static_root: args.static_root,
    };

    let cancel_token = CancellationToken::new();

    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        info!("Shutdown signal received");
        shutdown_token.cancel();
    });

    let server = match RelayServer::bind(config, cancel_token).await {
        Ok(server) => server,
        Err(RelayError::PortInUse { port }) => {
            // A clear message here beats a backtrace: another relay (or
            // anything else) already owns the port
            eprintln!("Error: port {port} is already in use.");
            eprintln!("Stop the other process or choose a different --port.");
            process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "Failed to start relay");
            return Err(e.into());
        }
    };

    if let Ok(addr) = server.local_addr() {
        info!(addr = %addr, "Relay listening");
        println!("Relay listening on http://{addr}");
    }

    if let Err(e) = server.serve().await {
        error!(error = %e, "Relay server error");
        return Err(e.into());
    }

    info!("AGM relay stopped");
    Ok(())
}
