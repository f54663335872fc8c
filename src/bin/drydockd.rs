//! drydockd — Drydock proxy daemon.
//!
//! Serves the cache-fronted encyclopedia proxy over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use drydock::DrydockError;
use drydock::cache::DiskCache;
use drydock::proxy::CacheProxy;
use drydock::server::config::Config;
use drydock::server::{AppState, build_router};
use drydock::upstream::UpstreamClient;

/// Drydock daemon — caching proxy for the encyclopedia API.
#[derive(Parser)]
#[command(name = "drydockd")]
#[command(version = drydock::PKG_VERSION)]
#[command(about = "Drydock caching proxy daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Bind address, overriding the configuration file.
    #[arg(short, long, env = "DRYDOCK_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info for the daemon; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }

    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| DrydockError::Configuration(format!("Invalid address: {e}")))?;

    let cache_config = config.cache_config();
    let upstream_config = config.upstream_config();
    let cache = DiskCache::new(&cache_config)?;
    let upstream = UpstreamClient::new(&upstream_config)?;
    let proxy = CacheProxy::new(Arc::new(cache), Arc::new(upstream));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        version = drydock::PKG_VERSION,
        %addr,
        upstream = %upstream_config.base_url,
        cache_dir = %cache_config.dir.display(),
        ttl_secs = cache_config.ttl.as_secs(),
        "drydockd starting"
    );

    axum::serve(listener, build_router(AppState::new(proxy)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("drydockd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
