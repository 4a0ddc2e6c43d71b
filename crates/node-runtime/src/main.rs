//! # Firefly
//!
//! Live-voting coordinator. See the `node_runtime` library for the startup
//! sequence.

use anyhow::{Context, Result};
use node_runtime::{FireflyContainer, FireflyRuntime, NodeConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env().context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;
    if config.is_default_secret() {
        warn!("Using a built-in signon secret; set FIREFLY_ADMIN_SECRET and FIREFLY_MONITOR_SECRET");
    }

    info!("===========================================");
    info!("  Firefly v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(db = %config.storage.db_path.display(), "Opening store");

    let addr = config.server.addr();
    let container = FireflyContainer::open(config).context("Failed to open the vote store")?;
    let runtime = FireflyRuntime::start(container)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    runtime
        .serve(listener, async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received shutdown signal"),
                Err(e) => {
                    warn!(error = %e, "Cannot listen for Ctrl+C, running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
}
