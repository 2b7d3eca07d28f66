//! HTTP server answering bin collection lookups for Belfast postcodes.

mod config;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use binday_core::{BinLookupService, CollectionPort};
use binday_provider_belfast::{self as belfast, chrome::BrowserConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

const DEFAULT_LOG_FILTER: &str = "binday=info";

/// `RUST_LOG` directives when set and valid, otherwise [`DEFAULT_LOG_FILTER`].
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let config = ServerConfig::from_env()?;

    // Browser + service setup
    let browser = BrowserConfig::from_env();
    info!(binary = ?browser.binary, "Browser configuration loaded");
    let port: Arc<dyn CollectionPort> = Arc::new(belfast::port(browser));
    let service = Arc::new(BinLookupService::new(port));

    let app = routes::router(Arc::clone(&service));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        council = service.council().name.as_str(),
        "binday listening on {addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
