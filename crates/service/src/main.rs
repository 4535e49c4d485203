//! FixTheGap prediction service entry point

use anyhow::{Context, Result};
use fixthegap_service::{routes, ConfigManager, PredictionService};
use std::net::{IpAddr, SocketAddr};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!(
        "Starting FixTheGap service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config_manager = ConfigManager::new().context("Failed to load configuration")?;
    let config = config_manager.get_config().clone();
    info!(
        "Running in {:?} environment",
        config_manager.get_environment()
    );

    let service = PredictionService::from_config(&config).with_context(|| {
        format!(
            "Failed to load model from {} or reference data from {}",
            config.model_dir.display(),
            config.reference_data.display()
        )
    })?;

    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);

    let (bound, server) = warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", bound);
    server.await;

    info!("FixTheGap service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}

/// Initialize logging from `RUST_LOG`, defaulting to `info`
fn init_logging() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
