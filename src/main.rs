//! threatgate binary: configuration, telemetry, and server startup.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threatgate::config::{load_config, load_content_keys};
use threatgate::observability::metrics;
use threatgate::HttpServer;

#[derive(Parser)]
#[command(name = "threatgate")]
#[command(about = "Threat-gated edge reverse proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "threatgate.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threatgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("threatgate v0.1.0 starting");

    let config = load_config(&cli.config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        frontend_hostname = %config.upstreams.frontend_hostname,
        detector_url = %config.scoring.detector_url,
        threshold = config.scoring.threshold,
        "Configuration loaded"
    );

    let content_paths = load_content_keys(config.scoring.content_keys_path.as_ref())?;
    tracing::info!(paths = content_paths.len(), "Content key paths compiled");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let server = HttpServer::new(config, content_paths);
    server.run().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
