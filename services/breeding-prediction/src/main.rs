//! Breeding Prediction API server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use breeding_prediction::state::AppState;
use breeding_prediction::{app, Backend};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use gaupal_core::logging::{init_logging, LogConfig};
use gaupal_tabular::BreedingPredictor;

/// Breeding Prediction API
#[derive(Parser, Debug)]
#[command(name = "breeding-prediction")]
#[command(version)]
#[command(about = "Cattle breeding compatibility service")]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Model artifact directory
    #[arg(long, default_value = "model/breeding")]
    model_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Log errors only
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else if cli.quiet {
        LogConfig::quiet()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config).map_err(anyhow::Error::msg)?;

    info!("Breeding Prediction API v{}", env!("CARGO_PKG_VERSION"));
    info!("Started at {}", Utc::now().to_rfc3339());
    info!("Model dir: {:?}", cli.model_dir);

    let device = Default::default();
    let predictor = match BreedingPredictor::<Backend>::load(&cli.model_dir, &device) {
        Ok(predictor) => Some(predictor),
        Err(e) => {
            // The service keeps answering; predict returns 503 until the
            // artifact is fixed and the service restarted.
            warn!("Could not load breeding artifact: {e}");
            None
        }
    };

    let state = Arc::new(AppState::new(predictor));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
