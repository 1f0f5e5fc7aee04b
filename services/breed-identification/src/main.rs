//! Cow Identification API server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use breed_identification::state::AppState;
use breed_identification::{app, Backend, TOP_K};
use gaupal_core::catalog::NUM_BREEDS;
use gaupal_core::logging::{init_logging, LogConfig};
use gaupal_vision::{load_classifier, ImagePredictor, ImagePreprocessor};

/// Cow Identification API
#[derive(Parser, Debug)]
#[command(name = "breed-identification")]
#[command(version)]
#[command(about = "Cattle breed identification service")]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Model artifact directory
    #[arg(long, default_value = "model/cowidentification")]
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

    info!("Cow Identification API v{}", env!("CARGO_PKG_VERSION"));
    info!("Started at {}", Utc::now().to_rfc3339());
    info!("Model dir: {:?}", cli.model_dir);

    let device = Default::default();
    let loaded = load_classifier::<Backend>(&cli.model_dir, &device, NUM_BREEDS);
    info!("Load strategy: {}", loaded.strategy);

    let predictor = ImagePredictor::new(loaded, ImagePreprocessor::default(), device, TOP_K);
    let state = Arc::new(AppState::new(Some(predictor)));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
