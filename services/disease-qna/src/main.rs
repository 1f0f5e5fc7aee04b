//! Cattle Disease Prediction API server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::info;

use disease_qna::state::AppState;
use disease_qna::{app, Backend};
use gaupal_core::logging::{init_logging, LogConfig};
use gaupal_tabular::SymptomPredictor;

/// Cattle Disease Prediction API
#[derive(Parser, Debug)]
#[command(name = "disease-qna")]
#[command(version)]
#[command(about = "Symptom-based cattle disease prediction service")]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Ensemble artifact directory
    #[arg(long, default_value = "model/symptom_ensemble")]
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

    info!("Cattle Disease Prediction API v{}", env!("CARGO_PKG_VERSION"));
    info!("Started at {}", Utc::now().to_rfc3339());
    info!("Model dir: {:?}", cli.model_dir);

    // No degraded mode here: the service is useless without its ensemble.
    let device = Default::default();
    let predictor = SymptomPredictor::<Backend>::load(&cli.model_dir, &device)
        .with_context(|| format!("loading symptom ensemble from {:?}", cli.model_dir))?;
    info!("Ensemble ready with {} members", predictor.members());

    let state = Arc::new(AppState::new(predictor));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
