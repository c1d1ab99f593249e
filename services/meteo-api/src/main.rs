//! Weather Map API Server
//!
//! Renders forecast maps on country boundaries and stores them by date.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use meteo_api::build_router;
use meteo_api::config::ServiceConfig;
use meteo_api::state::AppState;

/// Weather Map API Server
#[derive(Parser, Debug)]
#[command(name = "meteo-api")]
#[command(about = "REST API that generates weather map images from meteo data")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "METEO_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Directory of <country>.json GeoJSON boundaries
    #[arg(long, default_value = "maps", env = "METEO_MAPS_DIR")]
    maps_dir: PathBuf,

    /// Directory under which generated maps are written
    #[arg(long, default_value = ".", env = "METEO_DATA_DIR")]
    data_dir: PathBuf,

    /// Top-level folder of generated maps
    #[arg(long, default_value = "meteo", env = "METEO_OUTPUT_PREFIX")]
    output_prefix: String,

    /// TrueType font for titles and labels
    #[arg(long, default_value = "assets/fonts/DejaVuSans.ttf", env = "METEO_FONT_PATH")]
    font: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200, env = "METEO_IMAGE_WIDTH")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 1100, env = "METEO_IMAGE_HEIGHT")]
    height: u32,

    /// Number of parsed boundaries kept in memory
    #[arg(long, default_value_t = 32, env = "METEO_BOUNDARY_CACHE")]
    boundary_cache: usize,

    /// Number of worker threads
    #[arg(long, env = "METEO_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

impl Args {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            maps_dir: self.maps_dir.clone(),
            data_dir: self.data_dir.clone(),
            output_prefix: self.output_prefix.clone(),
            font_path: Some(self.font.clone()),
            image_width: self.width,
            image_height: self.height,
            boundary_cache_size: self.boundary_cache,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting Weather Map API server");

    let state = AppState::new(&args.service_config())
        .context("Failed to initialize application state")?
        .with_prometheus(prometheus_handle);

    let app = build_router(Arc::new(state));

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
