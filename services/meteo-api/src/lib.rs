//! Weather map service library.
//!
//! Accepts forecast JSON, renders maps onto country boundaries and stores
//! them under `<prefix>/<country>/<date>/`.

pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod resolver;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Landing page
        .route("/", get(handlers::landing::landing_handler))
        // Generation
        .route("/generate", post(handlers::generate::generate_handler))
        .route("/generate/raw", post(handlers::generate::generate_raw_handler))
        .route("/generate/all", post(handlers::generate::generate_all_handler))
        // Boundaries
        .route("/countries", get(handlers::health::countries_handler))
        // Generated files
        .route("/meteo/files", get(handlers::files::list_files_handler))
        .route(
            "/meteo/:country/:date/:file",
            get(handlers::files::download_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
