//! Health, country listing and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub maps_loaded: usize,
}

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub available_countries: Vec<String>,
    pub count: usize,
}

/// GET /health - Liveness with the number of boundary files
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let maps_loaded = match state.boundaries.available().await {
        Ok(countries) => countries.len(),
        Err(e) => {
            warn!(error = %e, "Failed to list boundaries");
            0
        }
    };

    Json(HealthResponse {
        status: "healthy",
        maps_loaded,
    })
}

/// GET /countries - Available country boundaries
pub async fn countries_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<CountriesResponse>> {
    let available_countries = state.boundaries.available().await?;
    Ok(Json(CountriesResponse {
        count: available_countries.len(),
        available_countries,
    }))
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
