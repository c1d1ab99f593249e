//! Map generation handlers.
//!
//! Every endpoint accepts the envelope `{"meteo_data": [...]}`, a bare array
//! of location records, or `{"json": ...}` wrapping either an array or its
//! string encoding.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, instrument};

use meteo_common::GenerationRequest;

use crate::error::ApiResult;
use crate::generation::GeneratedMap;
use crate::resolver::resolve;
use crate::state::AppState;

/// Header carrying the storage key of the generated map.
pub static X_SAVED_PATH: HeaderName = HeaderName::from_static("x-saved-path");

#[derive(Debug, Serialize)]
pub struct GenerateAllResponse {
    pub status: &'static str,
    pub country: String,
    pub date: String,
    pub generated_files: BTreeMap<&'static str, String>,
    pub count: usize,
}

/// POST /generate - Render one map (default `general`) and return the PNG
#[instrument(skip_all, fields(body_size = body.len()))]
pub async fn generate_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let request = GenerationRequest::from_body(&body)?;
    generate_one(&state, request).await
}

/// POST /generate/raw - Same as `/generate` with default options
#[instrument(skip_all, fields(body_size = body.len()))]
pub async fn generate_raw_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let request = GenerationRequest::from_body(&body)?.simplified();
    generate_one(&state, request).await
}

/// POST /generate/all - Render maxtemp, mintemp, wind and sun maps
#[instrument(skip_all, fields(body_size = body.len()))]
pub async fn generate_all_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<GenerateAllResponse>> {
    let request = GenerationRequest::from_body(&body)?;
    let resolution = resolve(&request, state.boundaries.as_ref()).await?;

    let maps = state.generator.generate_all(&request, &resolution).await?;
    let generated_files: BTreeMap<&'static str, String> = maps
        .into_iter()
        .map(|map| (map.map_type.as_str(), map.artifact.key))
        .collect();

    info!(
        country = %resolution.country,
        date = %resolution.date,
        count = generated_files.len(),
        "Generated all maps"
    );

    Ok(Json(GenerateAllResponse {
        status: "success",
        count: generated_files.len(),
        country: resolution.country,
        date: resolution.date,
        generated_files,
    }))
}

async fn generate_one(state: &AppState, request: GenerationRequest) -> ApiResult<Response> {
    let resolution = resolve(&request, state.boundaries.as_ref()).await?;
    let map = state
        .generator
        .generate(
            &request,
            &resolution,
            request.map_type,
            request.title.as_deref(),
        )
        .await?;

    Ok(png_response(&resolution.country, map))
}

fn png_response(country: &str, map: GeneratedMap) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=weather_map_{}.png", country),
        ),
        (X_SAVED_PATH.clone(), map.artifact.key),
    ];

    (StatusCode::OK, headers, map.png).into_response()
}
