//! Browsing and downloading generated maps.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use meteo_common::MeteoError;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub url: String,
    pub size_kb: f64,
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub countries: BTreeMap<String, BTreeMap<String, Vec<FileEntry>>>,
    pub total_files: usize,
}

/// GET /meteo/files - Generated maps grouped by country and date
pub async fn list_files_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<FilesResponse>> {
    let index = state.artifacts().index().await?;

    let mut total_files = 0;
    let countries = index
        .into_iter()
        .map(|(country, dates)| {
            let dates = dates
                .into_iter()
                .map(|(date, artifacts)| {
                    let files: Vec<FileEntry> = artifacts
                        .iter()
                        .filter(|meta| meta.file_name().ends_with(".png"))
                        .map(|meta| FileEntry {
                            name: meta.file_name().to_string(),
                            url: format!("/meteo/{}/{}/{}", country, date, meta.file_name()),
                            size_kb: meta.size_kb(),
                        })
                        .collect();
                    total_files += files.len();
                    (date, files)
                })
                .filter(|(_, files)| !files.is_empty())
                .collect();
            (country, dates)
        })
        .collect();

    Ok(Json(FilesResponse {
        countries,
        total_files,
    }))
}

/// GET /meteo/:country/:date/:file - Download a generated map
pub async fn download_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((country, date, file)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    let artifacts = state.artifacts();
    let key = artifacts
        .paths()
        .file(&country, &date, &file)
        .ok_or_else(|| MeteoError::ArtifactNotFound(format!("{}/{}/{}", country, date, file)))?;

    let data = artifacts.get(&key).await?;
    let content_type = if file.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        data,
    )
        .into_response())
}
