//! HTTP mapping of service errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use meteo_common::MeteoError;

/// JSON error body: `{"error": "<code>", "detail": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
}

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub MeteoError);

impl From<MeteoError> for ApiError {
    fn from(err: MeteoError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        } else {
            warn!(error = %self.0, code = self.0.error_code(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.0.error_code(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_error() {
        let response = ApiError(MeteoError::validation("No meteo data provided")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(MeteoError::MapNotFound {
            country: "xx".into(),
            available: vec!["dz".into()],
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError(MeteoError::Render {
            map_type: "wind".into(),
            country: "dz".into(),
            message: "canvas too small".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
