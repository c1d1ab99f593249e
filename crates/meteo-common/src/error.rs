//! Error types for meteo-maps services.

use thiserror::Error;

/// Result type alias using MeteoError.
pub type MeteoResult<T> = Result<T, MeteoError>;

/// Primary error type for map generation.
#[derive(Debug, Error)]
pub enum MeteoError {
    // === Request Errors ===
    #[error("{0}")]
    Validation(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("day_index {day_index} is out of range for '{location}' ({len} days available)")]
    DayIndexOutOfRange {
        location: String,
        day_index: usize,
        len: usize,
    },

    // === Lookup Errors ===
    #[error("Map not found for country: {country}. Available: {available:?}")]
    MapNotFound {
        country: String,
        available: Vec<String>,
    },

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    // === Rendering Errors ===
    #[error("Failed to render {map_type} map for '{country}': {message}")]
    Render {
        map_type: String,
        country: String,
        message: String,
    },

    #[error("Invalid boundary for '{country}': {message}")]
    InvalidBoundary { country: String, message: String },

    // === Infrastructure Errors ===
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl MeteoError {
    pub fn validation(message: impl Into<String>) -> Self {
        MeteoError::Validation(message.into())
    }

    /// Error code reported in JSON error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            MeteoError::Validation(_)
            | MeteoError::InvalidJson(_)
            | MeteoError::DayIndexOutOfRange { .. } => "ValidationError",
            MeteoError::MapNotFound { .. } => "MapNotFoundError",
            MeteoError::ArtifactNotFound(_) => "NotFound",
            MeteoError::Render { .. } | MeteoError::InvalidBoundary { .. } => "RenderError",
            MeteoError::Storage(_) => "StorageError",
            MeteoError::Internal(_) => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MeteoError::Validation(_)
            | MeteoError::InvalidJson(_)
            | MeteoError::DayIndexOutOfRange { .. } => 400,

            MeteoError::MapNotFound { .. } | MeteoError::ArtifactNotFound(_) => 404,

            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

impl From<std::io::Error> for MeteoError {
    fn from(err: std::io::Error) -> Self {
        MeteoError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for MeteoError {
    fn from(err: serde_json::Error) -> Self {
        MeteoError::InvalidJson(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(MeteoError::validation("empty").http_status_code(), 400);
        assert_eq!(
            MeteoError::DayIndexOutOfRange {
                location: "Alger".into(),
                day_index: 7,
                len: 7
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            MeteoError::MapNotFound {
                country: "xx".into(),
                available: vec![]
            }
            .http_status_code(),
            404
        );
        assert_eq!(
            MeteoError::Render {
                map_type: "wind".into(),
                country: "dz".into(),
                message: "boom".into()
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(MeteoError::InvalidJson("eof".into()).error_code(), "ValidationError");
        assert_eq!(
            MeteoError::MapNotFound {
                country: "xx".into(),
                available: vec!["dz".into()]
            }
            .error_code(),
            "MapNotFoundError"
        );
        assert_eq!(MeteoError::Storage("disk".into()).error_code(), "StorageError");
    }

    #[test]
    fn test_render_error_mentions_map_type_and_country() {
        let err = MeteoError::Render {
            map_type: "sun".into(),
            country: "dz".into(),
            message: "empty canvas".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sun"));
        assert!(msg.contains("dz"));
    }

    #[test]
    fn test_serde_error_is_client_error() {
        let err: MeteoError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.is_client_error());
    }
}
