//! Landing page handler.

use axum::Json;
use serde_json::{json, Value};

/// GET / - Service metadata
pub async fn landing_handler() -> Json<Value> {
    Json(json!({
        "service": "Weather Map API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /generate": "Generate weather map from meteo data",
            "POST /generate/raw": "Generate weather map (simplified)",
            "POST /generate/all": "Generate all 4 map types (maxtemp, mintemp, wind, sun)",
            "GET /countries": "List available country maps",
            "GET /meteo/files": "List all generated weather maps",
            "GET /health": "Health check",
            "GET /metrics": "Prometheus metrics"
        },
        "static_files": {
            "/meteo/{country}/{date}/{filename}": "Download generated weather maps"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_landing_lists_generation_endpoints() {
        let Json(body) = landing_handler().await;
        let endpoints = body["endpoints"].as_object().unwrap();
        assert!(endpoints.contains_key("POST /generate"));
        assert!(endpoints.contains_key("POST /generate/all"));
        assert_eq!(body["service"], "Weather Map API");
    }
}
