//! Common test fixtures for meteo-maps tests.
//!
//! The Algeria fixtures mirror a real Open-Meteo daily export: `capital`
//! carries the country code and the first forecast day is 2026-01-07 with a
//! thunderstorm (WMO 95) over Algiers.

use serde_json::{json, Value};

/// Country code used by the Algeria fixtures.
pub const ALGERIA: &str = "dz";

/// First forecast date of the Algeria fixtures.
pub const ALGERIA_FIRST_DATE: &str = "2026-01-07";

/// Simplified outline of Algeria (about 20 vertices).
pub const ALGERIA_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [{
    "type": "Feature",
    "properties": {"name": "Algeria", "iso_a2": "DZ"},
    "geometry": {
      "type": "Polygon",
      "coordinates": [[
        [-8.67, 27.50], [-8.67, 27.00], [-4.80, 25.00], [1.00, 21.10],
        [3.20, 19.10], [5.70, 19.60], [11.90, 23.50], [9.70, 26.50],
        [9.90, 27.80], [9.50, 30.30], [8.40, 32.70], [8.40, 36.90],
        [3.00, 36.90], [-2.20, 35.10], [-1.80, 34.50], [-1.20, 32.60],
        [-3.70, 31.60], [-8.67, 28.70], [-8.67, 27.50]
      ]]
    }
  }]
}"#;

/// GeoJSON Feature with an axis-aligned square polygon.
pub fn square_geojson(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> String {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [min_lon, min_lat],
                [max_lon, min_lat],
                [max_lon, max_lat],
                [min_lon, max_lat],
                [min_lon, min_lat]
            ]]
        }
    })
    .to_string()
}

/// Algiers, priority 1, three forecast days from 2026-01-07.
pub fn algiers_record() -> Value {
    json!({
        "latitude": 36.75,
        "longitude": 3.06,
        "generationtime_ms": 0.21,
        "elevation": 25.0,
        "capital": ALGERIA,
        "name": "Alger",
        "display_name": "Alger",
        "priority": 1,
        "daily_units": {
            "temperature_2m_max": "°C",
            "wind_speed_10m_max": "km/h"
        },
        "daily": {
            "time": ["2026-01-07", "2026-01-08", "2026-01-09"],
            "weather_code": [95, 61, 2],
            "temperature_2m_max": [16.4, 15.1, 17.8],
            "temperature_2m_min": [9.2, 8.7, 7.9],
            "precipitation_sum": [12.3, 4.1, 0.0],
            "wind_speed_10m_max": [34.2, 21.0, 12.5],
            "cloud_cover_max": [100, 85, 40],
            "cloud_cover_min": [60, 30, 0]
        }
    })
}

/// Oran, priority 2.
pub fn oran_record() -> Value {
    json!({
        "latitude": 35.70,
        "longitude": -0.63,
        "capital": ALGERIA,
        "name": "Oran",
        "priority": 2,
        "daily": {
            "time": ["2026-01-07", "2026-01-08", "2026-01-09"],
            "weather_code": [3, 80, 1],
            "temperature_2m_max": [17.0, 16.2, 18.1],
            "temperature_2m_min": [8.1, 9.0, 6.5],
            "precipitation_sum": [0.0, 2.4, 0.0],
            "wind_speed_10m_max": [18.0, 25.3, 9.4],
            "cloud_cover_max": [90, 70, 20]
        }
    })
}

/// Tamanrasset, priority 3, deep in the Sahara.
pub fn tamanrasset_record() -> Value {
    json!({
        "latitude": 22.79,
        "longitude": 5.53,
        "capital": ALGERIA,
        "name": "Tamanrasset",
        "display_name": "Tamanghasset",
        "priority": 3,
        "daily": {
            "time": ["2026-01-07", "2026-01-08", "2026-01-09"],
            "weather_code": [0, 0, 1],
            "temperature_2m_max": [24.6, 25.3, 26.0],
            "temperature_2m_min": [6.0, 5.4, 7.2],
            "precipitation_sum": [0.0, 0.0, 0.0],
            "wind_speed_10m_max": [14.0, 11.2, 16.8],
            "cloud_cover_max": [0, 5, 10]
        }
    })
}

/// Single-record Algeria request in the envelope format.
pub fn algeria_single_request() -> Value {
    json!({ "meteo_data": [algiers_record()] })
}

/// Three Algerian cities in the envelope format.
pub fn algeria_request() -> Value {
    json!({
        "meteo_data": [tamanrasset_record(), oran_record(), algiers_record()],
        "day_index": 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_series_have_equal_lengths() {
        for record in [algiers_record(), oran_record(), tamanrasset_record()] {
            let daily = record["daily"].as_object().unwrap();
            let len = daily["time"].as_array().unwrap().len();
            for (_, series) in daily {
                assert_eq!(series.as_array().unwrap().len(), len);
            }
        }
    }

    #[test]
    fn test_algeria_geojson_is_closed() {
        let doc: Value = serde_json::from_str(ALGERIA_GEOJSON).unwrap();
        let ring = doc["features"][0]["geometry"]["coordinates"][0]
            .as_array()
            .unwrap();
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_square_geojson() {
        let doc: Value = serde_json::from_str(&square_geojson(0.0, 0.0, 1.0, 2.0)).unwrap();
        assert_eq!(doc["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
    }
}
