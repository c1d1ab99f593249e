//! Generators for synthetic forecast records.
//!
//! Values follow simple deterministic patterns so that assertions can be
//! computed by hand.

use serde_json::{json, Value};

/// Consecutive ISO dates starting on 2026-01-07.
///
/// # Example
///
/// ```
/// use test_utils::forecast_dates;
///
/// let dates = forecast_dates(3);
/// assert_eq!(dates, vec!["2026-01-07", "2026-01-08", "2026-01-09"]);
/// ```
pub fn forecast_dates(days: usize) -> Vec<String> {
    (0..days)
        .map(|d| {
            // January and February only, which is plenty for tests
            let day_of_year = 7 + d;
            if day_of_year <= 31 {
                format!("2026-01-{:02}", day_of_year)
            } else {
                format!("2026-02-{:02}", day_of_year - 31)
            }
        })
        .collect()
}

/// A location record with `days` days of synthetic data.
///
/// Day `d` has `temperature_2m_max = 20 + d`, `temperature_2m_min = 10 + d`,
/// `wind_speed_10m_max = 10 + 5d`, `cloud_cover_max = 10d` (capped at 100)
/// and `weather_code` cycling through 0, 3, 61, 95.
pub fn location_record(
    name: &str,
    country: &str,
    latitude: f64,
    longitude: f64,
    priority: i64,
    days: usize,
) -> Value {
    const CODES: [i32; 4] = [0, 3, 61, 95];

    let time = forecast_dates(days);
    let weather_code: Vec<i32> = (0..days).map(|d| CODES[d % CODES.len()]).collect();
    let tmax: Vec<f64> = (0..days).map(|d| 20.0 + d as f64).collect();
    let tmin: Vec<f64> = (0..days).map(|d| 10.0 + d as f64).collect();
    let rain: Vec<f64> = (0..days).map(|d| if d % 2 == 0 { 0.0 } else { 1.5 }).collect();
    let wind: Vec<f64> = (0..days).map(|d| 10.0 + 5.0 * d as f64).collect();
    let cloud: Vec<f64> = (0..days).map(|d| (10.0 * d as f64).min(100.0)).collect();

    json!({
        "latitude": latitude,
        "longitude": longitude,
        "capital": country,
        "name": name,
        "priority": priority,
        "daily": {
            "time": time,
            "weather_code": weather_code,
            "temperature_2m_max": tmax,
            "temperature_2m_min": tmin,
            "precipitation_sum": rain,
            "wind_speed_10m_max": wind,
            "cloud_cover_max": cloud
        }
    })
}
