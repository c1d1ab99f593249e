//! Country and date resolution for a generation request.
//!
//! The record with the lowest `priority` is the representative record: its
//! country keys the output folder and its `daily.time[day_index]` is the
//! rendered date. Equal priorities keep the first record.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use meteo_common::{CountryBoundary, GenerationRequest, LocationRecord, MeteoError, MeteoResult};
use storage::BoundaryProvider;

/// Outcome of resolving a request against the available boundaries.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub country: String,
    pub date: String,
    /// Index of the representative record in `meteo_data`.
    pub representative: usize,
    pub boundary: Arc<CountryBoundary>,
}

/// Index of the record with the lowest priority.
pub fn representative_index(records: &[LocationRecord]) -> MeteoResult<usize> {
    records
        .iter()
        .enumerate()
        // min_by_key keeps the first of equal minima
        .min_by_key(|(_, record)| record.priority)
        .map(|(index, _)| index)
        .ok_or_else(|| MeteoError::validation("No meteo data provided"))
}

/// Lowercased country id, usable as a path segment.
pub fn normalize_country(code: &str) -> MeteoResult<String> {
    let code = code.trim().to_ascii_lowercase();
    if code.is_empty() {
        return Err(MeteoError::validation(
            "Country code (capital field) is required",
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MeteoError::validation(format!(
            "Invalid country code: {}",
            code
        )));
    }
    Ok(code)
}

/// Country id of the request.
pub fn resolve_country(request: &GenerationRequest) -> MeteoResult<String> {
    let index = representative_index(&request.meteo_data)?;
    normalize_country(&request.meteo_data[index].country_code)
}

/// `daily.time[day_index]` of a record as `YYYY-MM-DD`.
pub fn resolve_date(record: &LocationRecord, day_index: usize) -> MeteoResult<String> {
    let raw = record
        .daily
        .date(day_index)
        .ok_or_else(|| MeteoError::DayIndexOutOfRange {
            location: record.name.clone(),
            day_index,
            len: record.daily.len(),
        })?;

    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        MeteoError::validation(format!(
            "Location '{}': date '{}' is not YYYY-MM-DD",
            record.name, raw
        ))
    })?;

    Ok(date.format("%Y-%m-%d").to_string())
}

/// Resolve country, date and boundary of a request.
#[instrument(skip_all, fields(records = request.meteo_data.len(), day_index = request.day_index))]
pub async fn resolve(
    request: &GenerationRequest,
    boundaries: &dyn BoundaryProvider,
) -> MeteoResult<Resolution> {
    request.ensure_day_in_range()?;

    let representative = representative_index(&request.meteo_data)?;
    let record = &request.meteo_data[representative];
    let country = normalize_country(&record.country_code)?;
    let date = resolve_date(record, request.day_index)?;

    let boundary = boundaries.load(&country).await?;
    debug!(country = %country, date = %date, "Resolved request");

    Ok(Resolution {
        country,
        date,
        representative,
        boundary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storage::MemoryBoundaries;
    use test_utils::{algeria_request, location_record, ALGERIA_GEOJSON};

    fn request(records: Vec<serde_json::Value>) -> GenerationRequest {
        GenerationRequest::from_value(json!({ "meteo_data": records })).unwrap()
    }

    fn algeria() -> MemoryBoundaries {
        MemoryBoundaries::new().with(
            "dz",
            CountryBoundary::from_geojson_str(ALGERIA_GEOJSON).unwrap(),
        )
    }

    #[test]
    fn test_lowest_priority_wins() {
        let request = request(vec![
            location_record("Rabat", "ma", 34.0, -6.8, 2, 3),
            location_record("Alger", "DZ", 36.7, 3.0, 1, 3),
            location_record("Tunis", "tn", 36.8, 10.2, 3, 3),
        ]);
        assert_eq!(representative_index(&request.meteo_data).unwrap(), 1);
        assert_eq!(resolve_country(&request).unwrap(), "dz");
    }

    #[test]
    fn test_priority_tie_keeps_first() {
        let request = request(vec![
            location_record("Rabat", "ma", 34.0, -6.8, 1, 3),
            location_record("Alger", "dz", 36.7, 3.0, 1, 3),
        ]);
        assert_eq!(resolve_country(&request).unwrap(), "ma");
    }

    #[test]
    fn test_shared_country() {
        let request = GenerationRequest::from_value(algeria_request()).unwrap();
        assert_eq!(resolve_country(&request).unwrap(), "dz");
    }

    #[test]
    fn test_country_code_validation() {
        assert_eq!(normalize_country(" Dz ").unwrap(), "dz");
        assert!(normalize_country("../etc").is_err());
        assert!(normalize_country("").is_err());
    }

    #[test]
    fn test_resolve_date() {
        let request = request(vec![location_record("Alger", "dz", 36.7, 3.0, 1, 3)]);
        let record = &request.meteo_data[0];
        assert_eq!(resolve_date(record, 2).unwrap(), "2026-01-09");

        let err = resolve_date(record, 3).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_resolve_date_rejects_non_iso() {
        let mut value = location_record("Alger", "dz", 36.7, 3.0, 1, 1);
        value["daily"]["time"] = json!(["07/01/2026"]);
        let request = request(vec![value]);
        let err = resolve_date(&request.meteo_data[0], 0).unwrap_err();
        assert!(matches!(err, MeteoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resolve_loads_boundary() {
        let request = GenerationRequest::from_value(algeria_request()).unwrap();
        let resolution = resolve(&request, &algeria()).await.unwrap();
        assert_eq!(resolution.country, "dz");
        assert_eq!(resolution.date, "2026-01-07");
        assert_eq!(request.meteo_data[resolution.representative].name, "Alger");
    }

    #[test]
    fn test_resolve_unknown_country() {
        let request = request(vec![location_record("Paris", "fr", 48.8, 2.3, 1, 2)]);
        let err = tokio_test::block_on(resolve(&request, &algeria())).unwrap_err();
        assert!(matches!(err, MeteoError::MapNotFound { .. }));
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn test_resolve_day_out_of_range() {
        let mut request = request(vec![location_record("Alger", "dz", 36.7, 3.0, 1, 2)]);
        request.day_index = 2;
        let err = tokio_test::block_on(resolve(&request, &algeria())).unwrap_err();
        assert!(matches!(err, MeteoError::DayIndexOutOfRange { .. }));
    }
}
