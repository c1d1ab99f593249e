//! Forecast payload types.
//!
//! Requests carry one or more forecast points in the Open-Meteo daily layout.
//! Three wire shapes are accepted:
//! - `{"meteo_data": [...], "title": ..., "day_index": ..., "map_type": ...}`
//! - a bare JSON array of location records
//! - `{"json": [...]}` or `{"json": "<array encoded as a string>"}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MeteoError, MeteoResult};
use crate::map_type::MapType;

/// Parallel daily series, indexed by day offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
    pub wind_speed_10m_max: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover_max: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover_min: Option<Vec<f64>>,
}

/// Values of a single forecast day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyValues {
    pub weather_code: i32,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation: f64,
    pub wind_speed_max: f64,
    pub cloud_cover_max: Option<f64>,
}

impl DailyValues {
    /// Sunshine percentage derived from the day's maximum cloud cover.
    pub fn sunshine(&self) -> Option<f64> {
        self.cloud_cover_max.map(|c| (100.0 - c).clamp(0.0, 100.0))
    }
}

impl DailySeries {
    /// Number of forecast days.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Check that every present series has the same length as `time`.
    pub fn validate(&self) -> Result<(), String> {
        let expected = self.time.len();
        let mut lengths = vec![
            ("weather_code", self.weather_code.len()),
            ("temperature_2m_max", self.temperature_2m_max.len()),
            ("temperature_2m_min", self.temperature_2m_min.len()),
            ("precipitation_sum", self.precipitation_sum.len()),
            ("wind_speed_10m_max", self.wind_speed_10m_max.len()),
        ];
        if let Some(c) = &self.cloud_cover_max {
            lengths.push(("cloud_cover_max", c.len()));
        }
        if let Some(c) = &self.cloud_cover_min {
            lengths.push(("cloud_cover_min", c.len()));
        }

        for (name, len) in lengths {
            if len != expected {
                return Err(format!(
                    "daily.{} has {} values but daily.time has {}",
                    name, len, expected
                ));
            }
        }
        Ok(())
    }

    /// Date string of a day, if in range.
    pub fn date(&self, index: usize) -> Option<&str> {
        self.time.get(index).map(String::as_str)
    }

    /// Values for one day, if every required series reaches that index.
    pub fn day(&self, index: usize) -> Option<DailyValues> {
        Some(DailyValues {
            weather_code: *self.weather_code.get(index)?,
            temperature_max: *self.temperature_2m_max.get(index)?,
            temperature_min: *self.temperature_2m_min.get(index)?,
            precipitation: *self.precipitation_sum.get(index)?,
            wind_speed_max: *self.wind_speed_10m_max.get(index)?,
            cloud_cover_max: self
                .cloud_cover_max
                .as_ref()
                .and_then(|c| c.get(index).copied()),
        })
    }
}

/// One forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Country identifier; `capital` on the wire in Open-Meteo exports.
    #[serde(alias = "capital")]
    pub country_code: String,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i64,
    pub daily: DailySeries,
}

fn default_priority() -> i64 {
    1
}

impl LocationRecord {
    /// Name shown in map labels.
    pub fn label_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.name,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} is out of range", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} is out of range", self.longitude));
        }
        if self.country_code.trim().is_empty() {
            return Err("country code (capital field) is required".to_string());
        }
        self.daily.validate()
    }
}

/// A validated map generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub meteo_data: Vec<LocationRecord>,
    pub title: Option<String>,
    pub day_index: usize,
    pub map_type: MapType,
}

#[derive(Deserialize)]
struct RequestEnvelope {
    meteo_data: Vec<LocationRecord>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    day_index: Option<usize>,
    #[serde(default)]
    map_type: Option<MapType>,
}

impl GenerationRequest {
    /// Parse and validate a raw HTTP body.
    pub fn from_body(body: &[u8]) -> MeteoResult<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Parse and validate any of the accepted wire shapes.
    pub fn from_value(value: Value) -> MeteoResult<Self> {
        let request = match value {
            Value::Array(_) => Self {
                meteo_data: parse_records(value)?,
                title: None,
                day_index: 0,
                map_type: MapType::General,
            },
            Value::Object(mut map) => {
                if let Some(inner) = map.remove("json") {
                    let inner = match inner {
                        Value::String(s) => serde_json::from_str(&s)?,
                        other => other,
                    };
                    return Self::from_value(inner);
                }
                if !map.contains_key("meteo_data") {
                    return Err(MeteoError::validation(
                        "Data must be a list of weather locations",
                    ));
                }
                let envelope: RequestEnvelope = serde_json::from_value(Value::Object(map))
                    .map_err(|e| MeteoError::validation(format!("Invalid meteo data: {}", e)))?;
                Self {
                    meteo_data: envelope.meteo_data,
                    title: envelope.title.filter(|t| !t.trim().is_empty()),
                    day_index: envelope.day_index.unwrap_or(0),
                    map_type: envelope.map_type.unwrap_or_default(),
                }
            }
            _ => {
                return Err(MeteoError::validation(
                    "Data must be a list of weather locations",
                ))
            }
        };

        request.validate()?;
        Ok(request)
    }

    /// The same data with the defaults of the simplified endpoint.
    pub fn simplified(mut self) -> Self {
        self.title = None;
        self.day_index = 0;
        self.map_type = MapType::General;
        self
    }

    fn validate(&self) -> MeteoResult<()> {
        if self.meteo_data.is_empty() {
            return Err(MeteoError::validation("No meteo data provided"));
        }
        for record in &self.meteo_data {
            record.validate().map_err(|msg| {
                MeteoError::validation(format!("Location '{}': {}", record.name, msg))
            })?;
        }
        Ok(())
    }

    /// Fail if `day_index` falls outside any record's series.
    pub fn ensure_day_in_range(&self) -> MeteoResult<()> {
        for record in &self.meteo_data {
            let len = record.daily.len();
            if self.day_index >= len {
                return Err(MeteoError::DayIndexOutOfRange {
                    location: record.name.clone(),
                    day_index: self.day_index,
                    len,
                });
            }
        }
        Ok(())
    }
}

fn parse_records(value: Value) -> MeteoResult<Vec<LocationRecord>> {
    serde_json::from_value(value)
        .map_err(|e| MeteoError::validation(format!("Invalid meteo data: {}", e)))
}
