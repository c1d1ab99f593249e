//! Map types and their rendering metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MeteoError;

/// The kind of map rendered for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    /// Composite forecast with weather icons; stored under a timestamped name.
    #[default]
    General,
    MaxTemp,
    MinTemp,
    Wind,
    Sun,
}

impl MapType {
    /// The four fixed-name map types produced by `/generate/all`, in order.
    pub const FIXED: [MapType; 4] = [
        MapType::MaxTemp,
        MapType::MinTemp,
        MapType::Wind,
        MapType::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::General => "general",
            MapType::MaxTemp => "maxtemp",
            MapType::MinTemp => "mintemp",
            MapType::Wind => "wind",
            MapType::Sun => "sun",
        }
    }

    /// Title prefix drawn above the map.
    pub fn title_prefix(&self) -> &'static str {
        match self {
            MapType::General => "Weather Forecast",
            MapType::MaxTemp => "Maximum Temperature",
            MapType::MinTemp => "Minimum Temperature",
            MapType::Wind => "Wind Speed",
            MapType::Sun => "Sunshine",
        }
    }

    /// File stem for fixed-name artifacts. `None` for timestamped maps.
    pub fn file_stem(&self) -> Option<&'static str> {
        match self {
            MapType::General => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapType {
    type Err = MeteoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" | "" => Ok(MapType::General),
            "maxtemp" => Ok(MapType::MaxTemp),
            "mintemp" => Ok(MapType::MinTemp),
            "wind" => Ok(MapType::Wind),
            "sun" => Ok(MapType::Sun),
            other => Err(MeteoError::validation(format!(
                "Unknown map type '{}'. Expected one of: general, maxtemp, mintemp, wind, sun",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_map_types_have_stems() {
        for map_type in MapType::FIXED {
            assert_eq!(map_type.file_stem(), Some(map_type.as_str()));
        }
        assert_eq!(MapType::General.file_stem(), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("MAXTEMP".parse::<MapType>().unwrap(), MapType::MaxTemp);
        assert_eq!("sun".parse::<MapType>().unwrap().to_string(), "sun");
        assert!("rain".parse::<MapType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&MapType::MinTemp).unwrap();
        assert_eq!(json, "\"mintemp\"");
        let parsed: MapType = serde_json::from_str("\"wind\"").unwrap();
        assert_eq!(parsed, MapType::Wind);
    }
}
