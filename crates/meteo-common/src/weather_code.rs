//! WMO weather interpretation codes (WW) as used by Open-Meteo.

use serde::{Deserialize, Serialize};

/// Coarse weather condition derived from a WMO code, one per icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    HeavyRain,
    FreezingRain,
    Snow,
    HeavySnow,
    SnowGrains,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    ThunderstormHail,
    Unknown,
}

impl WeatherCondition {
    pub fn from_wmo(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 => Self::Rain,
            65 => Self::HeavyRain,
            66 | 67 => Self::FreezingRain,
            71 | 73 => Self::Snow,
            75 => Self::HeavySnow,
            77 => Self::SnowGrains,
            80 | 81 | 82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormHail,
            _ => Self::Unknown,
        }
    }

    pub fn has_cloud(&self) -> bool {
        !matches!(self, Self::Clear | Self::Unknown)
    }

    pub fn has_sun(&self) -> bool {
        matches!(
            self,
            Self::Clear | Self::MainlyClear | Self::PartlyCloudy | Self::RainShowers
        )
    }

    pub fn has_rain(&self) -> bool {
        matches!(
            self,
            Self::Drizzle
                | Self::FreezingDrizzle
                | Self::Rain
                | Self::HeavyRain
                | Self::FreezingRain
                | Self::RainShowers
                | Self::Thunderstorm
                | Self::ThunderstormHail
        )
    }

    pub fn has_snow(&self) -> bool {
        matches!(
            self,
            Self::FreezingDrizzle
                | Self::FreezingRain
                | Self::Snow
                | Self::HeavySnow
                | Self::SnowGrains
                | Self::SnowShowers
        )
    }
}

/// Human-readable description of a WMO weather code.
pub fn description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thunderstorm_codes() {
        assert_eq!(WeatherCondition::from_wmo(95), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo(99), WeatherCondition::ThunderstormHail);
        assert!(WeatherCondition::from_wmo(95).has_rain());
        assert_eq!(description(95), "Thunderstorm");
    }

    #[test]
    fn test_unknown_code() {
        let condition = WeatherCondition::from_wmo(42);
        assert_eq!(condition, WeatherCondition::Unknown);
        assert!(!condition.has_cloud());
        assert_eq!(description(42), "Unknown");
    }

    #[test]
    fn test_freezing_is_rain_and_snow() {
        let condition = WeatherCondition::from_wmo(66);
        assert!(condition.has_rain());
        assert!(condition.has_snow());
    }
}
