//! Storage layout for generated map artifacts.
//!
//! Layout: `{prefix}/{country}/{date}/{file}` where `file` is
//! `{map_type}.png` for fixed maps and `weather_map_{HHMMSS}[_{n}].png` for
//! timestamped general maps.

use chrono::NaiveTime;
use meteo_common::MapType;

/// Default top-level folder for artifacts.
pub const DEFAULT_PREFIX: &str = "meteo";

/// Path builder for consistent storage layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    prefix: String,
}

impl Default for StoragePath {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl StoragePath {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_matches('/').to_string();
        Self {
            prefix: if prefix.is_empty() {
                DEFAULT_PREFIX.to_string()
            } else {
                prefix
            },
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build path for a fixed-name map.
    /// Format: {prefix}/{country}/{date}/{map_type}.png
    ///
    /// Returns `None` for general maps, which are timestamped.
    pub fn fixed(&self, country: &str, date: &str, map_type: MapType) -> Option<String> {
        map_type
            .file_stem()
            .map(|stem| format!("{}/{}/{}/{}.png", self.prefix, country, date, stem))
    }

    /// Build path for a timestamped general map.
    /// Format: {prefix}/{country}/{date}/weather_map_{HHMMSS}.png, with
    /// `_{attempt}` appended before the extension when `attempt > 0`.
    pub fn timestamped(&self, country: &str, date: &str, time: NaiveTime, attempt: u32) -> String {
        let stamp = time.format("%H%M%S");
        if attempt == 0 {
            format!("{}/{}/{}/weather_map_{}.png", self.prefix, country, date, stamp)
        } else {
            format!(
                "{}/{}/{}/weather_map_{}_{}.png",
                self.prefix, country, date, stamp, attempt
            )
        }
    }

    /// Build the key of a stored file from its URL segments.
    pub fn file(&self, country: &str, date: &str, file: &str) -> Option<String> {
        if [country, date, file].iter().all(|s| is_safe_segment(s)) {
            Some(format!("{}/{}/{}/{}", self.prefix, country, date, file))
        } else {
            None
        }
    }

    /// Split a key under this prefix into (country, date, file).
    pub fn parse<'a>(&self, key: &'a str) -> Option<(&'a str, &'a str, &'a str)> {
        let rest = key.strip_prefix(self.prefix.as_str())?.strip_prefix('/')?;
        let mut parts = rest.split('/');
        let country = parts.next()?;
        let date = parts.next()?;
        let file = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some((country, date, file))
    }
}

/// A single path segment without separators or dot-only names.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_paths() {
        let paths = StoragePath::default();
        assert_eq!(
            paths.fixed("dz", "2026-01-07", MapType::MaxTemp).as_deref(),
            Some("meteo/dz/2026-01-07/maxtemp.png")
        );
        assert_eq!(
            paths.fixed("ma", "2026-02-01", MapType::Sun).as_deref(),
            Some("meteo/ma/2026-02-01/sun.png")
        );
        assert_eq!(paths.fixed("dz", "2026-01-07", MapType::General), None);
    }

    #[test]
    fn test_timestamped_paths() {
        let paths = StoragePath::new("/out/");
        let time = NaiveTime::from_hms_opt(9, 5, 3).unwrap();
        assert_eq!(
            paths.timestamped("dz", "2026-01-07", time, 0),
            "out/dz/2026-01-07/weather_map_090503.png"
        );
        assert_eq!(
            paths.timestamped("dz", "2026-01-07", time, 2),
            "out/dz/2026-01-07/weather_map_090503_2.png"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let paths = StoragePath::default();
        let key = paths.fixed("dz", "2026-01-07", MapType::Wind).unwrap();
        assert_eq!(paths.parse(&key), Some(("dz", "2026-01-07", "wind.png")));
        assert_eq!(paths.parse("other/dz/2026-01-07/wind.png"), None);
        assert_eq!(paths.parse("meteo/dz/wind.png"), None);
        assert_eq!(paths.parse("meteo/dz/2026-01-07/x/wind.png"), None);
    }

    #[test]
    fn test_file_rejects_traversal() {
        let paths = StoragePath::default();
        assert_eq!(
            paths.file("dz", "2026-01-07", "sun.png").as_deref(),
            Some("meteo/dz/2026-01-07/sun.png")
        );
        assert_eq!(paths.file("..", "2026-01-07", "sun.png"), None);
        assert_eq!(paths.file("dz", "2026-01-07", "a/b.png"), None);
        assert_eq!(paths.file("dz", "", "sun.png"), None);
    }
}
