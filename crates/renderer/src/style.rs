//! Map styling: palette, marker thresholds, label text and layout.

use meteo_common::forecast::DailyValues;
use meteo_common::MapType;

use crate::gradient::Color;
use crate::labels::{format_percent, format_value};

/// Fixed colors of a rendered map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPalette {
    pub background: Color,
    pub land: Color,
    pub edge: Color,
    pub title: Color,
}

impl Default for MapPalette {
    fn default() -> Self {
        Self {
            background: Color::rgb(255, 255, 255),
            land: Color::rgb(0xe8, 0xf4, 0xe8),
            edge: Color::rgb(0x33, 0x33, 0x33),
            title: Color::rgb(0x21, 0x21, 0x21),
        }
    }
}

/// Marker color for a location, by map type thresholds.
pub fn marker_color(map_type: MapType, day: &DailyValues) -> Color {
    let hex = match map_type {
        MapType::MaxTemp => match day.temperature_max {
            t if t > 25.0 => "#ff5722",
            t if t > 15.0 => "#ff9800",
            _ => "#2196f3",
        },
        MapType::MinTemp => match day.temperature_min {
            t if t < 5.0 => "#2196f3",
            t if t < 15.0 => "#03a9f4",
            _ => "#ff9800",
        },
        MapType::Wind => match day.wind_speed_max {
            w if w > 30.0 => "#d32f2f",
            w if w > 20.0 => "#ff9800",
            _ => "#4caf50",
        },
        MapType::Sun => match day.sunshine() {
            Some(s) if s > 70.0 => "#fdd835",
            Some(s) if s > 40.0 => "#ffb300",
            _ => "#90a4ae",
        },
        MapType::General => "#d32f2f",
    };
    Color::from_hex(hex).unwrap_or(Color::rgb(0, 0, 0))
}

/// Scalar value a location contributes to the map's field.
pub fn field_value(map_type: MapType, day: &DailyValues) -> Option<f64> {
    match map_type {
        MapType::MaxTemp => Some(day.temperature_max),
        MapType::MinTemp => Some(day.temperature_min),
        MapType::Wind => Some(day.wind_speed_max),
        MapType::Sun => day.sunshine(),
        MapType::General => None,
    }
}

/// Label lines: the location name followed by the map type's values.
pub fn label_lines(map_type: MapType, name: &str, day: &DailyValues) -> Vec<String> {
    let mut lines = vec![name.to_string()];
    match map_type {
        MapType::MaxTemp => lines.push(format!("{}°C", format_value(day.temperature_max))),
        MapType::MinTemp => lines.push(format!("{}°C", format_value(day.temperature_min))),
        MapType::Wind => lines.push(format!("{} km/h", format_value(day.wind_speed_max))),
        MapType::Sun => lines.push(match day.sunshine() {
            Some(s) => format!("{}%", format_percent(s)),
            None => "n/a".to_string(),
        }),
        MapType::General => {
            lines.push(format!(
                "{}° / {}°",
                format_value(day.temperature_max),
                format_value(day.temperature_min)
            ));
            if day.precipitation > 0.0 {
                lines.push(format!("{} mm", format_value(day.precipitation)));
            }
            if day.wind_speed_max > 15.0 {
                lines.push(format!("{} km/h", format_value(day.wind_speed_max)));
            }
            if let Some(cloud) = day.cloud_cover_max.filter(|c| *c > 50.0) {
                lines.push(format!("cloud {}%", format_percent(cloud)));
            }
        }
    }
    lines
}

/// Label placement for a priority: offset in degrees and font size in
/// points. Higher-priority (lower value) locations get larger labels.
pub fn label_layout(priority: i64) -> (f64, f32) {
    let offset = if priority <= 2 { 0.2 } else { 0.15 };
    let size = match priority {
        1 => 10.0,
        2 => 9.0,
        _ => 8.0,
    };
    (offset, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DailyValues {
        DailyValues {
            weather_code: 95,
            temperature_max: 18.5,
            temperature_min: 9.0,
            precipitation: 4.2,
            wind_speed_max: 22.0,
            cloud_cover_max: Some(80.0),
        }
    }

    #[test]
    fn test_marker_thresholds() {
        let d = day();
        assert_eq!(marker_color(MapType::MaxTemp, &d), Color::from_hex("#ff9800").unwrap());
        assert_eq!(marker_color(MapType::MinTemp, &d), Color::from_hex("#03a9f4").unwrap());
        assert_eq!(marker_color(MapType::Wind, &d), Color::from_hex("#ff9800").unwrap());
        // 20% sunshine
        assert_eq!(marker_color(MapType::Sun, &d), Color::from_hex("#90a4ae").unwrap());
        assert_eq!(marker_color(MapType::General, &d), Color::from_hex("#d32f2f").unwrap());
    }

    #[test]
    fn test_general_label_includes_conditional_lines() {
        let lines = label_lines(MapType::General, "Alger", &day());
        assert_eq!(
            lines,
            vec!["Alger", "18.5° / 9.0°", "4.2 mm", "22.0 km/h", "cloud 80%"]
        );

        let calm = DailyValues {
            precipitation: 0.0,
            wind_speed_max: 10.0,
            cloud_cover_max: None,
            ..day()
        };
        assert_eq!(label_lines(MapType::General, "Oran", &calm).len(), 2);
    }

    #[test]
    fn test_scalar_labels() {
        assert_eq!(label_lines(MapType::MaxTemp, "A", &day())[1], "18.5°C");
        assert_eq!(label_lines(MapType::Wind, "A", &day())[1], "22.0 km/h");
        assert_eq!(label_lines(MapType::Sun, "A", &day())[1], "20%");

        let no_cloud = DailyValues { cloud_cover_max: None, ..day() };
        assert_eq!(label_lines(MapType::Sun, "A", &no_cloud)[1], "n/a");
        assert_eq!(field_value(MapType::Sun, &no_cloud), None);
    }

    #[test]
    fn test_label_layout_by_priority() {
        assert_eq!(label_layout(1), (0.2, 10.0));
        assert_eq!(label_layout(2), (0.2, 9.0));
        assert_eq!(label_layout(5), (0.15, 8.0));
    }
}
