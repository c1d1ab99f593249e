//! Color scales and grid resampling for choropleth overlays.

use image::Rgba;
use meteo_common::MapType;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    /// Blend `self` over an opaque background with the given opacity.
    pub fn over(self, background: Rgba<u8>, opacity: f32) -> Rgba<u8> {
        let t = (opacity * self.a as f32 / 255.0).clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * t + bg as f32 * (1.0 - t)).round() as u8;
        Rgba([
            mix(self.r, background[0]),
            mix(self.g, background[1]),
            mix(self.b, background[2]),
            255,
        ])
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)) as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)) as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)) as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)) as u8,
    )
}

/// Piecewise-linear scale through `(value, color)` stops sorted by value.
fn ramp(value: f32, stops: &[(f32, Color)]) -> Color {
    let (first_value, first_color) = stops[0];
    if value.is_nan() || value <= first_value {
        return first_color;
    }
    for pair in stops.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if value < hi {
            return interpolate_color(lo_color, hi_color, (value - lo) / (hi - lo));
        }
    }
    stops[stops.len() - 1].1
}

const TEMPERATURE_STOPS: [(f32, Color); 8] = [
    (-50.0, Color::rgb(25, 0, 76)),    // deep purple
    (-30.0, Color::rgb(0, 0, 255)),    // blue
    (0.0, Color::rgb(0, 255, 255)),    // cyan
    (10.0, Color::rgb(0, 255, 0)),     // green
    (20.0, Color::rgb(255, 255, 0)),   // yellow
    (30.0, Color::rgb(255, 165, 0)),   // orange
    (40.0, Color::rgb(255, 0, 0)),     // red
    (50.0, Color::rgb(139, 0, 0)),     // dark red
];

/// Temperature color scale (Celsius)
pub fn temperature_color(temp_celsius: f32) -> Color {
    ramp(temp_celsius, &TEMPERATURE_STOPS)
}

const WIND_STOPS_MS: [(f32, Color); 6] = [
    (0.0, Color::rgb(200, 200, 200)), // calm
    (5.0, Color::rgb(0, 200, 255)),   // light breeze
    (10.0, Color::rgb(255, 255, 0)),  // moderate
    (15.0, Color::rgb(255, 165, 0)),  // fresh gale
    (20.0, Color::rgb(139, 0, 0)),    // strong
    (25.0, Color::rgb(75, 0, 0)),
];

/// Wind speed color scale. Input is km/h, stops are in m/s.
pub fn wind_speed_color(speed_kmh: f32) -> Color {
    ramp(speed_kmh / 3.6, &WIND_STOPS_MS)
}

const SUNSHINE_STOPS: [(f32, Color); 4] = [
    (0.0, Color::rgb(144, 164, 174)),  // overcast grey
    (40.0, Color::rgb(255, 236, 179)), // pale
    (70.0, Color::rgb(253, 216, 53)),  // sunny
    (100.0, Color::rgb(255, 179, 0)),  // full sun
];

/// Sunshine color scale (0-100%)
pub fn sunshine_color(percent: f32) -> Color {
    ramp(percent, &SUNSHINE_STOPS)
}

/// Color scale of a map type's scalar overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Temperature,
    WindSpeed,
    Sunshine,
}

impl ColorScale {
    /// `None` for general maps, which carry no scalar field.
    pub fn for_map_type(map_type: MapType) -> Option<Self> {
        match map_type {
            MapType::MaxTemp | MapType::MinTemp => Some(ColorScale::Temperature),
            MapType::Wind => Some(ColorScale::WindSpeed),
            MapType::Sun => Some(ColorScale::Sunshine),
            MapType::General => None,
        }
    }

    pub fn color(&self, value: f32) -> Color {
        match self {
            ColorScale::Temperature => temperature_color(value),
            ColorScale::WindSpeed => wind_speed_color(value),
            ColorScale::Sunshine => sunshine_color(value),
        }
    }
}

/// Resample grid data to a different resolution using bilinear interpolation.
///
/// Source and destination corners are aligned, so a destination pixel at
/// `x` samples the source at `x * (src_width - 1) / (dst_width - 1)`.
pub fn resample_grid(
    data: &[f32],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Vec<f32> {
    if src_width == dst_width && src_height == dst_height {
        return data.to_vec();
    }

    let mut output = vec![0.0f32; dst_width * dst_height];
    if src_width == 0 || src_height == 0 {
        return output;
    }

    let ratio = |src: usize, dst: usize| {
        if dst > 1 {
            (src - 1) as f32 / (dst - 1) as f32
        } else {
            0.0
        }
    };
    let x_ratio = ratio(src_width, dst_width);
    let y_ratio = ratio(src_height, dst_height);

    for (y, row) in output.chunks_exact_mut(dst_width).enumerate() {
        let src_y = y as f32 * y_ratio;
        let y1 = (src_y.floor() as usize).min(src_height - 1);
        let y2 = (y1 + 1).min(src_height - 1);
        let dy = src_y - y1 as f32;

        for (x, out) in row.iter_mut().enumerate() {
            let src_x = x as f32 * x_ratio;
            let x1 = (src_x.floor() as usize).min(src_width - 1);
            let x2 = (x1 + 1).min(src_width - 1);
            let dx = src_x - x1 as f32;

            let v11 = data[y1 * src_width + x1];
            let v21 = data[y1 * src_width + x2];
            let v12 = data[y2 * src_width + x1];
            let v22 = data[y2 * src_width + x2];

            let v1 = v11 * (1.0 - dx) + v21 * dx;
            let v2 = v12 * (1.0 - dx) + v22 * dx;
            *out = v1 * (1.0 - dy) + v2 * dy;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#e8f4e8"), Some(Color::rgb(0xe8, 0xf4, 0xe8)));
        assert_eq!(Color::from_hex("333333"), Some(Color::rgb(0x33, 0x33, 0x33)));
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::from_hex("#fff"), None);
    }

    #[test]
    fn test_temperature_scale_endpoints() {
        assert_eq!(temperature_color(-80.0), Color::rgb(25, 0, 76));
        assert_eq!(temperature_color(0.0), Color::rgb(0, 255, 255));
        assert_eq!(temperature_color(55.0), Color::rgb(139, 0, 0));
        // halfway between yellow and orange
        assert_eq!(temperature_color(25.0), Color::rgb(255, 210, 0));
    }

    #[test]
    fn test_wind_scale_uses_kmh() {
        assert_eq!(wind_speed_color(0.0), Color::rgb(200, 200, 200));
        // 100 km/h is past the last stop in m/s
        assert_eq!(wind_speed_color(100.0), Color::rgb(75, 0, 0));
        // 30 km/h is still below 10 m/s
        assert_ne!(wind_speed_color(30.0), Color::rgb(255, 255, 0));
    }

    #[test]
    fn test_blend_over() {
        let base = Rgba([232, 244, 232, 255]);
        assert_eq!(Color::rgb(0, 0, 0).over(base, 0.0), base);
        assert_eq!(Color::rgb(10, 20, 30).over(base, 1.0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_resample_corners_aligned() {
        let data = [0.0, 10.0, 20.0, 30.0];
        let out = resample_grid(&data, 2, 2, 3, 3);
        assert_eq!(out.len(), 9);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[2], 10.0);
        assert_eq!(out[6], 20.0);
        assert_eq!(out[8], 30.0);
        assert!((out[4] - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_no_scale_for_general_maps() {
        assert_eq!(ColorScale::for_map_type(MapType::General), None);
        assert_eq!(
            ColorScale::for_map_type(MapType::MinTemp),
            Some(ColorScale::Temperature)
        );
    }
}
