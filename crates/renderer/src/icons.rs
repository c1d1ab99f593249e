//! Vector weather icons keyed by WMO condition.
//!
//! Icons are composed from a few primitives (sun, cloud, drops, flakes,
//! bolt, fog bars) drawn with imageproc, so no glyph font is required.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use meteo_common::WeatherCondition;

use crate::boundary::draw_thick_line;

const SUN: Rgba<u8> = Rgba([253, 216, 53, 255]);
const SUN_RAY: Rgba<u8> = Rgba([255, 179, 0, 255]);
const CLOUD: Rgba<u8> = Rgba([236, 239, 241, 255]);
const CLOUD_DARK: Rgba<u8> = Rgba([144, 164, 174, 255]);
const CLOUD_EDGE: Rgba<u8> = Rgba([96, 125, 139, 255]);
const RAIN: Rgba<u8> = Rgba([30, 136, 229, 255]);
const SNOW: Rgba<u8> = Rgba([129, 212, 250, 255]);
const BOLT: Rgba<u8> = Rgba([255, 193, 7, 255]);
const UNKNOWN: Rgba<u8> = Rgba([189, 189, 189, 255]);

/// Draw the icon for `condition` centered on (cx, cy), roughly `size` pixels
/// across.
pub fn draw_weather_icon(
    canvas: &mut RgbaImage,
    condition: WeatherCondition,
    cx: i32,
    cy: i32,
    size: u32,
) {
    let r = (size as i32 / 2).max(4);

    match condition {
        WeatherCondition::Clear => draw_sun(canvas, cx, cy, r),
        WeatherCondition::Unknown => {
            draw_filled_circle_mut(canvas, (cx, cy), r / 2, UNKNOWN);
        }
        WeatherCondition::Fog => {
            draw_cloud(canvas, cx, cy - r / 4, r, CLOUD_DARK);
            draw_fog(canvas, cx, cy + r / 2, r);
        }
        other => {
            if other.has_sun() {
                draw_sun(canvas, cx - r / 3, cy - r / 3, r * 2 / 3);
            }
            let fill = if matches!(other, WeatherCondition::Overcast) || other.has_rain() {
                CLOUD_DARK
            } else {
                CLOUD
            };
            let cloud_cy = if other.has_rain() || other.has_snow() { cy - r / 4 } else { cy };
            draw_cloud(canvas, cx, cloud_cy, r, fill);

            let below = cloud_cy + r / 2;
            if matches!(
                other,
                WeatherCondition::Thunderstorm | WeatherCondition::ThunderstormHail
            ) {
                draw_bolt(canvas, cx, below, r);
            }
            if other.has_rain() {
                draw_drops(canvas, cx, below, r, other);
            }
            if other.has_snow() {
                draw_flakes(canvas, cx, below, r);
            }
        }
    }
}

fn draw_sun(canvas: &mut RgbaImage, cx: i32, cy: i32, r: i32) {
    let core = (r * 3 / 5).max(2);
    for i in 0..8 {
        let angle = i as f32 * std::f32::consts::FRAC_PI_4;
        let (s, c) = angle.sin_cos();
        draw_line_segment_mut(
            canvas,
            (cx as f32 + c * (core + 2) as f32, cy as f32 + s * (core + 2) as f32),
            (cx as f32 + c * r as f32, cy as f32 + s * r as f32),
            SUN_RAY,
        );
    }
    draw_filled_circle_mut(canvas, (cx, cy), core, SUN);
}

fn draw_cloud(canvas: &mut RgbaImage, cx: i32, cy: i32, r: i32, fill: Rgba<u8>) {
    let lobes = [
        (cx - r / 2, cy + r / 8, r * 2 / 5),
        (cx, cy - r / 5, r / 2),
        (cx + r / 2, cy + r / 8, r * 2 / 5),
    ];
    for &(x, y, radius) in &lobes {
        draw_filled_circle_mut(canvas, (x, y), radius + 1, CLOUD_EDGE);
    }
    for &(x, y, radius) in &lobes {
        draw_filled_circle_mut(canvas, (x, y), radius, fill);
    }
}

fn draw_drops(canvas: &mut RgbaImage, cx: i32, top: i32, r: i32, condition: WeatherCondition) {
    let count = match condition {
        WeatherCondition::HeavyRain | WeatherCondition::ThunderstormHail => 4,
        WeatherCondition::Drizzle | WeatherCondition::FreezingDrizzle => 2,
        _ => 3,
    };
    let spacing = r / 2;
    let start = cx - spacing * (count - 1) / 2;
    for i in 0..count {
        let x = (start + i * spacing) as f64;
        draw_thick_line(
            canvas,
            (x, top as f64),
            (x - r as f64 / 5.0, (top + r / 2) as f64),
            2,
            RAIN,
        );
    }
}

fn draw_flakes(canvas: &mut RgbaImage, cx: i32, top: i32, r: i32) {
    let spacing = r / 2;
    for i in -1..=1 {
        let x = cx + i * spacing;
        let y = top + r / 4 + (i & 1) * r / 5;
        draw_filled_circle_mut(canvas, (x, y), (r / 8).max(1), SNOW);
    }
}

fn draw_bolt(canvas: &mut RgbaImage, cx: i32, top: i32, r: i32) {
    let h = r * 3 / 4;
    let points = [
        Point::new(cx + r / 8, top),
        Point::new(cx - r / 5, top + h / 2),
        Point::new(cx, top + h / 2),
        Point::new(cx - r / 8, top + h),
        Point::new(cx + r / 4, top + h * 2 / 5),
        Point::new(cx + r / 20, top + h * 2 / 5),
    ];
    draw_polygon_mut(canvas, &points, BOLT);
}

fn draw_fog(canvas: &mut RgbaImage, cx: i32, top: i32, r: i32) {
    for i in 0..3 {
        let y = (top + i * r / 4) as f64;
        let inset = if i == 1 { r / 4 } else { 0 };
        draw_thick_line(
            canvas,
            ((cx - r + inset) as f64, y),
            ((cx + r - inset) as f64, y),
            2,
            CLOUD_EDGE,
        );
    }
}
