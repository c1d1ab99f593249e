//! Scalar field interpolation for choropleth overlays.
//!
//! Station values are spread over the canvas by inverse-distance weighting
//! evaluated on a coarse grid, then bilinearly resampled to full resolution.

use image::RgbaImage;
use rayon::prelude::*;

use crate::boundary::LandMask;
use crate::gradient::{resample_grid, ColorScale};
use crate::projection::CanvasProjection;

/// A station value at a geographic position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub lon: f64,
    pub lat: f64,
    pub value: f64,
}

/// Coarse grid spacing in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 8;

/// IDW exponent.
const POWER: f64 = 2.0;

/// Interpolated values for every canvas pixel, row-major.
pub fn interpolate(
    samples: &[FieldSample],
    projection: &CanvasProjection,
    width: u32,
    height: u32,
    cell_size: u32,
) -> Vec<f32> {
    let cell_size = cell_size.max(1);
    let grid_w = (width / cell_size).max(1) as usize + 1;
    let grid_h = (height / cell_size).max(1) as usize + 1;

    let stations: Vec<(f64, f64, f64)> = samples
        .iter()
        .filter(|s| s.value.is_finite())
        .map(|s| {
            let (x, y) = projection.project(s.lon, s.lat);
            (x, y, s.value)
        })
        .collect();
    if stations.is_empty() {
        return vec![f32::NAN; width as usize * height as usize];
    }

    let step_x = (width.saturating_sub(1)) as f64 / (grid_w - 1) as f64;
    let step_y = (height.saturating_sub(1)) as f64 / (grid_h - 1) as f64;

    let mut coarse = vec![0.0f32; grid_w * grid_h];
    coarse
        .par_chunks_mut(grid_w)
        .enumerate()
        .for_each(|(gy, row)| {
            let py = gy as f64 * step_y;
            for (gx, cell) in row.iter_mut().enumerate() {
                let px = gx as f64 * step_x;
                *cell = idw(&stations, px, py) as f32;
            }
        });

    resample_grid(&coarse, grid_w, grid_h, width as usize, height as usize)
}

/// Inverse-distance weighted value at a pixel position.
pub fn idw(stations: &[(f64, f64, f64)], x: f64, y: f64) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for &(sx, sy, value) in stations {
        let d2 = (sx - x).powi(2) + (sy - y).powi(2);
        if d2 < 1e-9 {
            return value;
        }
        let w = 1.0 / d2.powf(POWER / 2.0);
        weighted += w * value;
        total += w;
    }
    weighted / total
}

/// Blend the colored field over land pixels.
pub fn paint_field(
    canvas: &mut RgbaImage,
    mask: &LandMask,
    field: &[f32],
    scale: ColorScale,
    opacity: f32,
) {
    let width = canvas.width() as usize;
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        if !mask.contains(x, y) {
            continue;
        }
        let value = field[y as usize * width + x as usize];
        if value.is_nan() {
            continue;
        }
        *pixel = scale.color(value).over(*pixel, opacity);
    }
}
