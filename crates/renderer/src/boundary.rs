//! Country boundary rasterization.
//!
//! Each polygon is scan-converted with the even-odd rule over all of its
//! rings, so holes stay empty. Polygons are unioned into a single land mask.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use meteo_common::{CountryBoundary, Position};

use crate::projection::CanvasProjection;

/// Per-pixel land/water mask, row-major.
#[derive(Debug, Clone)]
pub struct LandMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl LandMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.cells[self.index(x, y)]
    }

    /// Number of land pixels.
    pub fn area(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Row-major cell index, computed in `usize` so large canvases do not
    /// wrap.
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn fill_span(&mut self, y: u32, x_start: f64, x_end: f64) {
        // pixel centers inside [x_start, x_end)
        let first = (x_start - 0.5).ceil().max(0.0) as u32;
        let last = ((x_end - 0.5).ceil().min(self.width as f64)).max(0.0) as u32;
        let row = self.index(0, y);
        for x in first..last {
            self.cells[row + x as usize] = true;
        }
    }
}

/// Scan-convert every polygon of a boundary.
pub fn rasterize(
    boundary: &CountryBoundary,
    projection: &CanvasProjection,
    width: u32,
    height: u32,
) -> LandMask {
    let mut mask = LandMask::new(width, height);

    for polygon in &boundary.polygons {
        let rings: Vec<Vec<(f64, f64)>> = std::iter::once(&polygon.exterior)
            .chain(polygon.holes.iter())
            .map(|ring| project_ring(ring, projection))
            .collect();

        let (min_y, max_y) = rings[0]
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            });
        let y_start = (min_y - 0.5).ceil().max(0.0) as u32;
        let y_end = ((max_y - 0.5).floor() + 1.0).clamp(0.0, height as f64) as u32;

        let mut crossings = Vec::new();
        for y in y_start..y_end {
            let scan_y = y as f64 + 0.5;
            crossings.clear();
            for ring in &rings {
                collect_crossings(ring, scan_y, &mut crossings);
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                mask.fill_span(y, span[0], span[1]);
            }
        }
    }

    mask
}

fn project_ring(ring: &[Position], projection: &CanvasProjection) -> Vec<(f64, f64)> {
    ring.iter()
        .map(|&(lon, lat)| projection.project(lon, lat))
        .collect()
}

/// X coordinates where the closed ring crosses the horizontal line `y`.
fn collect_crossings(ring: &[(f64, f64)], y: f64, out: &mut Vec<f64>) {
    let n = ring.len();
    for i in 0..n {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % n];
        // half-open on y so shared vertices are counted once
        if (y1 <= y && y < y2) || (y2 <= y && y < y1) {
            out.push(x1 + (y - y1) / (y2 - y1) * (x2 - x1));
        }
    }
}

/// Paint land pixels with a solid color.
pub fn fill_land(canvas: &mut RgbaImage, mask: &LandMask, color: Rgba<u8>) {
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        if mask.contains(x, y) {
            *pixel = color;
        }
    }
}

/// Stroke every ring of the boundary.
pub fn stroke_boundary(
    canvas: &mut RgbaImage,
    boundary: &CountryBoundary,
    projection: &CanvasProjection,
    color: Rgba<u8>,
    line_width: u32,
) {
    for polygon in &boundary.polygons {
        for ring in std::iter::once(&polygon.exterior).chain(polygon.holes.iter()) {
            let points = project_ring(ring, projection);
            let n = points.len();
            for i in 0..n {
                draw_thick_line(canvas, points[i], points[(i + 1) % n], line_width, color);
            }
        }
    }
}

/// Line segment widened by drawing parallel copies along its normal.
pub fn draw_thick_line(
    canvas: &mut RgbaImage,
    start: (f64, f64),
    end: (f64, f64),
    width: u32,
    color: Rgba<u8>,
) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

    let width = width.max(1);
    for i in 0..width {
        let offset = i as f64 - (width - 1) as f64 / 2.0;
        let (ox, oy) = (nx * offset, ny * offset);
        draw_line_segment_mut(
            canvas,
            ((start.0 + ox) as f32, (start.1 + oy) as f32),
            ((end.0 + ox) as f32, (end.1 + oy) as f32),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_common::{BoundingBox, Polygon};

    fn square_with_hole() -> CountryBoundary {
        CountryBoundary::new(vec![Polygon {
            exterior: vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            holes: vec![vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]],
        }])
        .unwrap()
    }

    #[test]
    fn test_hole_is_not_land() {
        let boundary = square_with_hole();
        let proj = CanvasProjection::fit(&BoundingBox::new(0.0, 0.0, 10.0, 10.0), 100, 100, 0, 0)
            .unwrap();
        let mask = rasterize(&boundary, &proj, 100, 100);

        let (cx, cy) = proj.project(5.0, 5.0);
        assert!(!mask.contains(cx as u32, cy as u32));

        let (lx, ly) = proj.project(2.0, 8.0);
        assert!(mask.contains(lx as u32, ly as u32));

        // outside the square, in the east/west padding
        let (ox, oy) = proj.project(-0.5, 5.0);
        assert!(ox < 0.0 || !mask.contains(ox as u32, oy as u32));
        assert!(mask.area() > 0);
    }

    #[test]
    fn test_stroke_paints_edge() {
        let boundary = square_with_hole();
        let proj = CanvasProjection::fit(&BoundingBox::new(-1.0, -1.0, 11.0, 11.0), 120, 120, 0, 0)
            .unwrap();
        let mut canvas = RgbaImage::from_pixel(120, 120, Rgba([255, 255, 255, 255]));
        let edge = Rgba([51, 51, 51, 255]);
        stroke_boundary(&mut canvas, &boundary, &proj, edge, 2);

        let painted = canvas.pixels().filter(|p| **p == edge).count();
        assert!(painted > 100);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_index_does_not_wrap_on_large_canvas() {
        // cells left empty; only the index arithmetic is exercised
        let mask = LandMask {
            width: 70_000,
            height: 70_000,
            cells: Vec::new(),
        };
        assert_eq!(mask.index(69_999, 69_999), 4_899_999_999);
        assert_eq!(mask.index(0, 1), 70_000);
    }
}
