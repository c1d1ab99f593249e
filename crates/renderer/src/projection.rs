//! Equirectangular projection of a lon/lat extent onto the canvas.
//!
//! Longitudes are scaled by the cosine of the extent's central latitude so
//! that countries far from the equator keep a plausible aspect ratio.

use meteo_common::BoundingBox;

use crate::error::RenderError;

/// Maps geographic coordinates to canvas pixels and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasProjection {
    /// Westernmost longitude of the fitted extent
    lon0: f64,
    /// Northernmost latitude of the fitted extent
    lat0: f64,
    /// cos(central latitude)
    lon_factor: f64,
    /// Pixels per degree of latitude
    scale: f64,
    /// Pixel offset of (lon0, lat0)
    offset_x: f64,
    offset_y: f64,
}

impl CanvasProjection {
    /// Fit `extent` into the drawable area of a `width` x `height` canvas,
    /// leaving `margin` pixels on every side and `top` extra pixels for the
    /// title band. The extent is centered in the remaining area.
    pub fn fit(
        extent: &BoundingBox,
        width: u32,
        height: u32,
        margin: u32,
        top: u32,
    ) -> Result<Self, RenderError> {
        let avail_w = width as f64 - 2.0 * margin as f64;
        let avail_h = height as f64 - 2.0 * margin as f64 - top as f64;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return Err(RenderError::InvalidCanvas { width, height });
        }
        if extent.is_degenerate() {
            return Err(RenderError::EmptyBoundary);
        }

        let (_, center_lat) = extent.center();
        let lon_factor = center_lat.to_radians().cos().max(0.1);

        let data_w = extent.width() * lon_factor;
        let data_h = extent.height();
        let scale = (avail_w / data_w).min(avail_h / data_h);

        let offset_x = margin as f64 + (avail_w - data_w * scale) / 2.0;
        let offset_y = margin as f64 + top as f64 + (avail_h - data_h * scale) / 2.0;

        Ok(Self {
            lon0: extent.min_lon,
            lat0: extent.max_lat,
            lon_factor,
            scale,
            offset_x,
            offset_y,
        })
    }

    /// Geographic position to canvas pixel (fractional).
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            self.offset_x + (lon - self.lon0) * self.lon_factor * self.scale,
            self.offset_y + (self.lat0 - lat) * self.scale,
        )
    }

    /// Canvas pixel back to a geographic position.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.lon0 + (x - self.offset_x) / (self.lon_factor * self.scale),
            self.lat0 - (y - self.offset_y) / self.scale,
        )
    }
}

/// Grow an extent by `fraction` of its size on every side.
pub fn pad_extent(extent: &BoundingBox, fraction: f64) -> BoundingBox {
    let dx = (extent.width() * fraction).max(0.1);
    let dy = (extent.height() * fraction).max(0.1);
    BoundingBox::new(
        extent.min_lon - dx,
        extent.min_lat - dy,
        extent.max_lon + dx,
        extent.max_lat + dy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_round_trip() {
        let extent = BoundingBox::new(-8.7, 18.9, 12.0, 37.1);
        let proj = CanvasProjection::fit(&extent, 1200, 1100, 40, 80).unwrap();

        let (x, y) = proj.project(3.06, 36.75);
        let (lon, lat) = proj.unproject(x, y);
        assert_approx_eq!(lon, 3.06, 1e-9);
        assert_approx_eq!(lat, 36.75, 1e-9);
    }

    #[test]
    fn test_extent_fits_inside_drawable_area() {
        let extent = BoundingBox::new(0.0, 40.0, 10.0, 50.0);
        let proj = CanvasProjection::fit(&extent, 800, 600, 20, 60).unwrap();

        let (x0, y0) = proj.project(extent.min_lon, extent.max_lat);
        let (x1, y1) = proj.project(extent.max_lon, extent.min_lat);
        assert!(x0 >= 20.0 - 1e-9 && x1 <= 780.0 + 1e-9);
        assert!(y0 >= 80.0 - 1e-9 && y1 <= 580.0 + 1e-9);
        // north is up
        assert!(y0 < y1);
        // a degree of longitude is shorter than a degree of latitude at 45N
        assert!((x1 - x0) < (y1 - y0));
    }

    #[test]
    fn test_canvas_too_small() {
        let extent = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let result = CanvasProjection::fit(&extent, 50, 50, 30, 0);
        assert!(matches!(result, Err(RenderError::InvalidCanvas { .. })));
    }

    #[test]
    fn test_pad_extent() {
        let padded = pad_extent(&BoundingBox::new(0.0, 0.0, 10.0, 20.0), 0.05);
        assert_approx_eq!(padded.min_lon, -0.5, 1e-12);
        assert_approx_eq!(padded.max_lat, 21.0, 1e-12);
    }
}
