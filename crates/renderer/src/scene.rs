//! Map scenes and the rendering entry point.
//!
//! A [`MapScene`] is everything needed to draw one map: the boundary, the
//! located values for the selected day and the title. Building a scene is
//! cheap and pure; [`MapRenderer::render`] does the pixel work and encoding
//! and is meant to run on a blocking thread.

use std::sync::Arc;

use image::RgbaImage;
use imageproc::drawing::draw_filled_circle_mut;
use meteo_common::{BoundingBox, CountryBoundary, LocationRecord, MapType, WeatherCondition};
use rusttype::Font;

use crate::boundary::{fill_land, rasterize, stroke_boundary};
use crate::error::RenderError;
use crate::field::{interpolate, paint_field, FieldSample, DEFAULT_CELL_SIZE};
use crate::gradient::{Color, ColorScale};
use crate::icons::draw_weather_icon;
use crate::labels::{draw_centered_text, draw_label};
use crate::png::encode_auto;
use crate::projection::{pad_extent, CanvasProjection};
use crate::style::{field_value, label_layout, label_lines, marker_color, MapPalette};

/// One plotted location.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub lon: f64,
    pub lat: f64,
    pub priority: i64,
    pub condition: WeatherCondition,
    pub value: Option<f64>,
    pub marker: Color,
    pub label: Vec<String>,
}

/// Everything drawn on a single map.
#[derive(Debug, Clone)]
pub struct MapScene {
    pub map_type: MapType,
    pub title: String,
    pub boundary: Arc<CountryBoundary>,
    /// Sorted by priority descending, so the most important locations are
    /// drawn last and end up on top.
    pub points: Vec<MapPoint>,
}

impl MapScene {
    /// Build a scene for `day_index` of the given records.
    ///
    /// Records without data for that day are left out. The title defaults to
    /// `"<map type prefix> - <date>"`.
    pub fn build(
        boundary: Arc<CountryBoundary>,
        records: &[LocationRecord],
        map_type: MapType,
        day_index: usize,
        title: Option<&str>,
        date: &str,
    ) -> Result<Self, RenderError> {
        let mut points: Vec<MapPoint> = records
            .iter()
            .filter_map(|record| {
                let day = record.daily.day(day_index)?;
                Some(MapPoint {
                    lon: record.longitude,
                    lat: record.latitude,
                    priority: record.priority,
                    condition: WeatherCondition::from_wmo(day.weather_code),
                    value: field_value(map_type, &day),
                    marker: marker_color(map_type, &day),
                    label: label_lines(map_type, record.label_name(), &day),
                })
            })
            .collect();

        if points.is_empty() {
            return Err(RenderError::NoData(day_index));
        }
        points.sort_by_key(|p| std::cmp::Reverse(p.priority));

        let title = match title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => format!("{} - {}", map_type.title_prefix(), date),
        };

        Ok(Self {
            map_type,
            title,
            boundary,
            points,
        })
    }

    /// Boundary extent grown to include every plotted location.
    pub fn extent(&self) -> BoundingBox {
        self.points
            .iter()
            .fold(self.boundary.bbox, |mut bbox, p| {
                bbox.include(p.lon, p.lat);
                bbox
            })
    }
}

/// Canvas and layout settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    /// Height reserved above the map for the title
    pub title_band: u32,
    pub palette: MapPalette,
    /// Opacity of the choropleth over the land fill
    pub field_opacity: f32,
    /// Coarse interpolation grid spacing in pixels
    pub cell_size: u32,
    pub title_size: f32,
    pub marker_radius: i32,
    pub icon_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1100,
            margin: 30,
            title_band: 60,
            palette: MapPalette::default(),
            field_opacity: 0.75,
            cell_size: DEFAULT_CELL_SIZE,
            title_size: 30.0,
            marker_radius: 5,
            icon_size: 30,
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Points to pixels, relative to a 12 inch wide figure.
    fn point_size(&self, points: f32) -> f32 {
        points * self.width as f32 / (12.0 * 72.0) * 1.5
    }
}

/// Renders scenes to PNG with fixed options and an optional label font.
pub struct MapRenderer {
    options: RenderOptions,
    font: Option<Font<'static>>,
}

impl MapRenderer {
    pub fn new(options: RenderOptions, font: Option<Font<'static>>) -> Self {
        Self { options, font }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw the scene and encode it as PNG.
    pub fn render(&self, scene: &MapScene) -> Result<Vec<u8>, RenderError> {
        let canvas = self.draw(scene)?;
        let (width, height) = canvas.dimensions();
        encode_auto(canvas.as_raw(), width, height)
    }

    /// Draw the scene onto a fresh canvas.
    pub fn draw(&self, scene: &MapScene) -> Result<RgbaImage, RenderError> {
        let opts = &self.options;
        let (width, height) = (opts.width, opts.height);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidCanvas { width, height });
        }

        let extent = pad_extent(&scene.extent(), 0.05);
        let projection = CanvasProjection::fit(&extent, width, height, opts.margin, opts.title_band)?;

        let mut canvas = RgbaImage::from_pixel(width, height, opts.palette.background.to_rgba());

        let mask = rasterize(&scene.boundary, &projection, width, height);
        if mask.area() == 0 {
            return Err(RenderError::EmptyBoundary);
        }
        fill_land(&mut canvas, &mask, opts.palette.land.to_rgba());

        if let Some(scale) = ColorScale::for_map_type(scene.map_type) {
            let samples: Vec<FieldSample> = scene
                .points
                .iter()
                .filter_map(|p| {
                    p.value.map(|value| FieldSample {
                        lon: p.lon,
                        lat: p.lat,
                        value,
                    })
                })
                .collect();
            if !samples.is_empty() {
                let field = interpolate(&samples, &projection, width, height, opts.cell_size);
                paint_field(&mut canvas, &mask, &field, scale, opts.field_opacity);
            }
        }

        stroke_boundary(
            &mut canvas,
            &scene.boundary,
            &projection,
            opts.palette.edge.to_rgba(),
            2,
        );

        for point in &scene.points {
            self.draw_point(&mut canvas, &projection, scene.map_type, point);
        }

        if let Some(font) = &self.font {
            let size = self.options.title_size;
            let y = (opts.margin as f32 + (opts.title_band as f32 - size) / 2.0).max(0.0) as i32;
            draw_centered_text(
                &mut canvas,
                font,
                size,
                width as i32 / 2,
                y,
                &scene.title,
                opts.palette.title.to_rgba(),
            );
        }

        Ok(canvas)
    }

    fn draw_point(
        &self,
        canvas: &mut RgbaImage,
        projection: &CanvasProjection,
        map_type: MapType,
        point: &MapPoint,
    ) {
        let opts = &self.options;
        let (x, y) = projection.project(point.lon, point.lat);
        let (px, py) = (x.round() as i32, y.round() as i32);

        if map_type == MapType::General {
            let size = opts.icon_size as i32;
            draw_weather_icon(canvas, point.condition, px - size, py - size / 2, opts.icon_size);
        }

        draw_filled_circle_mut(
            canvas,
            (px, py),
            opts.marker_radius + 1,
            opts.palette.edge.to_rgba(),
        );
        draw_filled_circle_mut(canvas, (px, py), opts.marker_radius, point.marker.to_rgba());

        if let Some(font) = &self.font {
            let (offset, points) = label_layout(point.priority);
            let (lx, ly) = projection.project(point.lon + offset, point.lat + offset);
            draw_label(
                canvas,
                font,
                opts.point_size(points),
                lx.round() as i32,
                ly.round() as i32,
                &point.label,
            );
        }
    }
}

/// Render a scene with the given options and font.
pub fn render_map(
    scene: &MapScene,
    options: &RenderOptions,
    font: Option<&Font<'static>>,
) -> Result<Vec<u8>, RenderError> {
    MapRenderer::new(options.clone(), font.cloned()).render(scene)
}
