//! Service configuration.

use std::path::PathBuf;

use renderer::RenderOptions;
use storage::{DEFAULT_BOUNDARY_CACHE_SIZE, DEFAULT_PREFIX};

/// Runtime configuration for the map service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory of `<country>.json` GeoJSON boundaries.
    pub maps_dir: PathBuf,

    /// Root under which the output prefix is created.
    pub data_dir: PathBuf,

    /// Top-level folder of generated maps.
    pub output_prefix: String,

    /// TrueType font for titles and labels.
    pub font_path: Option<PathBuf>,

    pub image_width: u32,
    pub image_height: u32,

    /// Parsed boundaries kept in memory.
    pub boundary_cache_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            maps_dir: PathBuf::from("maps"),
            data_dir: PathBuf::from("."),
            output_prefix: DEFAULT_PREFIX.to_string(),
            font_path: Some(PathBuf::from("assets/fonts/DejaVuSans.ttf")),
            image_width: options.width,
            image_height: options.height,
            boundary_cache_size: DEFAULT_BOUNDARY_CACHE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Renderer options for the configured canvas size.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default().with_size(self.image_width, self.image_height)
    }
}
