//! Map rendering for country weather forecasts.
//!
//! Draws a country boundary with per-location markers, labels and weather
//! icons, optionally overlaid with an interpolated scalar field:
//! - Temperature, wind speed and sunshine color scales
//! - Inverse-distance weighted fields over the land mask
//! - Vector WMO weather icons
//! - Indexed or RGBA PNG output

pub mod boundary;
pub mod error;
pub mod field;
pub mod gradient;
pub mod icons;
pub mod labels;
pub mod png;
pub mod projection;
pub mod scene;
pub mod style;

pub use error::RenderError;
pub use labels::load_font;
pub use scene::{render_map, MapPoint, MapRenderer, MapScene, RenderOptions};
