//! Rendering errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Boundary has no drawable area")]
    EmptyBoundary,

    #[error("No location has data for day {0}")]
    NoData(usize),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
