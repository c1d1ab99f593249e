//! HTTP request handlers for the map service.

pub mod files;
pub mod generate;
pub mod health;
pub mod landing;
