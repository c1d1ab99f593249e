//! Common types shared by the meteo-maps crates and services.

pub mod bbox;
pub mod error;
pub mod forecast;
pub mod geometry;
pub mod map_type;
pub mod weather_code;

pub use bbox::BoundingBox;
pub use error::{MeteoError, MeteoResult};
pub use forecast::{DailySeries, DailyValues, GenerationRequest, LocationRecord};
pub use geometry::{BoundaryError, CountryBoundary, Polygon, Position};
pub use map_type::MapType;
pub use weather_code::WeatherCondition;
