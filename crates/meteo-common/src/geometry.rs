//! Country boundary geometry loaded from GeoJSON.
//!
//! Only areal geometries contribute to a boundary. Points and lines inside a
//! collection are skipped; a document without any polygon is an error.

use serde::Deserialize;
use serde_json::Value;

use crate::bbox::BoundingBox;

/// A lon/lat position.
pub type Position = (f64, f64);

/// One polygon: an exterior ring plus optional holes. Rings are stored open
/// (the closing position is dropped).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<Position>,
    pub holes: Vec<Vec<Position>>,
}

/// The rendered outline of a country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBoundary {
    pub polygons: Vec<Polygon>,
    pub bbox: BoundingBox,
}

impl CountryBoundary {
    /// Build a boundary from polygons, computing the bounding box.
    pub fn new(polygons: Vec<Polygon>) -> Result<Self, BoundaryError> {
        let bbox = BoundingBox::from_points(
            polygons
                .iter()
                .flat_map(|p| p.exterior.iter().copied()),
        )
        .ok_or(BoundaryError::NoPolygons)?;

        if bbox.is_degenerate() {
            return Err(BoundaryError::Degenerate);
        }

        Ok(Self { polygons, bbox })
    }

    /// Parse a GeoJSON document (FeatureCollection, Feature or geometry).
    pub fn from_geojson_str(json: &str) -> Result<Self, BoundaryError> {
        let object: GeoJsonObject =
            serde_json::from_str(json).map_err(|e| BoundaryError::Parse(e.to_string()))?;
        Self::from_object(object)
    }

    pub fn from_geojson_slice(json: &[u8]) -> Result<Self, BoundaryError> {
        let object: GeoJsonObject =
            serde_json::from_slice(json).map_err(|e| BoundaryError::Parse(e.to_string()))?;
        Self::from_object(object)
    }

    fn from_object(object: GeoJsonObject) -> Result<Self, BoundaryError> {
        let mut polygons = Vec::new();
        object.collect_polygons(&mut polygons)?;
        Self::new(polygons)
    }

    /// Total number of vertices across all rings.
    pub fn vertex_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.exterior.len() + p.holes.iter().map(Vec::len).sum::<usize>())
            .sum()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonObject {
    FeatureCollection {
        features: Vec<Feature>,
    },
    Feature(Feature),
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonObject>,
    },
    Point {
        #[allow(dead_code)]
        coordinates: Value,
    },
    MultiPoint {
        #[allow(dead_code)]
        coordinates: Value,
    },
    LineString {
        #[allow(dead_code)]
        coordinates: Value,
    },
    MultiLineString {
        #[allow(dead_code)]
        coordinates: Value,
    },
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Box<GeoJsonObject>>,
}

impl GeoJsonObject {
    fn collect_polygons(self, out: &mut Vec<Polygon>) -> Result<(), BoundaryError> {
        match self {
            GeoJsonObject::FeatureCollection { features } => {
                for feature in features {
                    if let Some(geometry) = feature.geometry {
                        geometry.collect_polygons(out)?;
                    }
                }
            }
            GeoJsonObject::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    geometry.collect_polygons(out)?;
                }
            }
            GeoJsonObject::Polygon { coordinates } => {
                if let Some(polygon) = polygon_from_rings(coordinates)? {
                    out.push(polygon);
                }
            }
            GeoJsonObject::MultiPolygon { coordinates } => {
                for rings in coordinates {
                    if let Some(polygon) = polygon_from_rings(rings)? {
                        out.push(polygon);
                    }
                }
            }
            GeoJsonObject::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_polygons(out)?;
                }
            }
            GeoJsonObject::Point { .. }
            | GeoJsonObject::MultiPoint { .. }
            | GeoJsonObject::LineString { .. }
            | GeoJsonObject::MultiLineString { .. } => {}
        }
        Ok(())
    }
}

fn polygon_from_rings(rings: Vec<Vec<Vec<f64>>>) -> Result<Option<Polygon>, BoundaryError> {
    let mut rings = rings.into_iter().map(ring_from_positions);
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => return Ok(None),
    };
    if exterior.len() < 3 {
        return Ok(None);
    }
    let holes = rings
        .filter(|r| !matches!(r, Ok(ring) if ring.len() < 3))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Polygon { exterior, holes }))
}

fn ring_from_positions(positions: Vec<Vec<f64>>) -> Result<Vec<Position>, BoundaryError> {
    let mut ring = positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok((*lon, *lat)),
            _ => Err(BoundaryError::InvalidPosition(format!("{:?}", p))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    Ok(ring)
}

/// Boundary parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("GeoJSON contains no polygons")]
    NoPolygons,

    #[error("Boundary has zero width or height")]
    Degenerate,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_FEATURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "Square"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                    [[4, 4], [6, 4], [6, 6], [4, 4]]
                ]
            }
        }]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let boundary = CountryBoundary::from_geojson_str(SQUARE_FEATURE).unwrap();
        assert_eq!(boundary.polygons.len(), 1);
        assert_eq!(boundary.polygons[0].exterior.len(), 4);
        assert_eq!(boundary.polygons[0].holes.len(), 1);
        assert_eq!(boundary.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(boundary.vertex_count(), 7);
    }

    #[test]
    fn test_parse_multipolygon_geometry() {
        let json = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[5, 5], [6, 5, 120.0], [6, 7], [5, 5]]]
            ]
        }"#;
        let boundary = CountryBoundary::from_geojson_str(json).unwrap();
        assert_eq!(boundary.polygons.len(), 2);
        assert_eq!(boundary.bbox, BoundingBox::new(0.0, 0.0, 6.0, 7.0));
    }

    #[test]
    fn test_points_only_is_error() {
        let json = r#"{"type": "Point", "coordinates": [3.0, 36.0]}"#;
        assert!(matches!(
            CountryBoundary::from_geojson_str(json),
            Err(BoundaryError::NoPolygons)
        ));
    }

    #[test]
    fn test_feature_without_geometry_is_skipped() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": null},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,0]]]}}
            ]
        }"#;
        let boundary = CountryBoundary::from_geojson_str(json).unwrap();
        assert_eq!(boundary.polygons.len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CountryBoundary::from_geojson_str("{not json"),
            Err(BoundaryError::Parse(_))
        ));
    }

    #[test]
    fn test_algeria_outline() {
        let boundary = CountryBoundary::from_geojson_str(test_utils::ALGERIA_GEOJSON).unwrap();
        assert_eq!(boundary.polygons.len(), 1);
        assert_eq!(boundary.polygons[0].exterior.len(), 18);
        assert_eq!(boundary.bbox, BoundingBox::new(-8.67, 19.1, 11.9, 36.9));
    }

    #[test]
    fn test_degenerate_boundary() {
        let json = r#"{"type": "Polygon", "coordinates": [[[1,1],[1,2],[1,3],[1,1]]]}"#;
        assert!(matches!(
            CountryBoundary::from_geojson_str(json),
            Err(BoundaryError::Degenerate)
        ));
    }
}
