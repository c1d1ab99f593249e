//! Map generation: build the scene, render it off the async runtime and
//! store the PNG.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Local;
use metrics::{counter, histogram};
use tracing::{info, instrument};

use meteo_common::{GenerationRequest, MapType, MeteoError, MeteoResult};
use renderer::{MapRenderer, MapScene};
use storage::{ArtifactMeta, ArtifactStore};

use crate::resolver::Resolution;

/// A rendered and stored map.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub map_type: MapType,
    pub artifact: ArtifactMeta,
    pub png: Bytes,
}

fn render_error(map_type: MapType, country: &str, err: impl Display) -> MeteoError {
    MeteoError::Render {
        map_type: map_type.to_string(),
        country: country.to_string(),
        message: err.to_string(),
    }
}

/// Renders maps and writes them to the artifact store.
pub struct MapGenerator {
    renderer: Arc<MapRenderer>,
    artifacts: ArtifactStore,
}

impl MapGenerator {
    pub fn new(renderer: Arc<MapRenderer>, artifacts: ArtifactStore) -> Self {
        Self {
            renderer,
            artifacts,
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Render one map type and store it.
    ///
    /// `title` overrides the default `<prefix> - <date>` title.
    #[instrument(
        skip(self, request, resolution, title),
        fields(country = %resolution.country, date = %resolution.date, map_type = %map_type)
    )]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        resolution: &Resolution,
        map_type: MapType,
        title: Option<&str>,
    ) -> MeteoResult<GeneratedMap> {
        let png = match self.render(request, resolution, map_type, title).await {
            Ok(png) => png,
            Err(e) => {
                counter!("meteo_map_failures_total", "map_type" => map_type.as_str()).increment(1);
                return Err(e);
            }
        };

        let artifact = self
            .artifacts
            .put_map(
                &resolution.country,
                &resolution.date,
                map_type,
                Local::now().time(),
                png.clone(),
            )
            .await?;

        counter!("meteo_maps_generated_total", "map_type" => map_type.as_str()).increment(1);
        info!(path = %artifact.key, size = artifact.size, "Generated map");

        Ok(GeneratedMap {
            map_type,
            artifact,
            png,
        })
    }

    /// Render the four fixed map types in order, stopping at the first
    /// failure.
    pub async fn generate_all(
        &self,
        request: &GenerationRequest,
        resolution: &Resolution,
    ) -> MeteoResult<Vec<GeneratedMap>> {
        let mut generated = Vec::with_capacity(MapType::FIXED.len());
        for map_type in MapType::FIXED {
            generated.push(self.generate(request, resolution, map_type, None).await?);
        }
        Ok(generated)
    }

    async fn render(
        &self,
        request: &GenerationRequest,
        resolution: &Resolution,
        map_type: MapType,
        title: Option<&str>,
    ) -> MeteoResult<Bytes> {
        let scene = MapScene::build(
            Arc::clone(&resolution.boundary),
            &request.meteo_data,
            map_type,
            request.day_index,
            title,
            &resolution.date,
        )
        .map_err(|e| render_error(map_type, &resolution.country, e))?;

        let renderer = Arc::clone(&self.renderer);
        let start = Instant::now();

        let png = tokio::task::spawn_blocking(move || renderer.render(&scene))
            .await
            .map_err(|e| MeteoError::Internal(format!("Render task failed: {}", e)))?
            .map_err(|e| render_error(map_type, &resolution.country, e))?;

        histogram!("meteo_render_duration_seconds", "map_type" => map_type.as_str())
            .record(start.elapsed().as_secs_f64());

        Ok(Bytes::from(png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_common::CountryBoundary;
    use renderer::RenderOptions;
    use storage::StoragePath;
    use test_utils::{algeria_request, TestDirs, ALGERIA_GEOJSON};

    fn generator(width: u32, height: u32) -> MapGenerator {
        MapGenerator::new(
            Arc::new(MapRenderer::new(
                RenderOptions::default().with_size(width, height),
                None,
            )),
            ArtifactStore::in_memory(StoragePath::default()),
        )
    }

    fn resolution() -> Resolution {
        Resolution {
            country: "dz".to_string(),
            date: "2026-01-07".to_string(),
            representative: 2,
            boundary: Arc::new(CountryBoundary::from_geojson_str(ALGERIA_GEOJSON).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_generate_stores_png() {
        let generator = generator(300, 280);
        let request = GenerationRequest::from_value(algeria_request()).unwrap();

        let map = generator
            .generate(&request, &resolution(), MapType::Wind, None)
            .await
            .unwrap();

        assert_eq!(map.artifact.key, "meteo/dz/2026-01-07/wind.png");
        assert_eq!(&map.png[1..4], b"PNG");
        let stored = generator.artifacts().get(&map.artifact.key).await.unwrap();
        assert_eq!(stored, map.png);
    }

    #[tokio::test]
    async fn test_generate_all_in_fixed_order() {
        let generator = generator(300, 280);
        let request = GenerationRequest::from_value(algeria_request()).unwrap();

        let maps = generator.generate_all(&request, &resolution()).await.unwrap();
        let types: Vec<MapType> = maps.iter().map(|m| m.map_type).collect();
        assert_eq!(types, MapType::FIXED.to_vec());
        assert_eq!(generator.artifacts().list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_render_failure_carries_map_type_and_country() {
        let generator = generator(40, 40);
        let request = GenerationRequest::from_value(algeria_request()).unwrap();

        let err = generator
            .generate(&request, &resolution(), MapType::Sun, None)
            .await
            .unwrap_err();

        match err {
            MeteoError::Render {
                map_type, country, ..
            } => {
                assert_eq!(map_type, "sun");
                assert_eq!(country, "dz");
            }
            other => panic!("expected render error, got {:?}", other),
        }
        assert!(generator.artifacts().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_all_stops_at_first_failure() {
        let dirs = TestDirs::new();
        let generator = MapGenerator::new(
            Arc::new(MapRenderer::new(
                RenderOptions::default().with_size(300, 280),
                None,
            )),
            ArtifactStore::local(&dirs.data_dir, StoragePath::default()).unwrap(),
        );
        // a directory where wind.png should go makes the third write fail
        std::fs::create_dir_all(dirs.artifact("meteo/dz/2026-01-07/wind.png")).unwrap();
        let request = GenerationRequest::from_value(algeria_request()).unwrap();

        let err = generator
            .generate_all(&request, &resolution())
            .await
            .unwrap_err();

        assert!(matches!(err, MeteoError::Storage(_)), "{err:?}");
        assert!(dirs.artifact("meteo/dz/2026-01-07/maxtemp.png").is_file());
        assert!(dirs.artifact("meteo/dz/2026-01-07/mintemp.png").is_file());
        assert!(!dirs.artifact("meteo/dz/2026-01-07/sun.png").exists());
    }
}
