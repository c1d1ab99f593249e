//! Application state for the map service.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

use renderer::{load_font, MapRenderer};
use storage::{ArtifactStore, BoundaryCatalog, BoundaryProvider, StoragePath};

use crate::config::ServiceConfig;
use crate::generation::MapGenerator;

/// Shared application state.
pub struct AppState {
    /// Country boundaries (maps directory in production).
    pub boundaries: Arc<dyn BoundaryProvider>,

    /// Renderer plus artifact store.
    pub generator: MapGenerator,

    /// Prometheus handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create the state from service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let boundaries = BoundaryCatalog::new(&config.maps_dir, config.boundary_cache_size);
        if !config.maps_dir.is_dir() {
            warn!(dir = %config.maps_dir.display(), "Maps directory not found; no country can be rendered");
        }

        let artifacts = ArtifactStore::local(
            &config.data_dir,
            StoragePath::new(config.output_prefix.as_str()),
        )?;

        let font = load_font(config.font_path.as_deref());
        let renderer = MapRenderer::new(config.render_options(), font);

        info!(
            maps_dir = %config.maps_dir.display(),
            data_dir = %config.data_dir.display(),
            prefix = %config.output_prefix,
            width = config.image_width,
            height = config.image_height,
            labels = renderer.has_font(),
            "Map service configured"
        );

        Ok(Self::from_parts(Arc::new(boundaries), artifacts, renderer))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        boundaries: Arc<dyn BoundaryProvider>,
        artifacts: ArtifactStore,
        renderer: MapRenderer,
    ) -> Self {
        Self {
            boundaries,
            generator: MapGenerator::new(Arc::new(renderer), artifacts),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        self.generator.artifacts()
    }
}
