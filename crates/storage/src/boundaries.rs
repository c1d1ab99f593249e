//! Country boundary lookup.
//!
//! Boundaries live as `<maps_dir>/<country>.json` GeoJSON files. Parsed
//! boundaries are kept in a small LRU so repeated generations for the same
//! country skip the parse.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use meteo_common::{CountryBoundary, MeteoError, MeteoResult};

/// Default number of parsed boundaries kept in memory.
pub const DEFAULT_BOUNDARY_CACHE_SIZE: usize = 32;

/// Source of country boundaries.
#[async_trait]
pub trait BoundaryProvider: Send + Sync {
    /// Sorted country codes with a boundary.
    async fn available(&self) -> MeteoResult<Vec<String>>;

    /// Boundary for a country code; `MapNotFound` when there is none.
    async fn load(&self, country: &str) -> MeteoResult<Arc<CountryBoundary>>;
}

#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Directory of GeoJSON boundaries with an LRU of parsed geometry.
pub struct BoundaryCatalog {
    dir: PathBuf,
    cache: Arc<Mutex<LruCache<String, Arc<CountryBoundary>>>>,
    stats: Arc<Mutex<CacheStats>>,
}

impl BoundaryCatalog {
    /// Create a catalog over `dir`, caching up to `capacity` boundaries.
    ///
    /// A zero capacity falls back to one entry.
    pub fn new(dir: impl Into<PathBuf>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let cache_size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            dir: dir.into(),
            cache: Arc::new(Mutex::new(LruCache::new(cache_size))),
            stats: Arc::new(Mutex::new(CacheStats::default())),
        }
    }

    /// Synchronous directory scan: lowercased country code to file path.
    ///
    /// When two files differ only by case, the all-lowercase name wins.
    fn scan(dir: &Path) -> BTreeMap<String, PathBuf> {
        let mut files = BTreeMap::new();
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable maps entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file());

        for entry in entries {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let code = stem.to_ascii_lowercase();
            if stem == code || !files.contains_key(&code) {
                files.insert(code, path.to_path_buf());
            }
        }
        files
    }

    async fn boundary_files(&self) -> MeteoResult<BTreeMap<String, PathBuf>> {
        let dir = self.dir.clone();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "Maps directory does not exist");
            return Ok(BTreeMap::new());
        }
        tokio::task::spawn_blocking(move || Self::scan(&dir))
            .await
            .map_err(|e| MeteoError::Internal(format!("Maps scan failed: {}", e)))
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }

    /// Number of cached boundaries.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }

    /// Drop all cached boundaries, e.g. after replacing files on disk.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
        info!("Boundary cache cleared");
    }
}

#[async_trait]
impl BoundaryProvider for BoundaryCatalog {
    async fn available(&self) -> MeteoResult<Vec<String>> {
        Ok(self.boundary_files().await?.into_keys().collect())
    }

    #[instrument(skip(self), fields(country = %country))]
    async fn load(&self, country: &str) -> MeteoResult<Arc<CountryBoundary>> {
        let country = country.to_ascii_lowercase();
        let country = country.as_str();
        {
            let mut cache = self.cache.lock().await;
            if let Some(boundary) = cache.get(country) {
                self.stats.lock().await.hits += 1;
                debug!("Boundary cache hit");
                return Ok(boundary.clone());
            }
        }

        self.stats.lock().await.misses += 1;

        let mut files = self.boundary_files().await?;
        let Some(path) = files.remove(country) else {
            return Err(MeteoError::MapNotFound {
                country: country.to_string(),
                available: files.into_keys().collect(),
            });
        };

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                return Err(MeteoError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let boundary = CountryBoundary::from_geojson_slice(&raw).map_err(|e| {
            MeteoError::InvalidBoundary {
                country: country.to_string(),
                message: e.to_string(),
            }
        })?;
        debug!(
            polygons = boundary.polygons.len(),
            vertices = boundary.vertex_count(),
            "Parsed boundary"
        );
        let boundary = Arc::new(boundary);

        {
            let mut cache = self.cache.lock().await;
            if cache.len() >= cache.cap().get() && !cache.contains(country) {
                self.stats.lock().await.evictions += 1;
            }
            cache.put(country.to_string(), boundary.clone());
        }

        Ok(boundary)
    }
}

/// Fixed set of boundaries held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryBoundaries {
    boundaries: BTreeMap<String, Arc<CountryBoundary>>,
}

impl MemoryBoundaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, country: &str, boundary: CountryBoundary) -> Self {
        self.insert(country, boundary);
        self
    }

    pub fn insert(&mut self, country: &str, boundary: CountryBoundary) {
        self.boundaries
            .insert(country.to_ascii_lowercase(), Arc::new(boundary));
    }
}

#[async_trait]
impl BoundaryProvider for MemoryBoundaries {
    async fn available(&self) -> MeteoResult<Vec<String>> {
        Ok(self.boundaries.keys().cloned().collect())
    }

    async fn load(&self, country: &str) -> MeteoResult<Arc<CountryBoundary>> {
        self.boundaries
            .get(&country.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| MeteoError::MapNotFound {
                country: country.to_string(),
                available: self.boundaries.keys().cloned().collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{square_geojson, TestDirs, ALGERIA, ALGERIA_GEOJSON};

    #[tokio::test]
    async fn test_available_lists_json_stems() {
        let dirs = TestDirs::with_algeria();
        dirs.write_boundary("ma", &square_geojson(-13.0, 27.0, -1.0, 36.0));
        std::fs::write(dirs.maps_dir.join("notes.txt"), "ignored").unwrap();

        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 4);
        assert_eq!(catalog.available().await.unwrap(), vec!["dz", "ma"]);
    }

    #[tokio::test]
    async fn test_file_names_are_case_insensitive() {
        let dirs = TestDirs::new();
        dirs.write_boundary("DZ", ALGERIA_GEOJSON);
        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 4);

        assert_eq!(catalog.available().await.unwrap(), vec!["dz"]);
        let lower = catalog.load("dz").await.unwrap();
        let upper = catalog.load("DZ").await.unwrap();
        assert!(Arc::ptr_eq(&lower, &upper));
    }

    #[tokio::test]
    async fn test_lowercase_file_wins_over_case_variant() {
        let dirs = TestDirs::new();
        dirs.write_boundary("MA", r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        dirs.write_boundary("ma", &square_geojson(-13.0, 27.0, -1.0, 36.0));
        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 4);

        assert_eq!(catalog.available().await.unwrap(), vec!["ma"]);
        assert!(catalog.load("ma").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_dir_has_no_countries() {
        let dirs = TestDirs::new();
        let catalog = BoundaryCatalog::new(dirs.maps_dir.join("absent"), 4);
        assert!(catalog.available().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_caches_boundary() {
        let dirs = TestDirs::with_algeria();
        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 4);

        let first = catalog.load(ALGERIA).await.unwrap();
        let second = catalog.load(ALGERIA).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let stats = catalog.stats().await;
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.hit_rate(), 50.0);
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_country_lists_available() {
        let dirs = TestDirs::with_algeria();
        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 4);

        match catalog.load("xx").await {
            Err(MeteoError::MapNotFound { country, available }) => {
                assert_eq!(country, "xx");
                assert_eq!(available, vec!["dz"]);
            }
            other => panic!("expected MapNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_geojson() {
        let dirs = TestDirs::new();
        dirs.write_boundary("zz", r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 4);

        let err = catalog.load("zz").await.unwrap_err();
        assert!(matches!(err, MeteoError::InvalidBoundary { .. }));
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_eviction_is_counted() {
        let dirs = TestDirs::with_algeria();
        dirs.write_boundary("ma", &square_geojson(-13.0, 27.0, -1.0, 36.0));
        let catalog = BoundaryCatalog::new(&dirs.maps_dir, 1);

        catalog.load("dz").await.unwrap();
        catalog.load("ma").await.unwrap();
        assert_eq!(catalog.stats().await.evictions, 1);

        catalog.clear().await;
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_boundaries() {
        let boundaries = MemoryBoundaries::new().with(
            ALGERIA,
            CountryBoundary::from_geojson_str(ALGERIA_GEOJSON).unwrap(),
        );
        assert_eq!(boundaries.available().await.unwrap(), vec!["dz"]);
        assert!(boundaries.load("dz").await.is_ok());
        assert!(matches!(
            boundaries.load("fr").await,
            Err(MeteoError::MapNotFound { .. })
        ));
    }
}
