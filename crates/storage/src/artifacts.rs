//! Object storage for generated map images.
//!
//! Fixed maps overwrite the previous artifact at the same key. Timestamped
//! general maps are written create-only so two generations within the same
//! second never clobber each other.

use std::collections::BTreeMap;
use std::path::Path as FsPath;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, NaiveTime, Utc};
use object_store::{
    local::LocalFileSystem, memory::InMemory, path::Path, ObjectMeta, ObjectStore, PutMode,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use meteo_common::{MapType, MeteoError, MeteoResult};

use crate::paths::StoragePath;

/// Upper bound on `_n` suffixes tried for one timestamp.
const MAX_TIMESTAMP_ATTEMPTS: u32 = 100;

/// Metadata of a stored artifact.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtifactMeta {
    pub key: String,
    pub size: usize,
    pub last_modified: DateTime<Utc>,
}

impl ArtifactMeta {
    fn from_object(meta: ObjectMeta) -> Self {
        Self {
            key: meta.location.to_string(),
            size: meta.size,
            last_modified: meta.last_modified,
        }
    }

    /// File name (last key segment).
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// Size in KiB rounded to two decimals.
    pub fn size_kb(&self) -> f64 {
        (self.size as f64 / 1024.0 * 100.0).round() / 100.0
    }
}

/// Artifacts grouped by country, then by date.
pub type ArtifactIndex = BTreeMap<String, BTreeMap<String, Vec<ArtifactMeta>>>;

/// Artifact store for generated maps.
#[derive(Clone)]
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    paths: StoragePath,
    backend: &'static str,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("backend", &self.backend)
            .field("prefix", &self.paths.prefix())
            .finish()
    }
}

impl ArtifactStore {
    /// Store artifacts below `root` on the local filesystem.
    ///
    /// The directory is created if missing.
    pub fn local(root: &FsPath, paths: StoragePath) -> MeteoResult<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            MeteoError::Storage(format!("Failed to create {}: {}", root.display(), e))
        })?;

        let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
            MeteoError::Storage(format!("Failed to open {}: {}", root.display(), e))
        })?;

        Ok(Self {
            store: Arc::new(store),
            paths,
            backend: "local",
        })
    }

    /// Volatile store, used by tests and dry runs.
    pub fn in_memory(paths: StoragePath) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            paths,
            backend: "memory",
        }
    }

    pub fn paths(&self) -> &StoragePath {
        &self.paths
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Store a rendered map under its canonical key.
    ///
    /// Fixed map types overwrite. General maps get a timestamped name
    /// derived from `time`.
    pub async fn put_map(
        &self,
        country: &str,
        date: &str,
        map_type: MapType,
        time: NaiveTime,
        data: Bytes,
    ) -> MeteoResult<ArtifactMeta> {
        match self.paths.fixed(country, date, map_type) {
            Some(key) => self.put(&key, data).await,
            None => self.put_timestamped(country, date, time, data).await,
        }
    }

    /// Write bytes to a key, replacing any previous object.
    #[instrument(skip(self, data), fields(backend = self.backend, path = %key))]
    pub async fn put(&self, key: &str, data: Bytes) -> MeteoResult<ArtifactMeta> {
        let location = Path::from(key);
        let size = data.len();
        debug!(size, "Writing artifact");

        self.store
            .put(&location, data)
            .await
            .map_err(|e| MeteoError::Storage(format!("Failed to write {}: {}", key, e)))?;

        self.head(key).await
    }

    /// Write a general map without replacing existing files.
    ///
    /// Tries `weather_map_HHMMSS.png`, then `_1`, `_2` suffixes.
    #[instrument(skip(self, data), fields(backend = self.backend, country = %country, date = %date))]
    pub async fn put_timestamped(
        &self,
        country: &str,
        date: &str,
        time: NaiveTime,
        data: Bytes,
    ) -> MeteoResult<ArtifactMeta> {
        for attempt in 0..MAX_TIMESTAMP_ATTEMPTS {
            let key = self.paths.timestamped(country, date, time, attempt);
            let location = Path::from(key.as_str());

            match self
                .store
                .put_opts(&location, data.clone(), PutMode::Create.into())
                .await
            {
                Ok(_) => {
                    debug!(path = %key, size = data.len(), "Wrote timestamped artifact");
                    return self.head(&key).await;
                }
                Err(object_store::Error::AlreadyExists { .. }) => {
                    debug!(path = %key, "Timestamped name taken");
                }
                Err(e) => {
                    return Err(MeteoError::Storage(format!(
                        "Failed to write {}: {}",
                        key, e
                    )))
                }
            }
        }

        warn!(attempts = MAX_TIMESTAMP_ATTEMPTS, "No free timestamped name");
        Err(MeteoError::Storage(format!(
            "No free file name for {}/{} at {}",
            country,
            date,
            time.format("%H%M%S")
        )))
    }

    /// Read bytes from a key.
    #[instrument(skip(self), fields(backend = self.backend, path = %key))]
    pub async fn get(&self, key: &str) -> MeteoResult<Bytes> {
        let location = Path::from(key);

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => MeteoError::ArtifactNotFound(key.to_string()),
            e => MeteoError::Storage(format!("Failed to read {}: {}", key, e)),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| MeteoError::Storage(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read artifact");
        Ok(bytes)
    }

    /// Metadata for a key.
    pub async fn head(&self, key: &str) -> MeteoResult<ArtifactMeta> {
        let location = Path::from(key);

        match self.store.head(&location).await {
            Ok(meta) => Ok(ArtifactMeta::from_object(meta)),
            Err(object_store::Error::NotFound { .. }) => {
                Err(MeteoError::ArtifactNotFound(key.to_string()))
            }
            Err(e) => Err(MeteoError::Storage(format!(
                "Failed to check {}: {}",
                key, e
            ))),
        }
    }

    /// Check if an artifact exists.
    pub async fn exists(&self, key: &str) -> MeteoResult<bool> {
        match self.head(key).await {
            Ok(_) => Ok(true),
            Err(MeteoError::ArtifactNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// List every artifact under the prefix, sorted by key.
    #[instrument(skip(self), fields(backend = self.backend))]
    pub async fn list(&self) -> MeteoResult<Vec<ArtifactMeta>> {
        use futures::TryStreamExt;

        let prefix = Path::from(self.paths.prefix());
        let mut artifacts = Vec::new();

        let mut stream = self.store.list(Some(&prefix));
        loop {
            match stream.try_next().await {
                Ok(Some(meta)) => artifacts.push(ArtifactMeta::from_object(meta)),
                Ok(None) => break,
                // a missing prefix directory just means nothing was generated yet
                Err(object_store::Error::NotFound { .. }) => break,
                Err(e) => {
                    return Err(MeteoError::Storage(format!("Failed to list: {}", e)));
                }
            }
        }

        artifacts.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(count = artifacts.len(), "Listed artifacts");
        Ok(artifacts)
    }

    /// Artifacts grouped as country -> date -> files.
    ///
    /// Keys that do not follow the `{prefix}/{country}/{date}/{file}` layout
    /// are skipped.
    pub async fn index(&self) -> MeteoResult<ArtifactIndex> {
        let mut index = ArtifactIndex::new();
        for meta in self.list().await? {
            let Some((country, date, _)) = self.paths.parse(&meta.key) else {
                continue;
            };
            let (country, date) = (country.to_string(), date.to_string());
            index
                .entry(country)
                .or_default()
                .entry(date)
                .or_default()
                .push(meta);
        }
        Ok(index)
    }
}
