//! Path utilities for fonts and temporary service directories.

use std::path::{Path, PathBuf};

use crate::fixtures::{ALGERIA, ALGERIA_GEOJSON};

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a TrueType font usable for label rendering.
///
/// This function checks the following locations in order:
/// 1. Environment variable `METEO_FONT_PATH` (if set)
/// 2. `assets/fonts/DejaVuSans.ttf` in the workspace
/// 3. Common system DejaVu locations
pub fn find_system_font() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = std::env::var("METEO_FONT_PATH") {
        candidates.push(PathBuf::from(path));
    }

    candidates.push(workspace_root().join("assets/fonts/DejaVuSans.ttf"));
    candidates.extend(
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
        .into_iter()
        .map(PathBuf::from),
    );

    candidates.into_iter().find(|p| p.exists())
}

/// A temporary service layout: a `maps/` directory of GeoJSON boundaries
/// and a data directory that receives generated artifacts.
///
/// Everything is removed when the value is dropped.
pub struct TestDirs {
    _temp: tempfile::TempDir,
    pub maps_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl TestDirs {
    /// Empty `maps/` and `data/` directories.
    pub fn new() -> Self {
        let temp = tempfile::Builder::new()
            .prefix("meteo_test_")
            .tempdir()
            .expect("Failed to create temporary test directory");
        let maps_dir = temp.path().join("maps");
        let data_dir = temp.path().join("data");
        std::fs::create_dir_all(&maps_dir).expect("Failed to create maps dir");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        Self {
            _temp: temp,
            maps_dir,
            data_dir,
        }
    }

    /// Directories with the Algeria boundary installed as `maps/dz.json`.
    pub fn with_algeria() -> Self {
        let dirs = Self::new();
        dirs.write_boundary(ALGERIA, ALGERIA_GEOJSON);
        dirs
    }

    /// Write `maps/<code>.json`.
    pub fn write_boundary(&self, code: &str, geojson: &str) -> PathBuf {
        let path = self.maps_dir.join(format!("{}.json", code));
        std::fs::write(&path, geojson).expect("Failed to write boundary");
        path
    }

    /// Absolute path of an artifact key relative to the data directory.
    pub fn artifact(&self, key: &str) -> PathBuf {
        self.data_dir.join(Path::new(key))
    }
}

impl Default for TestDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_dirs_with_algeria() {
        let dirs = TestDirs::with_algeria();
        assert!(dirs.maps_dir.join("dz.json").exists());
        assert!(dirs.data_dir.is_dir());
        assert_eq!(
            dirs.artifact("meteo/dz/2026-01-07/sun.png"),
            dirs.data_dir.join("meteo/dz/2026-01-07/sun.png")
        );
    }
}
