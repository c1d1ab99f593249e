//! Storage abstractions for meteo-maps services.
//!
//! Provides unified interfaces for:
//! - Generated map artifacts (local filesystem or in-memory object store)
//! - The output path layout
//! - Country boundaries read from a maps directory

pub mod artifacts;
pub mod boundaries;
pub mod paths;

pub use artifacts::{ArtifactIndex, ArtifactMeta, ArtifactStore};
pub use boundaries::{
    BoundaryCatalog, BoundaryProvider, CacheStats as BoundaryCacheStats, MemoryBoundaries,
    DEFAULT_BOUNDARY_CACHE_SIZE,
};
pub use paths::{is_safe_segment, StoragePath, DEFAULT_PREFIX};
