//! Resources
//!
//! CPU-side geometry and the shared load cache that deduplicates GPU uploads.

pub mod cache;
pub mod geometry;

pub use cache::{LoadCache, SharedLoad};
pub use geometry::{
    FLOATS_PER_VERTEX, GeometryCounts, GeometryData, GeometryKey, GeometryKind, GeometrySource,
    VERTEX_STRIDE,
};
