//! Spatial structure of the tract polygons
//!
//! This module contains:
//! - Ring and boundary segment extraction from GeoJSON geometry
//! - Rook contiguity between tracts

/// Rook contiguity matrix and neighbour lists
pub mod adjacency;
/// Polygon rings and boundary segment keys
pub mod geometry;

pub use adjacency::Adjacency;
