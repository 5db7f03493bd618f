//! Polygon ring extraction and boundary segment keys for GeoJSON geometries

use crate::io::error::{AnalysisError, Result};
use geojson::{Geometry, PolygonType, Value};

/// Closed or open sequence of planar vertices
pub type Ring = Vec<[f64; 2]>;

/// Direction-independent identity of a boundary segment
///
/// Vertices are compared by exact bit pattern, with negative zero folded onto
/// positive zero, so two tracts only share a segment when both endpoints match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    start: (u64, u64),
    end: (u64, u64),
}

impl SegmentKey {
    /// Build the key for the segment between two vertices, or `None` if they coincide
    pub fn new(a: [f64; 2], b: [f64; 2]) -> Option<Self> {
        let a_bits = vertex_bits(a);
        let b_bits = vertex_bits(b);
        if a_bits == b_bits {
            return None;
        }
        let (start, end) = if a_bits < b_bits {
            (a_bits, b_bits)
        } else {
            (b_bits, a_bits)
        };
        Some(Self { start, end })
    }
}

fn vertex_bits(vertex: [f64; 2]) -> (u64, u64) {
    // -0.0 + 0.0 == +0.0
    ((vertex[0] + 0.0).to_bits(), (vertex[1] + 0.0).to_bits())
}

/// Every ring of a `Polygon` or `MultiPolygon` geometry, holes included
///
/// # Errors
///
/// Returns an error if the geometry is absent, of another type, or has a
/// position with fewer than two coordinates
pub fn polygon_rings(row: usize, geometry: Option<&Geometry>) -> Result<Vec<Ring>> {
    let geometry = geometry.ok_or_else(|| AnalysisError::InvalidGeometry {
        row,
        reason: "feature has no geometry".to_string(),
    })?;

    match &geometry.value {
        Value::Polygon(polygon) => polygon_to_rings(row, polygon),
        Value::MultiPolygon(polygons) => {
            let mut rings = Vec::new();
            for polygon in polygons {
                rings.extend(polygon_to_rings(row, polygon)?);
            }
            Ok(rings)
        }
        other => Err(AnalysisError::InvalidGeometry {
            row,
            reason: format!(
                "expected Polygon or MultiPolygon, found {}",
                other.type_name()
            ),
        }),
    }
}

fn polygon_to_rings(row: usize, polygon: &PolygonType) -> Result<Vec<Ring>> {
    polygon
        .iter()
        .map(|ring| ring.iter().map(|position| planar(row, position)).collect())
        .collect()
}

fn planar(row: usize, position: &[f64]) -> Result<[f64; 2]> {
    match position {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(AnalysisError::InvalidGeometry {
            row,
            reason: format!("position {position:?} has fewer than two coordinates"),
        }),
    }
}

/// Boundary segments of all rings, including the closing segment of open rings
pub fn boundary_segments(rings: &[Ring]) -> Vec<SegmentKey> {
    let mut segments = Vec::new();
    for ring in rings {
        segments.extend(
            ring.windows(2)
                .filter_map(|pair| match pair {
                    [a, b] => SegmentKey::new(*a, *b),
                    _ => None,
                }),
        );
        // GeoJSON rings repeat the first vertex; tolerate ones that don't
        if ring.len() > 2
            && let (Some(first), Some(last)) = (ring.first(), ring.last())
        {
            segments.extend(SegmentKey::new(*last, *first));
        }
    }
    segments
}
