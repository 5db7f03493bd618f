//! Rook contiguity between tracts

use crate::io::error::{AnalysisError, Result};
use crate::spatial::geometry::{Ring, SegmentKey, boundary_segments};
use ndarray::Array2;
use std::collections::HashMap;

/// Binary contiguity structure over tract indices
///
/// The matrix is symmetric with a zero diagonal. Neighbour pairs are also kept
/// as an upper-triangular edge list, which is what the ICAR density iterates.
#[derive(Debug, Clone)]
pub struct Adjacency {
    matrix: Array2<u8>,
    edges: Vec<(usize, usize)>,
}

impl Adjacency {
    /// Tracts are neighbours iff at least one boundary segment appears in both
    pub fn rook(tracts: &[Vec<Ring>]) -> Self {
        let mut owners: HashMap<SegmentKey, Vec<usize>> = HashMap::new();
        for (tract, rings) in tracts.iter().enumerate() {
            for segment in boundary_segments(rings) {
                let entry = owners.entry(segment).or_default();
                if entry.last() != Some(&tract) {
                    entry.push(tract);
                }
            }
        }

        let mut matrix = Array2::zeros((tracts.len(), tracts.len()));
        for sharing in owners.values().filter(|owners| owners.len() > 1) {
            for (k, &i) in sharing.iter().enumerate() {
                for &j in sharing.iter().skip(k + 1) {
                    Self::link(&mut matrix, i, j);
                }
            }
        }

        Self::from_matrix_unchecked(matrix)
    }

    /// Build from an explicit neighbour list
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range or a pair links a tract to itself
    pub fn from_pairs(size: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut matrix = Array2::zeros((size, size));
        for &(i, j) in pairs {
            if i >= size || j >= size {
                return Err(AnalysisError::InvalidSourceData {
                    reason: format!("neighbour pair ({i}, {j}) exceeds {size} tracts"),
                });
            }
            if i == j {
                return Err(AnalysisError::InvalidSourceData {
                    reason: format!("tract {i} cannot neighbour itself"),
                });
            }
            Self::link(&mut matrix, i, j);
        }
        Ok(Self::from_matrix_unchecked(matrix))
    }

    fn link(matrix: &mut Array2<u8>, i: usize, j: usize) {
        if i == j {
            return;
        }
        if let Some(cell) = matrix.get_mut([i, j]) {
            *cell = 1;
        }
        if let Some(cell) = matrix.get_mut([j, i]) {
            *cell = 1;
        }
    }

    fn from_matrix_unchecked(matrix: Array2<u8>) -> Self {
        let edges = matrix
            .indexed_iter()
            .filter(|&((i, j), &value)| i < j && value == 1)
            .map(|((i, j), _)| (i, j))
            .collect();
        Self { matrix, edges }
    }

    /// Number of tracts
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    /// Whether there are no tracts at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense 0/1 matrix
    pub const fn matrix(&self) -> &Array2<u8> {
        &self.matrix
    }

    /// Neighbour pairs `(i, j)` with `i < j`
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Whether tracts `i` and `j` share a border
    pub fn are_neighbours(&self, i: usize, j: usize) -> bool {
        self.matrix.get([i, j]).copied().unwrap_or(0) == 1
    }

    /// Number of neighbours of every tract
    pub fn neighbour_counts(&self) -> Vec<usize> {
        self.matrix
            .rows()
            .into_iter()
            .map(|row| row.iter().filter(|&&value| value == 1).count())
            .collect()
    }

    /// Tracts with no neighbours
    pub fn islands(&self) -> Vec<usize> {
        self.neighbour_counts()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(tract, _)| tract)
            .collect()
    }

    /// Whether the matrix equals its transpose
    pub fn is_symmetric(&self) -> bool {
        self.matrix == self.matrix.t()
    }
}
