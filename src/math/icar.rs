//! Intrinsic conditional autoregressive (ICAR) log density

use crate::spatial::Adjacency;

/// ICAR prior over a spatial field indexed by tract
///
/// The pairwise term penalizes squared differences across every neighbour pair
/// and is blind to a constant shift of the field. A soft sum-to-zero term with a
/// small standard deviation pins the level down.
#[derive(Debug, Clone)]
pub struct IcarPrior {
    edges: Vec<(usize, usize)>,
    size: usize,
    zero_sum_sd: f64,
}

impl IcarPrior {
    /// Prior over the tracts of `adjacency`
    pub fn new(adjacency: &Adjacency, zero_sum_sd: f64) -> Self {
        Self {
            edges: adjacency.edges().to_vec(),
            size: adjacency.len(),
            zero_sum_sd,
        }
    }

    /// Number of tracts in the field
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of neighbour pairs
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Pairwise difference term alone
    pub fn pairwise_ln_density(&self, field: &[f64]) -> f64 {
        -0.5 * self
            .edges
            .iter()
            .map(|&(i, j)| {
                let diff = field.get(i).copied().unwrap_or(0.0) - field.get(j).copied().unwrap_or(0.0);
                diff * diff
            })
            .sum::<f64>()
    }

    fn zero_sum_scale(&self) -> f64 {
        self.zero_sum_sd * self.size.max(1) as f64
    }

    /// Unnormalized log density of `field`
    pub fn ln_density(&self, field: &[f64]) -> f64 {
        let z = field.iter().sum::<f64>() / self.zero_sum_scale();
        self.pairwise_ln_density(field) - 0.5 * z * z
    }

    /// Log density of `field`, adding its gradient into `gradient`
    pub fn ln_density_with_gradient(&self, field: &[f64], gradient: &mut [f64]) -> f64 {
        let mut ln_density = 0.0;
        for &(i, j) in &self.edges {
            let diff = field.get(i).copied().unwrap_or(0.0) - field.get(j).copied().unwrap_or(0.0);
            ln_density -= 0.5 * diff * diff;
            if let Some(g) = gradient.get_mut(i) {
                *g -= diff;
            }
            if let Some(g) = gradient.get_mut(j) {
                *g += diff;
            }
        }

        let scale = self.zero_sum_scale();
        let total = field.iter().sum::<f64>();
        ln_density -= 0.5 * (total / scale).powi(2);
        let shared = total / (scale * scale);
        for g in gradient.iter_mut().take(self.size) {
            *g -= shared;
        }

        ln_density
    }
}
