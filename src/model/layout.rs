//! Packing of model parameters into a single unconstrained vector
//!
//! Positive parameters live on the log scale. The vector layout is
//! `[mu, ln sigma, ln eps_1..ln eps_n, phi_1..phi_n, theta_0, theta_1]`, the
//! last two present only when station intensity is modelled.

use std::ops::Range;

/// Parameter values on their natural scale
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedDraw {
    /// Global temperature intercept `mu`
    pub intercept: f64,
    /// Variance scale of the spatial field `sigma`
    pub field_variance: f64,
    /// Observation noise variance `eps` per tract
    pub noise_variance: Vec<f64>,
    /// Spatial field `phi` per tract
    pub field: Vec<f64>,
    /// Station intensity coefficients `(theta_0, theta_1)`
    pub intensity: Option<(f64, f64)>,
}

impl ConstrainedDraw {
    /// Expected temperature `mu + sqrt(sigma) * phi_i` of every tract
    pub fn expected_temperature(&self) -> Vec<f64> {
        let scale = self.field_variance.sqrt();
        self.field
            .iter()
            .map(|phi| scale.mul_add(*phi, self.intercept))
            .collect()
    }
}

/// Offsets of each parameter block in the unconstrained vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterLayout {
    tracts: usize,
    with_intensity: bool,
}

impl ParameterLayout {
    /// Position of `mu`
    pub const INTERCEPT: usize = 0;
    /// Position of `ln sigma`
    pub const LN_FIELD_VARIANCE: usize = 1;

    /// Layout for `tracts` tracts, optionally with station intensity coefficients
    pub const fn new(tracts: usize, with_intensity: bool) -> Self {
        Self {
            tracts,
            with_intensity,
        }
    }

    /// Number of tracts
    pub const fn tracts(&self) -> usize {
        self.tracts
    }

    /// Whether `theta_0` and `theta_1` are part of the vector
    pub const fn with_intensity(&self) -> bool {
        self.with_intensity
    }

    /// Length of the unconstrained vector
    pub const fn dim(&self) -> usize {
        2 + 2 * self.tracts + if self.with_intensity { 2 } else { 0 }
    }

    /// Positions of `ln eps`
    pub const fn noise(&self) -> Range<usize> {
        2..2 + self.tracts
    }

    /// Positions of `phi`
    pub const fn field(&self) -> Range<usize> {
        2 + self.tracts..2 + 2 * self.tracts
    }

    /// Positions of `theta_0` and `theta_1`, if modelled
    pub const fn intensity(&self) -> Option<(usize, usize)> {
        if self.with_intensity {
            Some((2 + 2 * self.tracts, 3 + 2 * self.tracts))
        } else {
            None
        }
    }

    /// Map an unconstrained vector to natural-scale parameters
    pub fn constrain(&self, position: &[f64]) -> ConstrainedDraw {
        let at = |i: usize| position.get(i).copied().unwrap_or(0.0);
        ConstrainedDraw {
            intercept: at(Self::INTERCEPT),
            field_variance: at(Self::LN_FIELD_VARIANCE).exp(),
            noise_variance: position
                .get(self.noise())
                .unwrap_or(&[])
                .iter()
                .map(|v| v.exp())
                .collect(),
            field: position.get(self.field()).unwrap_or(&[]).to_vec(),
            intensity: self.intensity().map(|(t0, t1)| (at(t0), at(t1))),
        }
    }

    /// Map natural-scale parameters to an unconstrained vector
    pub fn unconstrain(&self, draw: &ConstrainedDraw) -> Vec<f64> {
        let mut position = Vec::with_capacity(self.dim());
        position.push(draw.intercept);
        position.push(draw.field_variance.ln());
        position.extend(draw.noise_variance.iter().map(|v| v.ln()));
        position.extend_from_slice(&draw.field);
        if self.with_intensity {
            let (theta_0, theta_1) = draw.intensity.unwrap_or_default();
            position.push(theta_0);
            position.push(theta_1);
        }
        position
    }
}
