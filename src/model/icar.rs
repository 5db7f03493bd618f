//! ICAR smoothing model of tract temperature
//!
//! `temp_i ~ Normal(mu + sqrt(sigma) * phi_i, sqrt(eps_i))` for every tract with
//! an observed temperature, with `phi` under an ICAR prior. Tracts without a
//! reading contribute no likelihood term.

use crate::analysis::features::PreparedFeatures;
use crate::io::configuration::{
    FIELD_VARIANCE_ALPHA, FIELD_VARIANCE_BETA, ICAR_ZERO_SUM_SD, INTERCEPT_PRIOR_SD,
    NOISE_VARIANCE_MEAN, NOISE_VARIANCE_SD,
};
use crate::io::error::{AnalysisError, Result};
use crate::math::icar::IcarPrior;
use crate::math::probability::{
    LN_SQRT_2PI, inverse_gamma_from_moments, inverse_gamma_ln_pdf, normal_ln_pdf,
};
use crate::model::layout::{ConstrainedDraw, ParameterLayout};
use crate::model::{LogDensity, TractModel};
use crate::spatial::Adjacency;

/// Prior hyperparameters shared by both models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePriors {
    /// Mean of the normal prior on `mu`
    pub intercept_mean: f64,
    /// Standard deviation of the normal prior on `mu`
    pub intercept_sd: f64,
    /// Inverse gamma `(alpha, beta)` on `sigma`
    pub field_variance: (f64, f64),
    /// Inverse gamma `(alpha, beta)` on each `eps_i`
    pub noise_variance: (f64, f64),
}

impl TemperaturePriors {
    /// Default priors centred on the observed mean temperature
    pub fn centred_on(intercept_mean: f64) -> Self {
        Self {
            intercept_mean,
            intercept_sd: INTERCEPT_PRIOR_SD,
            field_variance: (FIELD_VARIANCE_ALPHA, FIELD_VARIANCE_BETA),
            noise_variance: inverse_gamma_from_moments(NOISE_VARIANCE_MEAN, NOISE_VARIANCE_SD),
        }
    }
}

/// ICAR temperature model
#[derive(Debug, Clone)]
pub struct IcarModel {
    layout: ParameterLayout,
    temperature: Vec<Option<f64>>,
    priors: TemperaturePriors,
    field_prior: IcarPrior,
    initial_field: Vec<f64>,
}

impl IcarModel {
    /// Build the model from prepared features and tract contiguity
    ///
    /// # Errors
    ///
    /// Returns an error if the adjacency and features cover different tract counts
    pub fn new(features: &PreparedFeatures, adjacency: &Adjacency) -> Result<Self> {
        Self::with_layout(
            features,
            adjacency,
            ParameterLayout::new(features.len(), false),
        )
    }

    pub(crate) fn with_layout(
        features: &PreparedFeatures,
        adjacency: &Adjacency,
        layout: ParameterLayout,
    ) -> Result<Self> {
        if adjacency.len() != features.len() {
            return Err(AnalysisError::InvalidSourceData {
                reason: format!(
                    "adjacency covers {} tracts but features cover {}",
                    adjacency.len(),
                    features.len()
                ),
            });
        }

        Ok(Self {
            layout,
            temperature: features.temperature.clone(),
            priors: TemperaturePriors::centred_on(features.temperature_mean),
            field_prior: IcarPrior::new(adjacency, ICAR_ZERO_SUM_SD),
            initial_field: features.initial_field.clone(),
        })
    }

    /// Natural-scale starting values of the chain
    pub fn initial_draw(&self) -> ConstrainedDraw {
        let (alpha, beta) = self.priors.noise_variance;
        ConstrainedDraw {
            intercept: self.priors.intercept_mean,
            field_variance: 1.0,
            // Prior mean, defined because alpha > 1
            noise_variance: vec![beta / (alpha - 1.0); self.layout.tracts()],
            field: self.initial_field.clone(),
            intensity: None,
        }
    }

    /// Log density of the shared temperature part, writing its gradient
    ///
    /// Only the intercept, field variance, noise and field blocks of `gradient`
    /// are written; any intensity entries are left for the caller.
    pub(crate) fn temperature_ln_density(&self, position: &[f64], gradient: &mut [f64]) -> f64 {
        let n = self.layout.tracts();
        let at = |i: usize| position.get(i).copied().unwrap_or(0.0);
        let intercept = at(ParameterLayout::INTERCEPT);
        let ln_field_variance = at(ParameterLayout::LN_FIELD_VARIANCE);
        let ln_noise = position.get(self.layout.noise()).unwrap_or(&[]);
        let field = position.get(self.layout.field()).unwrap_or(&[]);

        let mut grad_noise = vec![0.0; n];
        let mut grad_field = vec![0.0; n];

        // mu ~ Normal
        let TemperaturePriors {
            intercept_mean,
            intercept_sd,
            field_variance: (sigma_alpha, sigma_beta),
            noise_variance: (eps_alpha, eps_beta),
        } = self.priors;
        let mut ln_density = normal_ln_pdf(intercept, intercept_mean, intercept_sd);
        let mut grad_intercept = -(intercept - intercept_mean) / (intercept_sd * intercept_sd);

        // sigma ~ InverseGamma on the log scale, Jacobian included
        ln_density +=
            inverse_gamma_ln_pdf(ln_field_variance.exp(), sigma_alpha, sigma_beta) + ln_field_variance;
        let mut grad_ln_field_variance = sigma_beta.mul_add((-ln_field_variance).exp(), -sigma_alpha);

        for (g, &ln_eps) in grad_noise.iter_mut().zip(ln_noise) {
            ln_density += inverse_gamma_ln_pdf(ln_eps.exp(), eps_alpha, eps_beta) + ln_eps;
            *g = eps_beta.mul_add((-ln_eps).exp(), -eps_alpha);
        }

        ln_density += self
            .field_prior
            .ln_density_with_gradient(field, &mut grad_field);

        let field_scale = (0.5 * ln_field_variance).exp();
        for (i, observed) in self.temperature.iter().enumerate() {
            let Some(y) = *observed else {
                continue;
            };
            let phi = field.get(i).copied().unwrap_or(0.0);
            let ln_eps = ln_noise.get(i).copied().unwrap_or(0.0);
            let precision = (-ln_eps).exp();
            let residual = y - field_scale.mul_add(phi, intercept);

            ln_density += (-0.5 * residual * residual).mul_add(precision, -0.5 * ln_eps) - LN_SQRT_2PI;

            let weighted = residual * precision;
            grad_intercept += weighted;
            grad_ln_field_variance += 0.5 * weighted * field_scale * phi;
            if let Some(g) = grad_field.get_mut(i) {
                *g += weighted * field_scale;
            }
            if let Some(g) = grad_noise.get_mut(i) {
                *g += 0.5f64.mul_add(residual * weighted, -0.5);
            }
        }

        if let Some(g) = gradient.get_mut(ParameterLayout::INTERCEPT) {
            *g = grad_intercept;
        }
        if let Some(g) = gradient.get_mut(ParameterLayout::LN_FIELD_VARIANCE) {
            *g = grad_ln_field_variance;
        }
        if let Some(block) = gradient.get_mut(self.layout.noise()) {
            block.copy_from_slice(&grad_noise);
        }
        if let Some(block) = gradient.get_mut(self.layout.field()) {
            block.copy_from_slice(&grad_field);
        }

        ln_density
    }
}

impl LogDensity for IcarModel {
    fn name(&self) -> &'static str {
        "ICAR model"
    }

    fn dim(&self) -> usize {
        self.layout.dim()
    }

    fn initial_position(&self) -> Vec<f64> {
        self.layout.unconstrain(&self.initial_draw())
    }

    fn ln_density_with_gradient(&self, position: &[f64], gradient: &mut [f64]) -> f64 {
        self.temperature_ln_density(position, gradient)
    }
}

impl TractModel for IcarModel {
    fn layout(&self) -> ParameterLayout {
        self.layout
    }
}
