//! ICAR model with a preferential sampling correction
//!
//! Station counts follow `Poisson(population_i * exp(theta_0 + theta_1 * phi_i))`,
//! tying where stations were sited to the same latent field that drives
//! temperature.

use crate::analysis::features::PreparedFeatures;
use crate::io::configuration::{INTENSITY_PRIOR_MEAN, INTENSITY_PRIOR_SD};
use crate::io::error::Result;
use crate::math::probability::{normal_ln_pdf, poisson_ln_pmf};
use crate::model::icar::IcarModel;
use crate::model::layout::{ConstrainedDraw, ParameterLayout};
use crate::model::{LogDensity, TractModel};
use crate::spatial::Adjacency;

/// Joint temperature and station-count model
#[derive(Debug, Clone)]
pub struct PreferentialModel {
    temperature: IcarModel,
    station_counts: Vec<u64>,
    ln_population: Vec<f64>,
    intensity_prior: (f64, f64),
}

impl PreferentialModel {
    /// Build the model from prepared features and tract contiguity
    ///
    /// # Errors
    ///
    /// Returns an error if the adjacency and features cover different tract counts
    pub fn new(features: &PreparedFeatures, adjacency: &Adjacency) -> Result<Self> {
        let layout = ParameterLayout::new(features.len(), true);
        Ok(Self {
            temperature: IcarModel::with_layout(features, adjacency, layout)?,
            station_counts: features.station_counts.clone(),
            ln_population: features.population.iter().map(|p| p.ln()).collect(),
            intensity_prior: (INTENSITY_PRIOR_MEAN, INTENSITY_PRIOR_SD),
        })
    }

    /// Natural-scale starting values of the chain
    pub fn initial_draw(&self) -> ConstrainedDraw {
        let (mean, _) = self.intensity_prior;
        ConstrainedDraw {
            intensity: Some((mean, mean)),
            ..self.temperature.initial_draw()
        }
    }
}

impl LogDensity for PreferentialModel {
    fn name(&self) -> &'static str {
        "ICAR + preferential sampling model"
    }

    fn dim(&self) -> usize {
        self.temperature.layout().dim()
    }

    fn initial_position(&self) -> Vec<f64> {
        self.temperature.layout().unconstrain(&self.initial_draw())
    }

    fn ln_density_with_gradient(&self, position: &[f64], gradient: &mut [f64]) -> f64 {
        let layout = self.temperature.layout();
        let mut ln_density = self.temperature.temperature_ln_density(position, gradient);

        let Some((theta_0_at, theta_1_at)) = layout.intensity() else {
            return ln_density;
        };
        let theta_0 = position.get(theta_0_at).copied().unwrap_or(0.0);
        let theta_1 = position.get(theta_1_at).copied().unwrap_or(0.0);
        let field_start = layout.field().start;
        let (prior_mean, prior_sd) = self.intensity_prior;
        let prior_precision = 1.0 / (prior_sd * prior_sd);

        ln_density += normal_ln_pdf(theta_0, prior_mean, prior_sd)
            + normal_ln_pdf(theta_1, prior_mean, prior_sd);
        let mut grad_theta_0 = -(theta_0 - prior_mean) * prior_precision;
        let mut grad_theta_1 = -(theta_1 - prior_mean) * prior_precision;

        for (i, (&count, &ln_population)) in self
            .station_counts
            .iter()
            .zip(&self.ln_population)
            .enumerate()
        {
            let phi = position.get(field_start + i).copied().unwrap_or(0.0);
            let ln_rate = theta_1.mul_add(phi, theta_0) + ln_population;
            ln_density += poisson_ln_pmf(count, ln_rate);

            // Zero population has a fixed zero rate
            if ln_population == f64::NEG_INFINITY {
                continue;
            }
            let residual = count as f64 - ln_rate.exp();
            grad_theta_0 += residual;
            grad_theta_1 += residual * phi;
            if let Some(g) = gradient.get_mut(field_start + i) {
                *g += residual * theta_1;
            }
        }

        if let Some(g) = gradient.get_mut(theta_0_at) {
            *g = grad_theta_0;
        }
        if let Some(g) = gradient.get_mut(theta_1_at) {
            *g = grad_theta_1;
        }

        ln_density
    }
}

impl TractModel for PreferentialModel {
    fn layout(&self) -> ParameterLayout {
        self.temperature.layout()
    }
}
