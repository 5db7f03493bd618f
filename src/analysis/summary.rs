//! Posterior predictive temperature draws and their per-tract summaries

use crate::io::error::{Result, computation_error};
use crate::model::ParameterLayout;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Per-tract mean and standard deviation of predictive temperature
#[derive(Debug, Clone, PartialEq)]
pub struct PredictiveSummary {
    /// Mean over draws
    pub mean: Vec<f64>,
    /// Population standard deviation over draws
    pub std_dev: Vec<f64>,
}

/// Draw one predictive temperature per tract for every posterior draw
///
/// `draws` holds unconstrained parameter vectors, one per row. Each draw samples `Normal(mu + sqrt(sigma) * phi_i, sqrt(eps_i))`, so tracts
/// without an observed temperature are predicted exactly like observed ones.
pub fn posterior_predictive<R: Rng + ?Sized>(
    layout: ParameterLayout,
    draws: &Array2<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let mut predictions = Array2::zeros((draws.nrows(), layout.tracts()));

    for (mut row, draw) in predictions.axis_iter_mut(Axis(0)).zip(draws.rows()) {
        let parameters = layout.constrain(&draw.to_vec());
        let expected = parameters.expected_temperature();
        for ((cell, mean), variance) in row
            .iter_mut()
            .zip(&expected)
            .zip(&parameters.noise_variance)
        {
            let z: f64 = rng.sample(StandardNormal);
            *cell = variance.sqrt().mul_add(z, *mean);
        }
    }

    predictions
}

/// Reduce a `draws x tracts` matrix to per-tract mean and standard deviation
///
/// # Errors
///
/// Returns an error if the matrix has no draws
pub fn summarize(predictions: &Array2<f64>) -> Result<PredictiveSummary> {
    let mean = predictions
        .mean_axis(Axis(0))
        .ok_or_else(|| computation_error("predictive summary", &"no posterior draws"))?;
    let std_dev = predictions.std_axis(Axis(0), 0.0);

    Ok(PredictiveSummary {
        mean: mean.to_vec(),
        std_dev: std_dev.to_vec(),
    })
}

/// Predictive draws and summary for one fitted model, seeded for reproducibility
///
/// # Errors
///
/// Returns an error if there are no posterior draws
pub fn summarize_draws(
    layout: ParameterLayout,
    draws: &Array2<f64>,
    seed: u64,
) -> Result<PredictiveSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    summarize(&posterior_predictive(layout, draws, &mut rng))
}
