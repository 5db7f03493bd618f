//! Posterior sampling of the tract models with the `nuts-rs` No-U-Turn sampler
//!
//! Each model runs as one chain with a diagonal mass matrix adapted during
//! tuning. Retained draws stay in unconstrained space; the layout of the model
//! maps them back to natural-scale parameters.

use crate::io::configuration::{DEFAULT_DRAWS, DEFAULT_SEED, DEFAULT_TUNE, MAX_TREE_DEPTH};
use crate::io::error::{AnalysisError, Result, computation_error, invalid_parameter};
use crate::io::progress::SamplingProgress;
use crate::model::LogDensity;
use ndarray::Array2;
use nuts_rs::{
    Chain, CpuLogpFunc, CpuMath, DiagGradNutsSettings, LogpError, Math, SampleStats, Settings,
};
use rand08::SeedableRng;
use rand08::rngs::StdRng;
use std::fmt;

/// Rejected log density evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityError {
    /// The density or its gradient is not finite at the evaluated point
    NonFinite {
        /// Log density returned by the model
        ln_density: f64,
    },
}

impl fmt::Display for DensityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { ln_density } => {
                write!(f, "log density or its gradient is not finite ({ln_density})")
            }
        }
    }
}

impl std::error::Error for DensityError {}

// The sampler treats recoverable errors as divergent trajectories
impl LogpError for DensityError {
    fn is_recoverable(&self) -> bool {
        true
    }
}

/// A log density evaluated through the sampler's CPU backend
#[derive(Debug)]
pub struct DensityFunction<'model, M> {
    model: &'model M,
}

impl<'model, M: LogDensity> DensityFunction<'model, M> {
    /// Borrow `model` for the lifetime of a chain
    pub const fn new(model: &'model M) -> Self {
        Self { model }
    }
}

impl<M: LogDensity> CpuLogpFunc for DensityFunction<'_, M> {
    type LogpError = DensityError;

    fn dim(&self) -> usize {
        self.model.dim()
    }

    fn logp(
        &mut self,
        position: &[f64],
        gradient: &mut [f64],
    ) -> std::result::Result<f64, Self::LogpError> {
        let ln_density = self.model.ln_density_with_gradient(position, gradient);
        if ln_density.is_finite() && gradient.iter().all(|g| g.is_finite()) {
            Ok(ln_density)
        } else {
            Err(DensityError::NonFinite { ln_density })
        }
    }
}

/// Chain length and seed shared by both model fits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    /// Retained draws after tuning
    pub draws: u64,
    /// Tuning iterations spent adapting step size and mass matrix
    pub tune: u64,
    /// Seed for the chain's random number generator
    pub seed: u64,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            draws: DEFAULT_DRAWS,
            tune: DEFAULT_TUNE,
            seed: DEFAULT_SEED,
        }
    }
}

impl SamplerSettings {
    /// Check that the settings describe a runnable chain
    ///
    /// # Errors
    ///
    /// Returns an error if no draws are requested
    pub fn validate(&self) -> Result<()> {
        if self.draws == 0 {
            return Err(invalid_parameter(
                "draws",
                &self.draws,
                &"at least one draw is required",
            ));
        }
        Ok(())
    }

    /// Tuning plus retained iterations
    pub const fn total_iterations(&self) -> u64 {
        self.tune.saturating_add(self.draws)
    }

    /// Diagonal mass matrix NUTS configuration for one chain
    pub fn nuts(&self) -> DiagGradNutsSettings {
        DiagGradNutsSettings {
            num_tune: self.tune,
            num_draws: self.draws,
            maxdepth: MAX_TREE_DEPTH,
            seed: self.seed,
            ..Default::default()
        }
    }
}

/// Divergence counts and adapted step size of one chain
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChainStats {
    /// Divergent transitions while tuning
    pub warmup_divergences: usize,
    /// Divergent transitions among retained draws
    pub divergences: usize,
    /// Step size of the latest transition
    pub step_size: f64,
}

impl ChainStats {
    /// Account for one transition
    pub const fn record(&mut self, tuning: bool, diverging: bool, step_size: f64) {
        if diverging {
            if tuning {
                self.warmup_divergences += 1;
            } else {
                self.divergences += 1;
            }
        }
        self.step_size = step_size;
    }

    /// Divergences over tuning and sampling together
    pub const fn total_divergences(&self) -> usize {
        self.warmup_divergences + self.divergences
    }
}

/// Retained draws of one chain, one row per draw
#[derive(Debug, Clone)]
pub struct Posterior {
    draws: Array2<f64>,
    stats: ChainStats,
}

impl Posterior {
    /// All retained draws as a `draws x dim` matrix
    pub const fn draws(&self) -> &Array2<f64> {
        &self.draws
    }

    /// Divergences and step size of the chain
    pub const fn stats(&self) -> &ChainStats {
        &self.stats
    }
}

fn sampling_error<M: LogDensity>(model: &M, reason: &impl fmt::Display) -> AnalysisError {
    AnalysisError::Sampling {
        model: model.name(),
        reason: reason.to_string(),
    }
}

fn check_start<M: LogDensity>(model: &M, initial: &[f64]) -> Result<()> {
    if initial.len() != model.dim() {
        return Err(sampling_error(
            model,
            &format!(
                "initial position has {} entries, expected {}",
                initial.len(),
                model.dim()
            ),
        ));
    }

    let mut gradient = vec![0.0; model.dim()];
    DensityFunction::new(model)
        .logp(initial, &mut gradient)
        .map(|_| ())
        .map_err(|e| sampling_error(model, &format!("starting point rejected: {e}")))
}

/// Summarise the per-draw statistics of `_chain` via [`Chain::stats_summary`]
fn stats_summary<N: Math, C: Chain<N>>(_chain: &C, stats: &C::Stats) -> SampleStats {
    C::stats_summary(stats)
}

/// Run one chain on `model`, reporting every iteration to `progress`
///
/// The chain starts from [`crate::model::LogDensity::initial_position`] and
/// draws from a generator seeded with `settings.seed`, so equal seeds give
/// equal draws.
///
/// # Errors
///
/// Returns an error if:
/// - No draws are requested
/// - The starting point has a non-finite log density or gradient
/// - The sampler fails with an unrecoverable error
pub fn sample<M: LogDensity>(
    model: &M,
    settings: &SamplerSettings,
    progress: &SamplingProgress,
) -> Result<Posterior> {
    settings.validate()?;
    let initial = model.initial_position();
    check_start(model, &initial)?;

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let math = CpuMath::new(DensityFunction::new(model));
    let mut chain = settings.nuts().new_chain(0, math, &mut rng);
    chain
        .set_position(&initial)
        .map_err(|e| sampling_error(model, &e))?;

    let dim = model.dim();
    let mut retained = Vec::with_capacity(settings.draws as usize * dim);
    let mut stats = ChainStats::default();
    for completed in 1..=settings.total_iterations() {
        let (draw, raw_info) = chain.draw().map_err(|e| sampling_error(model, &e))?;
        let info = stats_summary(&chain, &raw_info);
        stats.record(info.tuning, info.diverging, info.step_size);
        if !info.tuning {
            retained.extend_from_slice(&draw);
        }
        progress.update(completed, stats.total_divergences());
    }

    let rows = retained.len() / dim.max(1);
    let draws = Array2::from_shape_vec((rows, dim), retained)
        .map_err(|e| computation_error("posterior draws", &e))?;
    Ok(Posterior { draws, stats })
}
