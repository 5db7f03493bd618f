//! Command-line interface and the end-to-end analysis run

use crate::analysis::features::PreparedFeatures;
use crate::analysis::summary::{PredictiveSummary, summarize_draws};
use crate::io::configuration::{
    DEFAULT_DRAWS, DEFAULT_SEED, DEFAULT_TUNE, M1_TEMP_COLUMN, M1_TEMP_STD_COLUMN, M2_TEMP_COLUMN,
    M2_TEMP_STD_COLUMN, PREDICTIVE_SEED_OFFSET,
};
use crate::io::error::{AnalysisError, Result};
use crate::io::geojson::TractTable;
use crate::io::progress::SamplingProgress;
use crate::model::{IcarModel, PreferentialModel, SamplerSettings, TractModel, sample};
use crate::spatial::Adjacency;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prefsample")]
#[command(
    author,
    version,
    about = "Fit ICAR and preferential sampling temperature models to tract polygons"
)]
/// Command-line arguments for the preferential sampling analysis
pub struct Cli {
    /// Input GeoJSON feature collection of tracts
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,

    /// Output GeoJSON file for the augmented tracts
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Random seed for reproducible sampling
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Posterior draws retained per model
    #[arg(long, default_value_t = DEFAULT_DRAWS)]
    pub draws: u64,

    /// Tuning iterations per model
    #[arg(long, default_value_t = DEFAULT_TUNE)]
    pub tune: u64,

    /// Suppress progress bars and informational logging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Sampler settings shared by both model fits
    pub const fn sampler_settings(&self) -> SamplerSettings {
        SamplerSettings {
            draws: self.draws,
            tune: self.tune,
            seed: self.seed,
        }
    }

    /// Default log filter: `RUST_LOG` if set, otherwise `info` (or `warn` when quiet)
    pub fn log_filter(&self) -> EnvFilter {
        let level = if self.quiet { "warn" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }

    /// Install the stderr log subscriber; a subscriber installed earlier wins
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Posterior predictive summaries of both models
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummaries {
    /// ICAR model
    pub icar: PredictiveSummary,
    /// ICAR model with preferential sampling correction
    pub preferential: PredictiveSummary,
}

/// Runs the load, fit, predict and save pipeline for one input file
pub struct AnalysisRunner {
    cli: Cli,
}

impl AnalysisRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the input, fit both models and write the augmented tracts
    ///
    /// # Errors
    ///
    /// Returns an error if loading, fitting, or writing fails
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        info!(path = %self.cli.data.display(), "loading tracts");
        let mut table = TractTable::from_path(&self.cli.data)?;

        self.analyze(&mut table)?;

        info!(path = %self.cli.output.display(), "saving file");
        table.write(&self.cli.output)?;
        info!(
            elapsed_secs = start_time.elapsed().as_secs_f64(),
            "analysis complete"
        );
        Ok(())
    }

    /// Fit both models to `table` and append the four derived columns
    ///
    /// # Errors
    ///
    /// Returns an error if the table lacks required data or a model cannot be sampled
    pub fn analyze(&self, table: &mut TractTable) -> Result<ModelSummaries> {
        let adjacency = Adjacency::rook(&table.rings()?);
        let islands = adjacency.islands();
        info!(
            tracts = adjacency.len(),
            neighbour_pairs = adjacency.edges().len(),
            "built rook adjacency"
        );
        if !islands.is_empty() {
            warn!(count = islands.len(), tracts = ?islands, "tracts without neighbours");
        }

        let features = PreparedFeatures::from_table(table)?;
        info!(
            observed = features.observed_count(),
            missing = features.len() - features.observed_count(),
            mean_temperature = features.temperature_mean,
            "prepared features"
        );

        info!("fitting model 1");
        let icar = self.fit(&IcarModel::new(&features, &adjacency)?)?;
        table.append_column(M1_TEMP_COLUMN, &icar.mean)?;
        table.append_column(M1_TEMP_STD_COLUMN, &icar.std_dev)?;

        info!("fitting model 2");
        let preferential = self.fit(&PreferentialModel::new(&features, &adjacency)?)?;
        table.append_column(M2_TEMP_COLUMN, &preferential.mean)?;
        table.append_column(M2_TEMP_STD_COLUMN, &preferential.std_dev)?;

        Ok(ModelSummaries { icar, preferential })
    }

    fn fit<M: TractModel>(&self, model: &M) -> Result<PredictiveSummary> {
        let settings = self.cli.sampler_settings();
        info!(
            model = model.name(),
            parameters = model.dim(),
            draws = settings.draws,
            tune = settings.tune,
            seed = settings.seed,
            "sampling"
        );

        let progress = if self.cli.should_show_progress() {
            SamplingProgress::new(model.name(), settings.tune, settings.draws)
        } else {
            SamplingProgress::hidden(settings.tune, settings.draws)
        };

        let result = sample(model, &settings, &progress);
        progress.finish();
        let posterior = result?;

        let stats = posterior.stats();
        info!(
            model = model.name(),
            step_size = stats.step_size,
            warmup_divergences = stats.warmup_divergences,
            "sampling finished"
        );
        if stats.divergences > 0 {
            warn!(
                model = model.name(),
                divergences = stats.divergences,
                draws = posterior.draws().nrows(),
                "divergent transitions after tuning"
            );
        }

        summarize_draws(
            model.layout(),
            posterior.draws(),
            settings.seed.wrapping_add(PREDICTIVE_SEED_OFFSET),
        )
    }
}

/// Write the display text of a failed run, followed by a newline
///
/// # Errors
///
/// Returns an error if `out` cannot be written
pub fn write_failure(out: &mut impl Write, error: &AnalysisError) -> std::io::Result<()> {
    writeln!(out, "Error: {error}")
}
