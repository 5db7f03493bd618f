//! Analysis constants and runtime configuration defaults

// Input columns expected on every tract feature
/// Average temperature property (may be missing)
pub const TEMPERATURE_COLUMN: &str = "tempAvg";
/// Weather station count property
pub const STATION_COUNT_COLUMN: &str = "num_statio";
/// Resident population property
pub const POPULATION_COLUMN: &str = "population";

// Derived output columns
/// Posterior predictive temperature mean under the ICAR model
pub const M1_TEMP_COLUMN: &str = "m1_temp";
/// Posterior predictive temperature standard deviation under the ICAR model
pub const M1_TEMP_STD_COLUMN: &str = "m1_temp_std";
/// Posterior predictive temperature mean under the preferential sampling model
pub const M2_TEMP_COLUMN: &str = "m2_temp";
/// Posterior predictive temperature standard deviation under the preferential sampling model
pub const M2_TEMP_STD_COLUMN: &str = "m2_temp_std";

/// Divisor applied to population before it enters the Poisson intensity
pub const POPULATION_SCALE: f64 = 1000.0;

// Prior hyperparameters
/// Shape of the inverse gamma prior on the spatial field variance
pub const FIELD_VARIANCE_ALPHA: f64 = 0.001;
/// Scale of the inverse gamma prior on the spatial field variance
pub const FIELD_VARIANCE_BETA: f64 = 0.001;
/// Prior mean of the per-tract observation noise variance
pub const NOISE_VARIANCE_MEAN: f64 = 0.1;
/// Prior standard deviation of the per-tract observation noise variance
pub const NOISE_VARIANCE_SD: f64 = 0.1;
/// Prior standard deviation of the global temperature intercept
pub const INTERCEPT_PRIOR_SD: f64 = 2.0;
/// Prior mean of both station intensity coefficients
pub const INTENSITY_PRIOR_MEAN: f64 = -1.0;
/// Prior standard deviation of both station intensity coefficients
pub const INTENSITY_PRIOR_SD: f64 = 1.0;
/// Standard deviation of the soft sum-to-zero constraint on the ICAR field
pub const ICAR_ZERO_SUM_SD: f64 = 0.001;

// Sampler settings
/// Fixed seed for reproducible sampling
pub const DEFAULT_SEED: u64 = 42;
/// Default number of retained posterior draws per model
pub const DEFAULT_DRAWS: u64 = 1000;
/// Default number of tuning iterations per model
pub const DEFAULT_TUNE: u64 = 1000;
/// Maximum trajectory doublings per transition
pub const MAX_TREE_DEPTH: u64 = 10;

// Stream offset keeping predictive draws independent of the sampler's RNG
/// Added to the run seed when seeding posterior predictive sampling
pub const PREDICTIVE_SEED_OFFSET: u64 = 1;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
