//! Column preparation: temperature masking and standardization, population rescaling

use crate::io::configuration::POPULATION_SCALE;
use crate::io::error::{AnalysisError, Result};
use crate::io::geojson::TractTable;

/// Mean and population standard deviation over the observed entries
///
/// Returns `None` when nothing is observed.
pub fn observed_moments(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }

    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;
    let variance = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Standardize observed values and fill missing positions with zero
///
/// Moments come from the observed entries only. A zero spread leaves the
/// values centred but unscaled.
///
/// # Errors
///
/// Returns an error if no value is observed
pub fn standardize_and_fill(values: &[Option<f64>]) -> Result<Vec<f64>> {
    let (mean, std_dev) = observed_moments(values).ok_or(AnalysisError::InvalidSourceData {
        reason: "no tract has an observed temperature".to_string(),
    })?;
    let scale = if std_dev > 0.0 { std_dev } else { 1.0 };

    Ok(values
        .iter()
        .map(|value| value.map_or(0.0, |v| (v - mean) / scale))
        .collect())
}

/// Divide every population by [`POPULATION_SCALE`]
pub fn rescale_population(population: &[f64]) -> Vec<f64> {
    population.iter().map(|p| p / POPULATION_SCALE).collect()
}

/// Model inputs derived from the tract table
#[derive(Debug, Clone)]
pub struct PreparedFeatures {
    /// Observed temperature per tract, `None` where missing
    pub temperature: Vec<Option<f64>>,
    /// Mean of the observed temperatures
    pub temperature_mean: f64,
    /// Standardized temperatures with missing entries at zero, used as the
    /// starting value of the spatial field
    pub initial_field: Vec<f64>,
    /// Weather stations per tract
    pub station_counts: Vec<u64>,
    /// Population per tract divided by [`POPULATION_SCALE`]
    pub population: Vec<f64>,
}

impl PreparedFeatures {
    /// Prepare features from raw columns
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length or no temperature is observed
    pub fn new(
        temperature: Vec<Option<f64>>,
        station_counts: Vec<u64>,
        population: &[f64],
    ) -> Result<Self> {
        if station_counts.len() != temperature.len() || population.len() != temperature.len() {
            return Err(AnalysisError::InvalidSourceData {
                reason: format!(
                    "column lengths differ: {} temperatures, {} counts, {} populations",
                    temperature.len(),
                    station_counts.len(),
                    population.len()
                ),
            });
        }

        let initial_field = standardize_and_fill(&temperature)?;
        let (temperature_mean, _) =
            observed_moments(&temperature).ok_or(AnalysisError::InvalidSourceData {
                reason: "no tract has an observed temperature".to_string(),
            })?;

        Ok(Self {
            temperature,
            temperature_mean,
            initial_field,
            station_counts,
            population: rescale_population(population),
        })
    }

    /// Extract and prepare the model columns of a tract table
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is absent or invalid
    pub fn from_table(table: &TractTable) -> Result<Self> {
        Self::new(
            table.temperatures()?,
            table.station_counts()?,
            &table.populations()?,
        )
    }

    /// Number of tracts
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    /// Whether there are no tracts
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Number of tracts with an observed temperature
    pub fn observed_count(&self) -> usize {
        self.temperature.iter().flatten().count()
    }
}
