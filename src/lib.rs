//! Preferential sampling correction for spatial temperature estimates
//!
//! Tract polygons are loaded from GeoJSON, linked by Rook contiguity, and used to
//! fit two Bayesian models of tract temperature with the `nuts-rs` No-U-Turn
//! sampler: an ICAR model, and the same model with a Poisson likelihood tying
//! weather station counts to the latent field. Posterior predictive means and standard deviations
//! of both models are written back as new columns.

#![forbid(unsafe_code)]

/// Temperature standardization and posterior predictive summaries
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Log densities, special functions and the ICAR prior
pub mod math;
/// Temperature models over the tract parameter vector
pub mod model;
/// Polygon boundaries and Rook adjacency
pub mod spatial;

pub use io::error::{AnalysisError, Result};
