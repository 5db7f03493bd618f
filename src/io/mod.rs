//! Input/output, command-line handling and error types

/// Command-line arguments and the analysis pipeline
pub mod cli;
/// Column names, prior constants and sampler defaults
pub mod configuration;
/// Error types
pub mod error;
/// GeoJSON feature collection reading and writing
pub mod geojson;
/// Sampling progress bars
pub mod progress;
