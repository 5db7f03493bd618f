//! Error types for loading, modelling and writing tract data

use std::fmt;
use std::path::PathBuf;

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Input file is not valid JSON or not well-formed GeoJSON
    DataLoad {
        /// Path to the input file
        path: PathBuf,
        /// Underlying parse error
        source: geojson::Error,
    },

    /// Failed to serialize the augmented table
    DataExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A required property is absent from a feature
    MissingColumn {
        /// Row index of the feature
        row: usize,
        /// Name of the absent property
        column: &'static str,
    },

    /// A property is present but unusable
    InvalidValue {
        /// Row index of the feature
        row: usize,
        /// Name of the offending property
        column: &'static str,
        /// Explanation of why the value is rejected
        reason: String,
    },

    /// A feature geometry cannot be interpreted as a polygon
    InvalidGeometry {
        /// Row index of the feature
        row: usize,
        /// Description of the problem
        reason: String,
    },

    /// Source data doesn't meet analysis requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Analysis parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The sampler could not start or continue
    Sampling {
        /// Name of the model being fitted
        model: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataLoad { path, source } => {
                write!(f, "Failed to load tracts from '{}': {source}", path.display())
            }
            Self::DataExport { path, source } => {
                write!(
                    f,
                    "Failed to export tracts to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::MissingColumn { row, column } => {
                write!(f, "Feature {row} is missing required property '{column}'")
            }
            Self::InvalidValue {
                row,
                column,
                reason,
            } => {
                write!(f, "Feature {row} has invalid '{column}': {reason}")
            }
            Self::InvalidGeometry { row, reason } => {
                write!(f, "Feature {row} has invalid geometry: {reason}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Sampling { model, reason } => {
                write!(f, "Sampling failed for {model}: {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DataLoad { source, .. } => Some(source),
            Self::DataExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> AnalysisError {
    AnalysisError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an invalid value error for a feature property
pub fn invalid_value(row: usize, column: &'static str, reason: &impl ToString) -> AnalysisError {
    AnalysisError::InvalidValue {
        row,
        column,
        reason: reason.to_string(),
    }
}
