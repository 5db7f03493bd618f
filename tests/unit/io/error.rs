//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use prefsample::AnalysisError;
    use prefsample::io::error::{computation_error, invalid_parameter, invalid_value};
    use std::error::Error;
    use std::path::PathBuf;

    // Tests error source chaining works for wrapped I/O errors
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = AnalysisError::FileSystem {
            path: "/tmp/tracts.geojson".into(),
            operation: "read",
            source: io_error,
        };

        assert!(error.source().is_some());
        let message = error.to_string();
        assert!(message.contains("read"));
        assert!(message.contains("/tmp/tracts.geojson"));
        assert!(message.contains("file not found"));
    }

    // Tests DataLoad wraps the GeoJSON parse error and names the path
    // Verified by excluding source error from message
    #[test]
    fn test_data_load_error() {
        let Err(parse_error) = "{not json".parse::<geojson::GeoJson>() else {
            unreachable!("Malformed JSON should not parse");
        };
        let error = AnalysisError::DataLoad {
            path: PathBuf::from("tracts.geojson"),
            source: parse_error,
        };

        assert!(error.source().is_some());
        assert!(error.to_string().contains("tracts.geojson"));
    }

    // Tests feature-level errors name the row and column
    // Verified by omitting the row from the message
    #[test]
    fn test_feature_error_messages() {
        let missing = AnalysisError::MissingColumn {
            row: 4,
            column: "population",
        };
        assert_eq!(
            missing.to_string(),
            "Feature 4 is missing required property 'population'"
        );
        assert!(missing.source().is_none());

        let invalid = invalid_value(2, "num_statio", &"1.5 is not a whole number");
        assert_eq!(
            invalid.to_string(),
            "Feature 2 has invalid 'num_statio': 1.5 is not a whole number"
        );

        let geometry = AnalysisError::InvalidGeometry {
            row: 9,
            reason: "feature has no geometry".to_string(),
        };
        assert!(geometry.to_string().contains("Feature 9"));
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("draws", &0, &"at least one draw is required");

        let message = error.to_string();
        assert!(message.contains("draws"));
        assert!(message.contains('0'));
        assert!(message.contains("at least one draw is required"));
    }

    // Tests sampling and computation errors carry their context
    // Verified by dropping the model name
    #[test]
    fn test_sampling_and_computation_errors() {
        let sampling = AnalysisError::Sampling {
            model: "ICAR model",
            reason: "log density is not finite".to_string(),
        };
        assert_eq!(
            sampling.to_string(),
            "Sampling failed for ICAR model: log density is not finite"
        );

        let computation = computation_error("predictive summary", &"no posterior draws");
        assert!(matches!(
            computation,
            AnalysisError::Computation {
                operation: "predictive summary",
                ..
            }
        ));
        assert!(computation.to_string().contains("no posterior draws"));
    }
}
