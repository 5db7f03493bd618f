//! GeoJSON feature collection loading and writing for tract tables

use crate::io::configuration::{POPULATION_COLUMN, STATION_COUNT_COLUMN, TEMPERATURE_COLUMN};
use crate::io::error::{AnalysisError, Result, invalid_parameter, invalid_value};
use crate::spatial::geometry::{Ring, polygon_rings};
use geojson::{FeatureCollection, GeoJson};
use num_traits::ToPrimitive;
use serde_json::{Number, Value};
use std::path::Path;

/// In-memory tract table backed by a GeoJSON feature collection
///
/// Row order is the feature order of the source file and stays fixed for the
/// whole run. Anything the analysis does not touch is written back untouched.
#[derive(Debug, Clone)]
pub struct TractTable {
    collection: FeatureCollection,
}

impl TractTable {
    /// Load a table from a GeoJSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a feature
    /// collection, or contains no features
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::FileSystem {
            path: path.to_path_buf(),
            operation: "read",
            source: e,
        })?;
        Self::parse(&text, path)
    }

    /// Parse a table from GeoJSON text; `origin` is only used in error messages
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a non-empty feature collection
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let geojson = text
            .parse::<GeoJson>()
            .map_err(|e| AnalysisError::DataLoad {
                path: origin.to_path_buf(),
                source: e,
            })?;

        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            GeoJson::Feature(_) => {
                return Err(AnalysisError::InvalidSourceData {
                    reason: "expected a FeatureCollection, found a single Feature".to_string(),
                });
            }
            GeoJson::Geometry(geometry) => {
                return Err(AnalysisError::InvalidSourceData {
                    reason: format!(
                        "expected a FeatureCollection, found a bare {} geometry",
                        geometry.value.type_name()
                    ),
                });
            }
        };
        if collection.features.is_empty() {
            return Err(AnalysisError::InvalidSourceData {
                reason: "feature collection has no tracts".to_string(),
            });
        }

        Ok(Self { collection })
    }

    /// Number of tracts
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    /// Whether the table has no tracts
    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    /// Polygon rings of every tract, in row order
    ///
    /// # Errors
    ///
    /// Returns an error if any geometry is not a polygon or multipolygon
    pub fn rings(&self) -> Result<Vec<Vec<Ring>>> {
        self.collection
            .features
            .iter()
            .enumerate()
            .map(|(row, feature)| polygon_rings(row, feature.geometry.as_ref()))
            .collect()
    }

    /// Average temperature of every tract, `None` where missing
    ///
    /// # Errors
    ///
    /// Returns an error if a present, non-null temperature is not a number
    pub fn temperatures(&self) -> Result<Vec<Option<f64>>> {
        self.collection
            .features
            .iter()
            .enumerate()
            .map(|(row, feature)| {
                match feature.property(TEMPERATURE_COLUMN) {
                    None | Some(Value::Null) => Ok(None),
                    Some(Value::Number(n)) => Ok(n.as_f64().filter(|v| v.is_finite())),
                    Some(other) => Err(invalid_value(
                        row,
                        TEMPERATURE_COLUMN,
                        &format!("{other} is not a number"),
                    )),
                }
            })
            .collect()
    }

    /// Station count of every tract
    ///
    /// # Errors
    ///
    /// Returns an error if a count is absent, negative, or fractional
    pub fn station_counts(&self) -> Result<Vec<u64>> {
        (0..self.len())
            .map(|row| {
                let value = self.required_number(row, STATION_COUNT_COLUMN)?;
                if value.fract() != 0.0 {
                    return Err(invalid_value(
                        row,
                        STATION_COUNT_COLUMN,
                        &format!("{value} is not a whole number"),
                    ));
                }
                value.to_u64().ok_or_else(|| {
                    invalid_value(row, STATION_COUNT_COLUMN, &format!("{value} is negative"))
                })
            })
            .collect()
    }

    /// Population of every tract
    ///
    /// # Errors
    ///
    /// Returns an error if a population is absent or negative
    pub fn populations(&self) -> Result<Vec<f64>> {
        (0..self.len())
            .map(|row| {
                let value = self.required_number(row, POPULATION_COLUMN)?;
                if value < 0.0 {
                    return Err(invalid_value(
                        row,
                        POPULATION_COLUMN,
                        &format!("{value} is negative"),
                    ));
                }
                Ok(value)
            })
            .collect()
    }

    fn required_number(&self, row: usize, column: &'static str) -> Result<f64> {
        let value = self
            .collection
            .features
            .get(row)
            .and_then(|f| f.property(column))
            .filter(|v| !v.is_null())
            .ok_or(AnalysisError::MissingColumn { row, column })?;
        value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid_value(row, column, &format!("{value} is not a number")))
    }

    /// Set a numeric property on every tract, replacing any existing value
    ///
    /// Non-finite values are stored as `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not have one entry per tract
    pub fn append_column(&mut self, name: &str, values: &[f64]) -> Result<()> {
        if values.len() != self.len() {
            return Err(invalid_parameter(
                "values",
                &values.len(),
                &format!("column '{name}' needs one value per tract ({})", self.len()),
            ));
        }

        for (feature, &value) in self.collection.features.iter_mut().zip(values) {
            let number = Number::from_f64(value).map_or(Value::Null, Value::Number);
            feature.set_property(name, number);
        }
        Ok(())
    }

    /// Serialize the table as pretty-printed GeoJSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_string(&self, origin: &Path) -> Result<String> {
        serde_json::to_string_pretty(&self.collection).map_err(|e| AnalysisError::DataExport {
            path: origin.to_path_buf(),
            source: e,
        })
    }

    /// Write the table to a GeoJSON file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - Serialization fails
    /// - The file cannot be written
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AnalysisError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let text = self.to_json_string(path)?;
        std::fs::write(path, text).map_err(|e| AnalysisError::FileSystem {
            path: path.to_path_buf(),
            operation: "write",
            source: e,
        })
    }
}
