//! Column selection, missing-data policy and coordinate range checks.

use crate::error::{LineageError, Result};
use quadlineage_types::metadata::SampleMetadata;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with samples missing a value in a required column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingData {
    /// Fail, listing the incomplete samples
    #[default]
    Error,
    /// Drop the incomplete samples
    Ignore,
}

impl FromStr for MissingData {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "ignore" => Ok(Self::Ignore),
            other => Err(LineageError::InvalidInput(format!(
                "Unknown missing-data policy {:?}, expected \"error\" or \"ignore\"",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MissingData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Ignore => f.write_str("ignore"),
        }
    }
}

/// A sample with one numeric value per requested column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRow {
    pub id: String,
    pub values: Vec<f64>,
}

/// Select `columns` from `metadata` as numbers.
///
/// Every column must exist. Rows with a blank or non-numeric value in any
/// selected column either fail the call or are dropped, per `missing`.
///
/// # Examples
///
/// ```
/// use quadlineage::compute::validation::{load_and_validate, MissingData};
/// use quadlineage_types::metadata::{RawValue, SampleMetadata};
///
/// let mut md = SampleMetadata::new("sampleid", ["a", "b"]);
/// md.push_row("s1", vec![RawValue::from(1.0), RawValue::from(2.0)]).unwrap();
/// md.push_row("s2", vec![RawValue::from(3.0), RawValue::Missing]).unwrap();
///
/// assert!(load_and_validate(&md, &["a", "b"], MissingData::Error).is_err());
/// let rows = load_and_validate(&md, &["a", "b"], MissingData::Ignore)?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].values, vec![1.0, 2.0]);
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn load_and_validate(
    metadata: &SampleMetadata,
    columns: &[&str],
    missing: MissingData,
) -> Result<Vec<NumericRow>> {
    let indices = columns
        .iter()
        .map(|&column| {
            metadata
                .column_index(column)
                .ok_or_else(|| LineageError::MissingColumn {
                    column: column.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(metadata.len());
    let mut incomplete = Vec::new();

    for row in metadata.rows() {
        let values: Option<Vec<f64>> = indices.iter().map(|&i| row.values[i].as_number()).collect();
        match values {
            Some(values) => rows.push(NumericRow {
                id: row.id.clone(),
                values,
            }),
            None => incomplete.push(row.id.clone()),
        }
    }

    if !incomplete.is_empty() {
        match missing {
            MissingData::Error => {
                return Err(LineageError::MissingData {
                    samples: incomplete,
                });
            }
            MissingData::Ignore => log::warn!(
                "Ignoring {} samples with missing {} values",
                incomplete.len(),
                columns.join("/")
            ),
        }
    }

    Ok(rows)
}

/// Validates a longitude/latitude pair.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use quadlineage::compute::validation::validate_geographic_point;
///
/// // Valid point
/// assert!(validate_geographic_point(-74.0060, 40.7128).is_ok());
///
/// // Invalid longitude
/// assert!(validate_geographic_point(200.0, 40.0).is_err());
///
/// // Invalid latitude
/// assert!(validate_geographic_point(-74.0, 95.0).is_err());
/// ```
pub fn validate_geographic_point(longitude: f64, latitude: f64) -> Result<()> {
    if !longitude.is_finite() {
        return Err(LineageError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !latitude.is_finite() {
        return Err(LineageError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(LineageError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(LineageError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    Ok(())
}
