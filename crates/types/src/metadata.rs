//! Per-sample metadata tables with raw, not yet validated cells.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Error type for building metadata tables.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataError {
    /// A sample identifier appeared twice
    DuplicateSample(String),
    /// A row did not have one value per column
    RowLength {
        id: String,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSample(id) => write!(f, "Duplicate sample identifier: {}", id),
            Self::RowLength {
                id,
                expected,
                found,
            } => write!(
                f,
                "Sample {} has {} values, expected {}",
                id, found, expected
            ),
        }
    }
}

impl std::error::Error for MetadataError {}

/// A single metadata cell as it arrived from the input.
///
/// Cells are resolved to numbers exactly once, when coordinates are cleaned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl RawValue {
    /// Classify a textual cell. Blank cells are `Missing`, cells that parse as
    /// a float are `Number`, anything else is kept as `Text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadlineage_types::metadata::RawValue;
    ///
    /// assert_eq!(RawValue::parse(" 42.5 "), RawValue::Number(42.5));
    /// assert_eq!(RawValue::parse(""), RawValue::Missing);
    /// assert_eq!(RawValue::parse("Not provided"), RawValue::Text("Not provided".into()));
    /// ```
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::Number(value),
            Err(_) => Self::Text(cell.to_string()),
        }
    }

    /// Coerce the cell to a finite number. Text that does not parse, blanks,
    /// NaN and infinities all coerce to `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Missing => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
            Self::Missing => Ok(()),
        }
    }
}

/// One sample's row of raw cells, ordered like the table's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub id: String,
    pub values: Vec<RawValue>,
}

/// Sample metadata: an id column followed by named value columns.
///
/// # Examples
///
/// ```
/// use quadlineage_types::metadata::{RawValue, SampleMetadata};
///
/// let mut md = SampleMetadata::new("SampleID", ["longitude", "latitude"]);
/// md.push_row("s1", vec![RawValue::from(-180.0), RawValue::from(-90.0)]).unwrap();
/// assert_eq!(md.len(), 1);
/// assert_eq!(md.value("s1", "latitude"), Some(&RawValue::Number(-90.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMetadata {
    id_header: String,
    columns: Vec<String>,
    rows: Vec<MetadataRow>,
    seen: HashSet<String>,
}

impl SampleMetadata {
    pub fn new<I, S>(id_header: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id_header: id_header.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append a row. Sample identifiers must be unique and every row must
    /// carry exactly one value per column.
    pub fn push_row(
        &mut self,
        id: impl Into<String>,
        values: Vec<RawValue>,
    ) -> Result<(), MetadataError> {
        let id = id.into();
        if values.len() != self.columns.len() {
            return Err(MetadataError::RowLength {
                id,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        if !self.seen.insert(id.clone()) {
            return Err(MetadataError::DuplicateSample(id));
        }
        self.rows.push(MetadataRow { id, values });
        Ok(())
    }

    /// Name of the identifier column (e.g. `SampleID`).
    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a single cell.
    pub fn value(&self, id: &str, column: &str) -> Option<&RawValue> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| row.values.get(idx))
    }

    /// Iterate `(sample_id, cell)` pairs of one column.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = (&'a str, &'a RawValue)> + 'a> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(move |row| (row.id.as_str(), &row.values[idx])),
        )
    }
}
