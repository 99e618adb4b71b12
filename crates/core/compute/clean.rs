//! Coordinate cleaning: coerce raw cells, drop unusable rows and anchor the
//! surviving points at the origin.

use crate::error::{LineageError, Result};
use geo::{BoundingRect, MultiPoint, Rect};
use quadlineage_types::metadata::SampleMetadata;
use quadlineage_types::point::SamplePoint;
use serde::{Deserialize, Serialize};

/// Cleaned coordinates ready for subdivision.
///
/// Every point is finite and non-negative, and the minimum of each axis is
/// exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedCoordinates {
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<SamplePoint>,
    /// Samples removed because a coordinate was missing or not numeric
    pub dropped: Vec<String>,
}

impl CleanedCoordinates {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// Extent of the cleaned points: `[0, x_max] x [0, y_max]`.
    pub fn bounds(&self) -> Option<Rect> {
        bounding_rect(&self.points)
    }

    /// Run the translation again. Cleaned input is returned unchanged.
    pub fn reclean(&self) -> Self {
        Self {
            x_column: self.x_column.clone(),
            y_column: self.y_column.clone(),
            points: normalize(&self.points),
            dropped: self.dropped.clone(),
        }
    }
}

/// Clean the `x_column`/`y_column` coordinates of `metadata`.
///
/// Cells that are blank, missing or not numeric make their sample drop out;
/// the dropped identifiers are kept on the result. The survivors are shifted
/// so that the smallest x and the smallest y become zero.
///
/// # Errors
///
/// - [`LineageError::MissingColumn`] if either column is absent
/// - [`LineageError::NoNumericData`] if no sample has two numeric coordinates
///
/// # Examples
///
/// ```
/// use quadlineage::compute::clean::clean;
/// use quadlineage_types::metadata::{RawValue, SampleMetadata};
///
/// let mut md = SampleMetadata::new("SampleID", ["longitude", "latitude"]);
/// md.push_row("sw", vec![RawValue::from(-180.0), RawValue::from(-90.0)]).unwrap();
/// md.push_row("ne", vec![RawValue::from(180.0), RawValue::from(90.0)]).unwrap();
/// md.push_row("np", vec![RawValue::from("Not provided"), RawValue::from("Not provided")]).unwrap();
///
/// let cleaned = clean(&md, "longitude", "latitude")?;
/// assert_eq!(cleaned.points.len(), 2);
/// assert_eq!(cleaned.dropped, vec!["np".to_string()]);
/// assert_eq!((cleaned.points[1].x(), cleaned.points[1].y()), (360.0, 180.0));
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn clean(
    metadata: &SampleMetadata,
    x_column: &str,
    y_column: &str,
) -> Result<CleanedCoordinates> {
    let y_idx = metadata
        .column_index(y_column)
        .ok_or_else(|| LineageError::MissingColumn {
            column: y_column.to_string(),
        })?;
    let x_idx = metadata
        .column_index(x_column)
        .ok_or_else(|| LineageError::MissingColumn {
            column: x_column.to_string(),
        })?;

    let mut points = Vec::with_capacity(metadata.len());
    let mut dropped = Vec::new();

    for row in metadata.rows() {
        match (row.values[x_idx].as_number(), row.values[y_idx].as_number()) {
            (Some(x), Some(y)) => points.push(SamplePoint::new(row.id.clone(), x, y)),
            _ => dropped.push(row.id.clone()),
        }
    }

    if points.is_empty() {
        return Err(LineageError::NoNumericData);
    }

    if !dropped.is_empty() {
        log::warn!(
            "Dropped {} of {} samples without numeric {}/{} values",
            dropped.len(),
            metadata.len(),
            x_column,
            y_column
        );
    }

    Ok(CleanedCoordinates {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        points: normalize(&points),
        dropped,
    })
}

/// Translate `points` so the minimum of each axis is zero.
///
/// Both negative and positive minimums are moved to zero; every point of an
/// axis gets the same offset.
pub fn normalize(points: &[SamplePoint]) -> Vec<SamplePoint> {
    let Some(rect) = bounding_rect(points) else {
        return Vec::new();
    };
    let (dx, dy) = (-rect.min().x, -rect.min().y);

    if dx == 0.0 && dy == 0.0 {
        return points.to_vec();
    }

    log::debug!("Translating {} points by ({}, {})", points.len(), dx, dy);
    points.iter().map(|p| p.translated(dx, dy)).collect()
}

/// Bounding rectangle of a set of samples, `None` when empty.
pub fn bounding_rect(points: &[SamplePoint]) -> Option<Rect> {
    let multi: MultiPoint<f64> = points.iter().map(|p| *p.point()).collect();
    multi.bounding_rect()
}
