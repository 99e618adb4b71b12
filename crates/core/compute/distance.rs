//! Pairwise distance matrices between samples.

use crate::compute::validation::{MissingData, NumericRow, load_and_validate, validate_geographic_point};
use crate::error::{LineageError, Result};
use geo::{Distance, Geodesic, Point};
use quadlineage_types::metadata::SampleMetadata;
use serde::{Deserialize, Serialize};

/// Symmetric, hollow matrix of distances between samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    ids: Vec<String>,
    /// Row-major `n x n` values
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Fill the matrix by evaluating `metric` once per unordered pair.
    pub fn from_fn<F>(ids: Vec<String>, mut metric: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let n = ids.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric(i, j);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { ids, data }
    }

    /// Wrap a full row-major matrix, checking shape, symmetry and a zero
    /// diagonal.
    pub fn new(ids: Vec<String>, data: Vec<f64>) -> Result<Self> {
        let n = ids.len();
        if data.len() != n * n {
            return Err(LineageError::InvalidInput(format!(
                "Distance matrix for {} ids needs {} values, got {}",
                n,
                n * n,
                data.len()
            )));
        }
        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(LineageError::InvalidInput(format!(
                    "Distance matrix diagonal must be zero (id {})",
                    ids[i]
                )));
            }
            for j in (i + 1)..n {
                if data[i * n + j] != data[j * n + i] {
                    return Err(LineageError::InvalidInput(format!(
                        "Distance matrix is not symmetric at ({}, {})",
                        ids[i], ids[j]
                    )));
                }
            }
        }
        Ok(Self { ids, data })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Distance between the `i`th and `j`th samples.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.len();
        (i < n && j < n).then(|| self.data[i * n + j])
    }

    /// Distance between two samples by identifier.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.ids.iter().position(|id| id == a)?;
        let j = self.ids.iter().position(|id| id == b)?;
        self.get(i, j)
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let n = self.len();
        (i < n).then(|| &self.data[i * n..(i + 1) * n])
    }

    /// Upper triangle, row by row, without the diagonal.
    pub fn condensed(&self) -> Vec<f64> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            out.extend_from_slice(&self.data[i * n + i + 1..(i + 1) * n]);
        }
        out
    }
}

fn ensure_samples(rows: &[NumericRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(LineageError::NoNumericData);
    }
    Ok(())
}

/// Pairwise geodesic distances in meters on the WGS84 ellipsoid.
///
/// # Examples
///
/// ```
/// use quadlineage::compute::distance::geodesic_distance;
/// use quadlineage::compute::validation::MissingData;
/// use quadlineage_types::metadata::{RawValue, SampleMetadata};
///
/// let mut md = SampleMetadata::new("SampleID", ["Latitude", "Longitude"]);
/// md.push_row("nyc", vec![RawValue::from(40.7128), RawValue::from(-74.0060)]).unwrap();
/// md.push_row("la", vec![RawValue::from(34.0522), RawValue::from(-118.2437)]).unwrap();
///
/// let dm = geodesic_distance(&md, "Latitude", "Longitude", MissingData::Error)?;
/// let d = dm.distance("nyc", "la").unwrap();
/// assert!(d > 3_900_000.0 && d < 4_000_000.0);
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn geodesic_distance(
    metadata: &SampleMetadata,
    latitude: &str,
    longitude: &str,
    missing: MissingData,
) -> Result<DistanceMatrix> {
    let rows = load_and_validate(metadata, &[latitude, longitude], missing)?;
    ensure_samples(&rows)?;

    let points = rows
        .iter()
        .map(|row| {
            let (lat, lon) = (row.values[0], row.values[1]);
            validate_geographic_point(lon, lat).map_err(|e| {
                LineageError::InvalidInput(format!("Sample {}: {}", row.id, e))
            })?;
            Ok(Point::new(lon, lat))
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("Computing geodesic distances between {} samples", points.len());
    let ids = rows.into_iter().map(|row| row.id).collect();
    Ok(DistanceMatrix::from_fn(ids, |i, j| {
        Geodesic.distance(points[i], points[j])
    }))
}

/// Pairwise euclidean distances in 2D, or 3D when `z` is given.
pub fn euclidean_distance(
    metadata: &SampleMetadata,
    x: &str,
    y: &str,
    z: Option<&str>,
    missing: MissingData,
) -> Result<DistanceMatrix> {
    let mut columns = vec![x, y];
    columns.extend(z);
    let rows = load_and_validate(metadata, &columns, missing)?;
    ensure_samples(&rows)?;

    log::info!(
        "Computing {}D euclidean distances between {} samples",
        columns.len(),
        rows.len()
    );
    let coords: Vec<Vec<f64>> = rows.iter().map(|row| row.values.clone()).collect();
    let ids = rows.into_iter().map(|row| row.id).collect();
    Ok(DistanceMatrix::from_fn(ids, |i, j| {
        coords[i]
            .iter()
            .zip(&coords[j])
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadlineage_types::metadata::RawValue;

    fn xyz_md() -> SampleMetadata {
        let mut md = SampleMetadata::new("SampleID", ["x", "y", "z"]);
        let rows = [
            ("a", 0.0, 0.0, 0.0),
            ("b", 3.0, 4.0, 12.0),
            ("c", 6.0, 8.0, 0.0),
        ];
        for (id, x, y, z) in rows {
            md.push_row(id, vec![RawValue::from(x), RawValue::from(y), RawValue::from(z)])
                .unwrap();
        }
        md
    }

    #[test]
    fn test_euclidean_2d() {
        let dm = euclidean_distance(&xyz_md(), "x", "y", None, MissingData::Error).unwrap();
        assert_eq!(dm.len(), 3);
        assert_eq!(dm.distance("a", "b"), Some(5.0));
        assert_eq!(dm.distance("b", "a"), Some(5.0));
        assert_eq!(dm.distance("a", "c"), Some(10.0));
        assert_eq!(dm.distance("a", "a"), Some(0.0));
        assert_eq!(dm.condensed(), vec![5.0, 10.0, 5.0]);
    }

    #[test]
    fn test_euclidean_3d() {
        let dm = euclidean_distance(&xyz_md(), "x", "y", Some("z"), MissingData::Error).unwrap();
        assert_eq!(dm.distance("a", "b"), Some(13.0));
    }

    #[test]
    fn test_euclidean_missing_data_policy() {
        let mut md = xyz_md();
        md.push_row("d", vec![RawValue::from(1.0), RawValue::Missing, RawValue::from(1.0)])
            .unwrap();
        assert!(matches!(
            euclidean_distance(&md, "x", "y", None, MissingData::Error),
            Err(LineageError::MissingData { .. })
        ));
        let dm = euclidean_distance(&md, "x", "y", None, MissingData::Ignore).unwrap();
        assert_eq!(dm.ids(), &["a", "b", "c"]);
    }

    #[test]
    fn test_geodesic_same_point_is_zero() {
        let mut md = SampleMetadata::new("SampleID", ["lat", "lon"]);
        md.push_row("p", vec![RawValue::from(10.0), RawValue::from(20.0)])
            .unwrap();
        md.push_row("q", vec![RawValue::from(10.0), RawValue::from(20.0)])
            .unwrap();
        md.push_row("r", vec![RawValue::from(0.0), RawValue::from(0.0)])
            .unwrap();
        let dm = geodesic_distance(&md, "lat", "lon", MissingData::Error).unwrap();
        assert!(dm.distance("p", "q").unwrap() < 1e-6);
        // roughly 2,480 km
        let d = dm.distance("r", "p").unwrap();
        assert!(d > 2_000_000.0 && d < 2_600_000.0);
    }

    #[test]
    fn test_geodesic_rejects_out_of_range() {
        let mut md = SampleMetadata::new("SampleID", ["lat", "lon"]);
        md.push_row("bad", vec![RawValue::from(95.0), RawValue::from(0.0)])
            .unwrap();
        assert!(matches!(
            geodesic_distance(&md, "lat", "lon", MissingData::Error),
            Err(LineageError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_matrix_validation() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert!(DistanceMatrix::new(ids.clone(), vec![0.0, 1.0, 1.0, 0.0]).is_ok());
        assert!(DistanceMatrix::new(ids.clone(), vec![0.0, 1.0, 2.0, 0.0]).is_err());
        assert!(DistanceMatrix::new(ids.clone(), vec![1.0, 1.0, 1.0, 0.0]).is_err());
        assert!(DistanceMatrix::new(ids, vec![0.0]).is_err());
    }

    #[test]
    fn test_row_and_bounds() {
        let dm = euclidean_distance(&xyz_md(), "x", "y", None, MissingData::Error).unwrap();
        assert_eq!(dm.row(0), Some(&[0.0, 5.0, 10.0][..]));
        assert_eq!(dm.row(3), None);
        assert_eq!(dm.get(0, 3), None);
    }
}
