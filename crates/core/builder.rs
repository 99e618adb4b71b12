//! Quadtree lineage builder
//!
//! Runs the whole pipeline: clean the coordinate columns, subdivide, assemble
//! the lineage table and hang the samples on a tree.

use crate::compute::clean::{CleanedCoordinates, clean};
use crate::compute::lineage::LineageTable;
use crate::compute::quadtree::subdivide;
use crate::compute::tree::LineageTree;
use crate::config::Config;
use crate::error::{LineageError, Result};
use quadlineage_types::lineage::BinRecord;
use quadlineage_types::metadata::SampleMetadata;
use quadlineage_types::point::SamplePoint;

/// Default name of the x (longitude) column.
pub const DEFAULT_X_COLUMN: &str = "longitude";
/// Default name of the y (latitude) column.
pub const DEFAULT_Y_COLUMN: &str = "latitude";

/// Everything produced by one build.
#[derive(Debug, Clone)]
pub struct QuadtreeOutput {
    pub tree: LineageTree,
    pub table: LineageTable,
    pub cleaned: CleanedCoordinates,
    pub bins: Vec<BinRecord>,
}

/// Builder for quadtree lineage runs.
#[derive(Debug, Clone)]
pub struct QuadtreeBuilder {
    config: Config,
    x_column: String,
    y_column: String,
}

impl QuadtreeBuilder {
    /// Create a builder with the default configuration and the
    /// `longitude`/`latitude` columns.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            x_column: DEFAULT_X_COLUMN.to_string(),
            y_column: DEFAULT_Y_COLUMN.to_string(),
        }
    }

    /// Set the subdivision threshold.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the recursion limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use other coordinate columns.
    pub fn columns(mut self, x_column: impl Into<String>, y_column: impl Into<String>) -> Self {
        self.x_column = x_column.into();
        self.y_column = y_column.into();
        self
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline on `metadata`.
    ///
    /// # Errors
    ///
    /// Any cleaning or subdivision error, [`LineageError::InvalidConfig`] for
    /// a configuration that fails validation, and
    /// [`LineageError::NoSubdivision`] when the threshold exceeds the number
    /// of usable samples so that no partition is produced.
    pub fn build(&self, metadata: &SampleMetadata) -> Result<QuadtreeOutput> {
        self.config.validate().map_err(LineageError::InvalidConfig)?;

        let cleaned = clean(metadata, &self.x_column, &self.y_column)?;
        let (tree, table, bins) = partition(&cleaned.points, &self.config)?;

        log::info!(
            "Partitioned {} samples ({} dropped) into lineages of depth {}",
            cleaned.len(),
            cleaned.dropped_count(),
            table.max_depth()
        );

        Ok(QuadtreeOutput {
            tree,
            table,
            cleaned,
            bins,
        })
    }
}

impl Default for QuadtreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Subdivide already cleaned points and assemble the table and tree.
///
/// Every tree node gets the configured branch length.
pub fn partition(
    points: &[SamplePoint],
    config: &Config,
) -> Result<(LineageTree, LineageTable, Vec<BinRecord>)> {
    let bins = subdivide(points, config)?;
    if bins.is_empty() {
        return Err(LineageError::NoSubdivision {
            threshold: config.threshold,
            samples: points.len(),
        });
    }

    let table = LineageTable::from_bins(&bins);
    let mut tree = LineageTree::from_table(&table);
    tree.assign_default_lengths(config.branch_length);
    Ok((tree, table, bins))
}

/// Build the lineage tree and table from the `y_coord`/`x_coord` columns of
/// `metadata` with the given threshold.
///
/// # Examples
///
/// ```
/// use quadlineage::quadtree;
/// use quadlineage_types::metadata::{RawValue, SampleMetadata};
///
/// let mut md = SampleMetadata::new("SampleID", ["latitude", "longitude"]);
/// md.push_row("sw", vec![RawValue::from(-90.0), RawValue::from(-180.0)]).unwrap();
/// md.push_row("ne", vec![RawValue::from(90.0), RawValue::from(180.0)]).unwrap();
///
/// let (tree, table) = quadtree(&md, "latitude", "longitude", 2)?;
/// assert_eq!(table.get("sw").unwrap().lineage.as_str(), "3.");
/// assert_eq!(table.get("ne").unwrap().lineage.as_str(), "2.");
/// assert_eq!(tree.leaf_count(), 2);
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn quadtree(
    metadata: &SampleMetadata,
    y_coord: &str,
    x_coord: &str,
    threshold: usize,
) -> Result<(LineageTree, LineageTable)> {
    let output = QuadtreeBuilder::new()
        .columns(x_coord, y_coord)
        .threshold(threshold)
        .build(metadata)?;
    Ok((output.tree, output.table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadlineage_types::metadata::RawValue;

    fn corners() -> SampleMetadata {
        let mut md = SampleMetadata::new("SampleID", ["latitude", "longitude", "x", "y"]);
        let rows = [
            ("a", 0.0, 0.0),
            ("b", 0.0, 10.0),
            ("c", 10.0, 0.0),
            ("d", 10.0, 10.0),
        ];
        for (id, lat, lon) in rows {
            md.push_row(
                id,
                vec![
                    RawValue::from(lat),
                    RawValue::from(lon),
                    RawValue::from(lat),
                    RawValue::from(lon),
                ],
            )
            .unwrap();
        }
        md
    }

    #[test]
    fn test_builder_default() {
        let builder = QuadtreeBuilder::new();
        assert_eq!(builder.get_config(), &Config::default());
        assert_eq!(builder.x_column, DEFAULT_X_COLUMN);
        assert_eq!(builder.y_column, DEFAULT_Y_COLUMN);
    }

    #[test]
    fn test_build_outputs_agree() {
        let out = QuadtreeBuilder::new().threshold(2).build(&corners()).unwrap();
        assert_eq!(out.table.len(), 4);
        assert_eq!(out.tree.leaf_count(), out.table.len());
        assert_eq!(out.cleaned.len(), 4);
        assert!(out.bins.iter().all(|b| b.depth == 1));
        assert!(out.tree.iter().all(|(_, n)| n.length == Some(1.0)));
    }

    #[test]
    fn test_custom_columns() {
        let out = QuadtreeBuilder::new()
            .columns("x", "y")
            .build(&corners())
            .unwrap();
        assert_eq!(out.cleaned.x_column, "x");
        // x/y are latitude/longitude swapped
        assert_eq!(out.table.get("b").unwrap().lineage.as_str(), "1.");
        assert_eq!(out.table.get("c").unwrap().lineage.as_str(), "4.");
    }

    #[test]
    fn test_threshold_above_sample_count() {
        match QuadtreeBuilder::new().threshold(5).build(&corners()) {
            Err(LineageError::NoSubdivision { threshold, samples }) => {
                assert_eq!((threshold, samples), (5, 4));
            }
            other => panic!("expected no subdivision, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.max_depth = 0;
        assert!(matches!(
            QuadtreeBuilder::new().config(config).build(&corners()),
            Err(LineageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_branch_length_from_config() {
        let config = Config::default().with_branch_length(0.25);
        let points = vec![SamplePoint::new("p", 0.0, 0.0), SamplePoint::new("q", 4.0, 4.0)];
        let (tree, table, _) = partition(&points, &config).unwrap();
        assert_eq!(table.len(), 2);
        assert!(tree.iter().all(|(_, n)| n.length == Some(0.25)));
    }
}
