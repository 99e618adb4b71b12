//! Lineage table assembly: one row per sample holding its deepest quadrant
//! path and the path prefix at every depth.

use quadlineage_types::lineage::{BinRecord, LineagePath};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Name of the identifier column in the textual table.
pub const INDEX_HEADER: &str = "#SampleID";

/// Column name of the prefix at depth `k`.
pub fn split_column(k: usize) -> String {
    format!("split-depth-{}", k)
}

/// A sample's final partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRow {
    pub sample_id: String,
    /// Depth of the deepest quadrant the sample reached
    pub depth: usize,
    /// Full quadrant path at that depth, with trailing separator
    pub lineage: LineagePath,
    /// `splits[k - 1]` is the split-depth-k value, `None` below the sample's depth
    pub splits: Vec<Option<String>>,
}

impl LineageRow {
    /// The split-depth-`k` value (1-based).
    pub fn split(&self, k: usize) -> Option<&str> {
        k.checked_sub(1)
            .and_then(|i| self.splits.get(i))
            .and_then(|s| s.as_deref())
    }
}

/// Wide lineage table, rows sorted by sample identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageTable {
    max_depth: usize,
    rows: Vec<LineageRow>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl LineageTable {
    /// Assemble the table from bin records.
    ///
    /// For each sample the deepest record wins; among records of equal depth
    /// the first one seen is kept. An empty record list gives an empty table.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadlineage::compute::lineage::LineageTable;
    /// use quadlineage_types::lineage::{BinRecord, LineagePath};
    ///
    /// let p = |s: &str| LineagePath::parse(s).unwrap();
    /// let bins = vec![
    ///     BinRecord::new("a", 1, p("3.")),
    ///     BinRecord::new("b", 1, p("3.")),
    ///     BinRecord::new("a", 2, p("3.1.")),
    /// ];
    /// let table = LineageTable::from_bins(&bins);
    /// assert_eq!(table.max_depth(), 2);
    /// assert_eq!(table.get("a").unwrap().split(2), Some("3.1"));
    /// assert_eq!(table.get("b").unwrap().split(2), None);
    /// ```
    pub fn from_bins(bins: &[BinRecord]) -> Self {
        let mut deepest: FxHashMap<&str, &BinRecord> = FxHashMap::default();
        for record in bins {
            deepest
                .entry(record.sample_id.as_str())
                .and_modify(|best| {
                    if record.depth > best.depth {
                        *best = record;
                    }
                })
                .or_insert(record);
        }

        let max_depth = deepest.values().map(|r| r.path.depth()).max().unwrap_or(0);

        let mut rows: Vec<LineageRow> = deepest
            .into_values()
            .map(|record| LineageRow {
                sample_id: record.sample_id.clone(),
                depth: record.depth,
                lineage: record.path.clone(),
                splits: (1..=max_depth).map(|k| record.path.truncate(k)).collect(),
            })
            .collect();
        rows.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));

        log::debug!(
            "Assembled lineage table with {} rows and {} split columns",
            rows.len(),
            max_depth
        );

        Self::from_rows(max_depth, rows)
    }

    fn from_rows(max_depth: usize, rows: Vec<LineageRow>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.sample_id.clone(), i))
            .collect();
        Self {
            max_depth,
            rows,
            index,
        }
    }

    /// Deepest level reached by any sample; also the number of split columns.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn rows(&self) -> &[LineageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, sample_id: &str) -> Option<&LineageRow> {
        match self.index.get(sample_id) {
            Some(&i) => self.rows.get(i),
            None => self.rows.iter().find(|row| row.sample_id == sample_id),
        }
    }

    /// Column names after the identifier: `depth`, `lineage`, `split-depth-1..N`.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec!["depth".to_string(), "lineage".to_string()];
        names.extend((1..=self.max_depth).map(split_column));
        names
    }

    /// `(sample_id, lineage)` pairs in row order.
    pub fn lineages(&self) -> impl Iterator<Item = (&str, &LineagePath)> {
        self.rows
            .iter()
            .map(|row| (row.sample_id.as_str(), &row.lineage))
    }
}

impl PartialEq for LineageTable {
    fn eq(&self, other: &Self) -> bool {
        self.max_depth == other.max_depth && self.rows == other.rows
    }
}

impl Eq for LineageTable {}
