//! Lineage table as TSV.

use crate::compute::lineage::{INDEX_HEADER, LineageTable};
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Write `table` as tab-separated text.
///
/// The header is `#SampleID`, `depth`, `lineage` and one `split-depth-k`
/// column per level; split cells below a sample's depth are left empty.
pub fn write_lineage_table<W: Write>(table: &LineageTable, writer: &mut W) -> Result<()> {
    write!(writer, "{}", INDEX_HEADER)?;
    for name in table.column_names() {
        write!(writer, "\t{}", name)?;
    }
    writeln!(writer)?;

    for row in table.rows() {
        write!(writer, "{}\t{}\t{}", row.sample_id, row.depth, row.lineage)?;
        for split in &row.splits {
            write!(writer, "\t{}", split.as_deref().unwrap_or(""))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Render `table` to a TSV string.
///
/// # Examples
///
/// ```
/// use quadlineage::compute::lineage::LineageTable;
/// use quadlineage::io::to_tsv;
/// use quadlineage_types::lineage::{BinRecord, LineagePath};
///
/// let p = |s: &str| LineagePath::parse(s).unwrap();
/// let table = LineageTable::from_bins(&[
///     BinRecord::new("a", 1, p("2.")),
///     BinRecord::new("a", 2, p("2.4.")),
///     BinRecord::new("b", 1, p("3.")),
/// ]);
///
/// assert_eq!(
///     to_tsv(&table)?,
///     "#SampleID\tdepth\tlineage\tsplit-depth-1\tsplit-depth-2\n\
///      a\t2\t2.4.\t2\t2.4\n\
///      b\t1\t3.\t3\t\n"
/// );
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn to_tsv(table: &LineageTable) -> Result<String> {
    let mut buf = Vec::new();
    write_lineage_table(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `table` to a file.
pub fn write_lineage_table_file<P: AsRef<Path>>(table: &LineageTable, path: P) -> Result<()> {
    super::with_file_writer(path, |w| write_lineage_table(table, w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadlineage_types::lineage::{BinRecord, LineagePath};

    #[test]
    fn test_empty_table_has_header_only() {
        let tsv = to_tsv(&LineageTable::default()).unwrap();
        assert_eq!(tsv, "#SampleID\tdepth\tlineage\n");
    }

    #[test]
    fn test_file_round_trip_lines() {
        let bins = vec![
            BinRecord::new("z", 1, LineagePath::parse("1.").unwrap()),
            BinRecord::new("y", 1, LineagePath::parse("4.").unwrap()),
        ];
        let table = LineageTable::from_bins(&bins);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineages.tsv");
        write_lineage_table_file(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#SampleID\tdepth\tlineage\tsplit-depth-1",
                "y\t1\t4.\t4",
                "z\t1\t1.\t1",
            ]
        );
    }
}
