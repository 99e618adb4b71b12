//! Sample metadata reader.

use crate::error::{LineageError, Result};
use quadlineage_types::metadata::{RawValue, SampleMetadata};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse tab-separated sample metadata.
///
/// The first non-blank line is the header and its first cell names the
/// identifier column. After the header, blank lines and lines starting with
/// `#` (including `#q2:` type directives) are skipped. Rows shorter than the
/// header are padded with [`RawValue::Missing`]; longer rows are an error.
///
/// # Examples
///
/// ```
/// use quadlineage::io::read_metadata;
/// use quadlineage_types::metadata::RawValue;
///
/// let tsv = "#SampleID\tLatitude\tLongitude\n\
///            #q2:types\tnumeric\tnumeric\n\
///            s1\t40.5\t-74.0\n\
///            s2\tNot provided\n";
/// let md = read_metadata(tsv.as_bytes())?;
///
/// assert_eq!(md.id_header(), "#SampleID");
/// assert_eq!(md.len(), 2);
/// assert_eq!(md.value("s1", "Longitude"), Some(&RawValue::Number(-74.0)));
/// assert_eq!(md.value("s2", "Longitude"), Some(&RawValue::Missing));
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
pub fn read_metadata<R: BufRead>(reader: R) -> Result<SampleMetadata> {
    let mut metadata: Option<SampleMetadata> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let line_no = idx + 1;

        if line.trim().is_empty() {
            continue;
        }

        let Some(md) = metadata.as_mut() else {
            metadata = Some(parse_header(line, line_no)?);
            continue;
        };

        // comments and `#q2:` type directives
        if line.starts_with('#') {
            continue;
        }

        let mut cells = line.split('\t');
        let id = cells.next().unwrap_or_default().trim();
        if id.is_empty() {
            return Err(LineageError::Parse {
                line: line_no,
                message: "empty sample identifier".to_string(),
            });
        }

        let width = md.columns().len();
        let mut values: Vec<RawValue> = cells.map(RawValue::parse).collect();
        if values.len() > width {
            return Err(LineageError::Parse {
                line: line_no,
                message: format!(
                    "row {} has {} values but the header has {} columns",
                    id,
                    values.len(),
                    width
                ),
            });
        }
        values.resize(width, RawValue::Missing);
        md.push_row(id, values)?;
    }

    let metadata = metadata.ok_or_else(|| LineageError::Parse {
        line: 0,
        message: "metadata has no header line".to_string(),
    })?;
    log::debug!(
        "Read metadata with {} samples and {} columns",
        metadata.len(),
        metadata.columns().len()
    );
    Ok(metadata)
}

fn parse_header(line: &str, line_no: usize) -> Result<SampleMetadata> {
    let mut cells = line.split('\t').map(str::trim);
    let id_header = cells.next().unwrap_or_default();
    let columns: Vec<&str> = cells.collect();

    for (i, column) in columns.iter().enumerate() {
        if column.is_empty() {
            return Err(LineageError::Parse {
                line: line_no,
                message: format!("column {} has an empty name", i + 2),
            });
        }
        if columns[..i].contains(column) || *column == id_header {
            return Err(LineageError::Parse {
                line: line_no,
                message: format!("duplicate column name {}", column),
            });
        }
    }

    Ok(SampleMetadata::new(id_header, columns))
}

/// Read a metadata file from disk.
pub fn read_metadata_file<P: AsRef<Path>>(path: P) -> Result<SampleMetadata> {
    let path = path.as_ref();
    log::info!("Reading sample metadata from {}", path.display());
    read_metadata(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadlineage_types::metadata::MetadataError;

    #[test]
    fn test_reads_rows_and_coerces_cells() {
        let tsv = "sample-id\tx\ty\tnote\na\t1\t2.5\tsoil\nb\t-3\t\t\n";
        let md = read_metadata(tsv.as_bytes()).unwrap();
        assert_eq!(md.id_header(), "sample-id");
        assert_eq!(md.columns(), &["x", "y", "note"]);
        assert_eq!(md.value("a", "y"), Some(&RawValue::Number(2.5)));
        assert_eq!(md.value("a", "note"), Some(&RawValue::Text("soil".into())));
        assert_eq!(md.value("b", "x"), Some(&RawValue::Number(-3.0)));
        assert_eq!(md.value("b", "y"), Some(&RawValue::Missing));
    }

    #[test]
    fn test_skips_directives_comments_and_blank_lines() {
        let tsv = "\n#SampleID\tx\n#q2:types\tnumeric\n\n# comment\ns1\t1\r\n";
        let md = read_metadata(tsv.as_bytes()).unwrap();
        assert_eq!(md.len(), 1);
        assert_eq!(md.value("s1", "x"), Some(&RawValue::Number(1.0)));
    }

    #[test]
    fn test_long_row_is_rejected() {
        let tsv = "id\tx\na\t1\t2\n";
        match read_metadata(tsv.as_bytes()) {
            Err(LineageError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_sample_is_rejected() {
        let tsv = "id\tx\na\t1\na\t2\n";
        assert!(matches!(
            read_metadata(tsv.as_bytes()),
            Err(LineageError::Metadata(MetadataError::DuplicateSample(id))) if id == "a"
        ));
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        assert!(read_metadata("id\tx\tx\n".as_bytes()).is_err());
        assert!(read_metadata("id\tx\t\n".as_bytes()).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            read_metadata("".as_bytes()),
            Err(LineageError::Parse { line: 0, .. })
        ));
        let md = read_metadata("id\tx\n".as_bytes()).unwrap();
        assert!(md.is_empty());
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.tsv");
        std::fs::write(&path, "id\tlat\tlon\nx\t1\t2\n").unwrap();
        let md = read_metadata_file(&path).unwrap();
        assert_eq!(md.len(), 1);
        assert!(read_metadata_file(dir.path().join("missing.tsv")).is_err());
    }
}
