//! Tab-separated input and the textual output formats.
//!
//! Readers take any `BufRead` and writers any `Write`; the `*_file` helpers
//! open buffered files on top of them.

pub mod distance;
pub mod metadata;
pub mod newick;
pub mod table;

pub use distance::{write_distance_matrix, write_distance_matrix_file};
pub use metadata::{read_metadata, read_metadata_file};
pub use newick::{to_newick, write_newick, write_newick_file};
pub use table::{to_tsv, write_lineage_table, write_lineage_table_file};

use crate::error::Result;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Create `path` and hand a buffered writer to `write`, flushing afterwards.
pub(crate) fn with_file_writer<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    std::io::Write::flush(&mut writer)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
