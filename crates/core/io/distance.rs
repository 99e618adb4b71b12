//! Distance matrix as TSV.

use crate::compute::distance::DistanceMatrix;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Write a square, labelled distance matrix.
///
/// The first header cell is empty and is followed by the sample ids; each
/// following line is an id and its row of distances.
pub fn write_distance_matrix<W: Write>(matrix: &DistanceMatrix, writer: &mut W) -> Result<()> {
    for id in matrix.ids() {
        write!(writer, "\t{}", id)?;
    }
    writeln!(writer)?;

    for (i, id) in matrix.ids().iter().enumerate() {
        write!(writer, "{}", id)?;
        for value in matrix.row(i).unwrap_or_default() {
            write!(writer, "\t{:?}", value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write a distance matrix to a file.
pub fn write_distance_matrix_file<P: AsRef<Path>>(matrix: &DistanceMatrix, path: P) -> Result<()> {
    super::with_file_writer(path, |w| write_distance_matrix(matrix, w))
}
