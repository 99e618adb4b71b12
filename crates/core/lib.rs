//! Spatial lineages for sample metadata via recursive quadtree partitioning.
//!
//! ## Features
//! - **Cleaning**: coordinate columns are coerced to numbers, unusable rows are
//!   dropped and the points are shifted so both axes start at zero
//! - **Quadtree partitioning**: quadrants holding at least `threshold` samples
//!   are split again, each sample recording the quadrant path it took
//! - **Lineages**: a per-sample table of path prefixes at every depth plus a
//!   rooted tree grouping samples by shared prefix
//! - **Distances**: geodesic and euclidean distance matrices between samples
//! - **I/O**: TSV metadata in; TSV tables, Newick trees and distance matrices out
//!
//! ```rust
//! use quadlineage::{QuadtreeBuilder, io};
//!
//! let tsv = "#SampleID\tlatitude\tlongitude\n\
//!            a\t-90\t-180\n\
//!            b\t-45\t-90\n\
//!            c\t90\t180\n";
//! let metadata = io::read_metadata(tsv.as_bytes())?;
//!
//! let output = QuadtreeBuilder::new().threshold(2).build(&metadata)?;
//! assert_eq!(output.table.get("c").unwrap().lineage.as_str(), "2.");
//! assert_eq!(output.table.get("a").unwrap().lineage.as_str(), "3.3.");
//! assert_eq!(io::to_newick(&output.tree)?.chars().last(), Some(';'));
//! # Ok::<(), quadlineage::LineageError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod io;

pub use builder::{QuadtreeBuilder, QuadtreeOutput, partition, quadtree};
pub use config::Config;
pub use error::{LineageError, Result};

pub use compute::clean::{CleanedCoordinates, clean};
pub use compute::distance::{DistanceMatrix, euclidean_distance, geodesic_distance};
pub use compute::lineage::{LineageRow, LineageTable};
pub use compute::quadtree::{QuadTree, Quadrant};
pub use compute::tree::{LineageTree, NodeId};
pub use compute::validation::MissingData;

pub use quadlineage_types::lineage::{BinRecord, LineagePath};
pub use quadlineage_types::metadata::{RawValue, SampleMetadata};
pub use quadlineage_types::point::SamplePoint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    //! Common imports for building lineages.

    pub use crate::{
        Config, LineageError, LineageTable, LineageTree, QuadtreeBuilder, Result, SampleMetadata,
        SamplePoint,
    };
    pub use crate::io::{read_metadata_file, write_lineage_table_file, write_newick_file};
}
