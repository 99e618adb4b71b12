//! Coordinate cleaning, quadtree subdivision, lineage assembly and distances.

pub mod clean;
pub mod distance;
pub mod lineage;
pub mod quadtree;
pub mod tree;
pub mod validation;

pub use clean::{CleanedCoordinates, clean, normalize};
pub use distance::{DistanceMatrix, euclidean_distance, geodesic_distance};
pub use lineage::{LineageRow, LineageTable};
pub use quadtree::{QuadNode, QuadTree, Quadrant, subdivide};
pub use tree::{LineageTree, NodeId, NodeKind, TreeNode};
pub use validation::{MissingData, load_and_validate};
