//! Recursive quadtree subdivision producing per-sample bin records.
//!
//! A node holding at least `threshold` points is split into four quadrants of
//! half its width and height. Quadrants are visited in the fixed order
//! north-west, north-east, south-west, south-east, and each point goes to the
//! first quadrant whose closed rectangle contains it, so points on a shared
//! edge are assigned the same way regardless of input order.

use crate::config::Config;
use crate::error::{LineageError, Result};
use geo::{Point, Rect, coord};
use quadlineage_types::lineage::{BinRecord, LineagePath};
use quadlineage_types::point::SamplePoint;

/// One of the four children of a split node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// Visiting order, which is also the boundary tie-break order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Path label of the quadrant.
    pub fn label(self) -> u8 {
        match self {
            Quadrant::NorthWest => 1,
            Quadrant::NorthEast => 2,
            Quadrant::SouthWest => 3,
            Quadrant::SouthEast => 4,
        }
    }

    /// Closed sub-rectangle of `parent` covered by this quadrant.
    ///
    /// The split line is `min + extent / 2`; the outer edges are the parent's
    /// own edges so a point lying on the parent boundary always lands in some
    /// quadrant.
    pub fn bounds(self, parent: &Rect) -> Rect {
        let (min, max) = (parent.min(), parent.max());
        let mid_x = min.x + parent.width() / 2.0;
        let mid_y = min.y + parent.height() / 2.0;

        let (x0, x1) = match self {
            Quadrant::NorthWest | Quadrant::SouthWest => (min.x, mid_x),
            Quadrant::NorthEast | Quadrant::SouthEast => (mid_x, max.x),
        };
        let (y0, y1) = match self {
            Quadrant::NorthWest | Quadrant::NorthEast => (mid_y, max.y),
            Quadrant::SouthWest | Quadrant::SouthEast => (min.y, mid_y),
        };

        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
    }
}

/// Inclusive containment: points on any edge count as inside.
#[inline]
pub fn contains_inclusive(rect: &Rect, point: &Point<f64>) -> bool {
    let (min, max) = (rect.min(), rect.max());
    point.x() >= min.x && point.x() <= max.x && point.y() >= min.y && point.y() <= max.y
}

/// A region of the plane and the points that fell into it.
///
/// Points are stored as indices into the tree's point slice.
#[derive(Debug, Clone)]
pub struct QuadNode {
    pub bounds: Rect,
    pub path: LineagePath,
    pub points: Vec<usize>,
    pub children: Vec<QuadNode>,
}

impl QuadNode {
    fn new(bounds: Rect, path: LineagePath, points: Vec<usize>) -> Self {
        Self {
            bounds,
            path,
            points,
            children: Vec::new(),
        }
    }

    /// `"0"` for the root, otherwise the quadrant path.
    pub fn id(&self) -> &str {
        self.path.node_id()
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Quadtree over a borrowed set of cleaned points.
///
/// # Examples
///
/// ```
/// use quadlineage::compute::quadtree::QuadTree;
/// use quadlineage_types::point::SamplePoint;
///
/// let points = vec![
///     SamplePoint::new("sw", 0.0, 0.0),
///     SamplePoint::new("ne", 10.0, 10.0),
/// ];
/// let mut tree = QuadTree::new(&points, 2)?;
/// let bins = tree.subdivide()?;
/// assert_eq!(bins.len(), 2);
/// assert_eq!(bins[0].path.as_str(), "2.");
/// assert_eq!(bins[1].path.as_str(), "3.");
/// # Ok::<(), quadlineage::LineageError>(())
/// ```
#[derive(Debug)]
pub struct QuadTree<'a> {
    points: &'a [SamplePoint],
    root: QuadNode,
    threshold: usize,
    max_depth: usize,
}

impl<'a> QuadTree<'a> {
    /// Build an unsplit tree whose root spans `[0, x_max] x [0, y_max]`.
    ///
    /// Points must be cleaned: finite and non-negative.
    pub fn new(points: &'a [SamplePoint], threshold: usize) -> Result<Self> {
        Self::with_config(points, &Config::default().with_threshold(threshold))
    }

    pub fn with_config(points: &'a [SamplePoint], config: &Config) -> Result<Self> {
        if points.is_empty() {
            return Err(LineageError::NoNumericData);
        }

        if let Some(bad) = points
            .iter()
            .find(|p| !p.is_finite() || p.x() < 0.0 || p.y() < 0.0)
        {
            return Err(LineageError::InvalidInput(format!(
                "Sample {} has coordinates ({}, {}); points must be cleaned to finite, \
                 non-negative values before subdivision",
                bad.id(),
                bad.x(),
                bad.y()
            )));
        }

        let x_max = points.iter().map(SamplePoint::x).fold(0.0, f64::max);
        let y_max = points.iter().map(SamplePoint::y).fold(0.0, f64::max);
        let bounds = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: x_max, y: y_max });

        Ok(Self {
            points,
            root: QuadNode::new(bounds, LineagePath::root(), (0..points.len()).collect()),
            threshold: config.threshold,
            max_depth: config.max_depth,
        })
    }

    pub fn root(&self) -> &QuadNode {
        &self.root
    }

    pub fn points(&self) -> &'a [SamplePoint] {
        self.points
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Split the tree and return one bin record per sample per level.
    ///
    /// Records come out quadrant by quadrant, depth first, so a sample's
    /// shallow records always precede its deeper ones. Calling this again
    /// rebuilds the children from scratch.
    pub fn subdivide(&mut self) -> Result<Vec<BinRecord>> {
        let mut bins = Vec::new();
        let bounds = self.root.bounds;
        let mut root = std::mem::replace(
            &mut self.root,
            QuadNode::new(bounds, LineagePath::root(), Vec::new()),
        );
        root.children.clear();

        let outcome = self.subdivide_node(&mut root, 0, &mut bins);
        self.root = root;
        outcome?;

        log::info!(
            "Subdivided {} points with threshold {} into {} bin records (max depth {})",
            self.points.len(),
            self.threshold,
            bins.len(),
            bins.iter().map(|b| b.depth).max().unwrap_or(0)
        );
        Ok(bins)
    }

    fn subdivide_node(
        &self,
        node: &mut QuadNode,
        depth: usize,
        bins: &mut Vec<BinRecord>,
    ) -> Result<()> {
        let count = node.len();
        if count < self.threshold {
            return Ok(());
        }

        // Splitting cannot shrink the set when threshold <= 1.
        if count as f64 / self.threshold as f64 >= count as f64 {
            return Err(LineageError::ThresholdTooSmall {
                threshold: self.threshold,
                points: count,
            });
        }

        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(LineageError::DepthLimitExceeded {
                path: node.id().to_string(),
                max_depth: self.max_depth,
            });
        }

        log::debug!(
            "Splitting quadrant {} ({} points) at depth {}",
            node.id(),
            count,
            depth
        );

        let mut assigned: [Vec<usize>; 4] = Default::default();
        for &idx in &node.points {
            let point = self.points[idx].point();
            if let Some(slot) = Quadrant::ALL
                .iter()
                .position(|q| contains_inclusive(&q.bounds(&node.bounds), point))
            {
                assigned[slot].push(idx);
            }
        }

        let mut children = Vec::with_capacity(4);
        for (quadrant, members) in Quadrant::ALL.into_iter().zip(assigned) {
            if members.len() == count && self.all_coincide(&members) {
                return Err(LineageError::DegenerateSubdivision {
                    path: node.id().to_string(),
                    points: count,
                });
            }

            let path = node.path.child(quadrant.label());
            for &idx in &members {
                bins.push(BinRecord::new(self.points[idx].id(), depth, path.clone()));
            }

            let mut child = QuadNode::new(quadrant.bounds(&node.bounds), path, members);
            self.subdivide_node(&mut child, depth, bins)?;
            children.push(child);
        }

        node.children = children;
        Ok(())
    }

    fn all_coincide(&self, members: &[usize]) -> bool {
        match members.split_first() {
            Some((&first, rest)) => rest
                .iter()
                .all(|&idx| self.points[idx].coincides_with(&self.points[first])),
            None => true,
        }
    }
}

/// Subdivide `points` with the given configuration.
pub fn subdivide(points: &[SamplePoint], config: &Config) -> Result<Vec<BinRecord>> {
    QuadTree::with_config(points, config)?.subdivide()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
    }

    fn compass_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new("test_id_sw1", 0.0, 0.0),
            SamplePoint::new("test_id_nw1", 0.0, 180.0),
            SamplePoint::new("test_id_ne1", 360.0, 180.0),
            SamplePoint::new("test_id_se1", 360.0, 0.0),
            SamplePoint::new("test_id_sw2", 89.0, 46.0),
            SamplePoint::new("test_id_nw2", 89.0, 134.0),
            SamplePoint::new("test_id_ne2", 271.0, 134.0),
            SamplePoint::new("test_id_se2", 271.0, 46.0),
        ]
    }

    #[test]
    fn test_quadrant_bounds() {
        let parent = rect(0.0, 0.0, 360.0, 180.0);
        assert_eq!(
            Quadrant::NorthWest.bounds(&parent),
            rect(0.0, 90.0, 180.0, 180.0)
        );
        assert_eq!(
            Quadrant::NorthEast.bounds(&parent),
            rect(180.0, 90.0, 360.0, 180.0)
        );
        assert_eq!(
            Quadrant::SouthWest.bounds(&parent),
            rect(0.0, 0.0, 180.0, 90.0)
        );
        assert_eq!(
            Quadrant::SouthEast.bounds(&parent),
            rect(180.0, 0.0, 360.0, 90.0)
        );
    }

    #[test]
    fn test_quadrant_bounds_offset_parent() {
        let parent = rect(180.0, 90.0, 360.0, 180.0);
        assert_eq!(
            Quadrant::SouthEast.bounds(&parent),
            rect(270.0, 90.0, 360.0, 135.0)
        );
        assert_eq!(
            Quadrant::NorthWest.bounds(&parent),
            rect(180.0, 135.0, 270.0, 180.0)
        );
    }

    #[test]
    fn test_quadrant_labels_in_order() {
        let labels: Vec<u8> = Quadrant::ALL.iter().map(|q| q.label()).collect();
        assert_eq!(labels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_contains_inclusive_edges() {
        let r = rect(0.0, 0.0, 10.0, 5.0);
        assert!(contains_inclusive(&r, &Point::new(0.0, 0.0)));
        assert!(contains_inclusive(&r, &Point::new(10.0, 5.0)));
        assert!(contains_inclusive(&r, &Point::new(10.0, 2.0)));
        assert!(!contains_inclusive(&r, &Point::new(10.1, 2.0)));
        assert!(!contains_inclusive(&r, &Point::new(5.0, -0.1)));
    }

    #[test]
    fn test_compass_fixture_depth_two() {
        let points = compass_points();
        let mut tree = QuadTree::new(&points, 2).unwrap();
        let bins = tree.subdivide().unwrap();

        // every sample appears once at depth 1 and once at depth 2
        assert_eq!(bins.len(), 16);
        assert_eq!(tree.root().children.len(), 4);
        for child in &tree.root().children {
            assert_eq!(child.len(), 2);
            assert_eq!(child.children.len(), 4);
        }

        let deepest: Vec<(&str, &str)> = bins
            .iter()
            .filter(|b| b.depth == 2)
            .map(|b| (b.sample_id.as_str(), b.path.as_str()))
            .collect();
        assert_eq!(
            deepest,
            vec![
                ("test_id_nw1", "1.1."),
                ("test_id_nw2", "1.3."),
                ("test_id_ne1", "2.2."),
                ("test_id_ne2", "2.4."),
                ("test_id_sw2", "3.1."),
                ("test_id_sw1", "3.3."),
                ("test_id_se2", "4.2."),
                ("test_id_se1", "4.4."),
            ]
        );
    }

    #[test]
    fn test_shallow_records_precede_deep() {
        let points = compass_points();
        let bins = subdivide(&points, &Config::default().with_threshold(2)).unwrap();
        for point in &points {
            let depths: Vec<usize> = bins
                .iter()
                .filter(|b| b.sample_id == point.id())
                .map(|b| b.depth)
                .collect();
            assert_eq!(depths, vec![1, 2]);
        }
    }

    #[test]
    fn test_threshold_one_is_rejected() {
        let points = compass_points();
        let mut tree = QuadTree::new(&points, 1).unwrap();
        assert!(matches!(
            tree.subdivide(),
            Err(LineageError::ThresholdTooSmall {
                threshold: 1,
                points: 8
            })
        ));
    }

    #[test]
    fn test_threshold_zero_is_rejected() {
        let points = compass_points();
        assert!(matches!(
            subdivide(&points, &Config::default().with_threshold(0)),
            Err(LineageError::ThresholdTooSmall { threshold: 0, .. })
        ));
    }

    #[test]
    fn test_threshold_above_count_emits_nothing() {
        let points = compass_points();
        let bins = subdivide(&points, &Config::default().with_threshold(9)).unwrap();
        assert!(bins.is_empty());
    }

    #[test]
    fn test_boundary_point_goes_to_first_quadrant() {
        // (5, 5) sits on the corner shared by all four quadrants
        let points = vec![
            SamplePoint::new("corner", 0.0, 0.0),
            SamplePoint::new("center", 5.0, 5.0),
            SamplePoint::new("top", 10.0, 10.0),
        ];
        let bins = subdivide(&points, &Config::default().with_threshold(3)).unwrap();
        let center: Vec<&str> = bins
            .iter()
            .filter(|b| b.sample_id == "center")
            .map(|b| b.path.as_str())
            .collect();
        assert_eq!(center, vec!["1."]);
        assert_eq!(bins.len(), 3);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let points = vec![
            SamplePoint::new("a", 3.0, 3.0),
            SamplePoint::new("b", 3.0, 3.0),
            SamplePoint::new("c", 3.0, 3.0),
        ];
        assert!(matches!(
            subdivide(&points, &Config::default().with_threshold(2)),
            Err(LineageError::DegenerateSubdivision { points: 3, .. })
        ));
    }

    #[test]
    fn test_clustered_points_hit_depth_limit() {
        let points = vec![
            SamplePoint::new("far", 0.0, 0.0),
            SamplePoint::new("a", 1000.0, 1000.0),
            SamplePoint::new("b", 999.999, 999.999),
        ];
        let config = Config::default().with_threshold(2).with_max_depth(4);
        assert!(matches!(
            subdivide(&points, &config),
            Err(LineageError::DepthLimitExceeded { max_depth: 4, .. })
        ));

        // plenty of room with the default limit
        let bins = subdivide(&points, &Config::default().with_threshold(2)).unwrap();
        assert!(bins.iter().any(|b| b.depth > 4));
    }

    #[test]
    fn test_uncleaned_points_rejected() {
        let points = vec![SamplePoint::new("neg", -1.0, 0.0)];
        assert!(matches!(
            QuadTree::new(&points, 2),
            Err(LineageError::InvalidInput(_))
        ));
        assert!(matches!(
            QuadTree::new(&[], 2),
            Err(LineageError::NoNumericData)
        ));
    }

    #[test]
    fn test_resubdivide_is_stable() {
        let points = compass_points();
        let mut tree = QuadTree::new(&points, 2).unwrap();
        let first = tree.subdivide().unwrap();
        let second = tree.subdivide().unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.root().children.len(), 4);
    }
}
