use geo::Point;
use serde::{Deserialize, Serialize};

/// A sample identifier bound to a 2D coordinate.
///
/// Coordinates are longitude/latitude for geographic data or arbitrary planar
/// x/y values. A `SamplePoint` is never mutated; translation produces a new
/// point.
///
/// # Examples
///
/// ```
/// use quadlineage_types::point::SamplePoint;
///
/// let sample = SamplePoint::new("soil-07", -74.0060, 40.7128);
/// assert_eq!(sample.x(), -74.0060);
/// assert_eq!(sample.y(), 40.7128);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Opaque, unique sample identifier
    pub id: String,
    /// The coordinate of the sample
    pub point: Point<f64>,
}

impl SamplePoint {
    /// Create a new sample point from x and y coordinates.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            point: Point::new(x, y),
        }
    }

    /// Create a sample point from an existing `geo::Point`.
    pub fn from_point(id: impl Into<String>, point: Point<f64>) -> Self {
        Self {
            id: id.into(),
            point,
        }
    }

    /// Get the sample identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the x coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.point.x()
    }

    /// Get the y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.point.y()
    }

    /// Get the underlying point.
    #[inline]
    pub fn point(&self) -> &Point<f64> {
        &self.point
    }

    /// Shift the point by `dx`/`dy`, keeping the identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadlineage_types::point::SamplePoint;
    ///
    /// let sample = SamplePoint::new("a", -180.0, -90.0);
    /// let moved = sample.translated(180.0, 90.0);
    /// assert_eq!((moved.x(), moved.y()), (0.0, 0.0));
    /// ```
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            id: self.id.clone(),
            point: Point::new(self.x() + dx, self.y() + dy),
        }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    /// Whether two samples sit on exactly the same coordinate.
    pub fn coincides_with(&self, other: &SamplePoint) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }
}
