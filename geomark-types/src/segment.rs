//! Straight line segments between two points.

use crate::cartesian::{CartesianPoint2d, CartesianPoint2dFloat};
use crate::Point;

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a>(pub &'a Point, pub &'a Point);

impl Segment<'_> {
    /// Euclidean length of the segment in the XY plane.
    pub fn length(&self) -> f64 {
        self.0.distance(self.1)
    }

    /// Middle point of the segment.
    pub fn midpoint(&self) -> Point {
        self.point_at(0.5)
    }

    /// Point at the `fraction` of the segment length from its start.
    pub fn point_at(&self, fraction: f64) -> Point {
        self.0.lerp(self.1, fraction)
    }

    /// Shortest euclidean distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq(&self, point: &Point) -> f64 {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.x * ds.x + ds.y * ds.y;

        let r = (dp.x * ds.x + dp.y * ds.y) / ds_len;
        if r <= 0.0 {
            self.0.distance_sq(point)
        } else if r >= 1.0 {
            self.1.distance_sq(point)
        } else {
            let s = (dp.y * ds.x - dp.x * ds.y) / ds_len;
            (s * s) * ds_len
        }
    }
}

/// Iterates over consecutive segments of the point sequence.
pub fn segments(points: &[Point]) -> impl Iterator<Item = Segment<'_>> {
    points.windows(2).map(|pair| Segment(&pair[0], &pair[1]))
}
