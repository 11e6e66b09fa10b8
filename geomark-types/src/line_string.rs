use serde::{Deserialize, Serialize};

use crate::error::GeomarkTypesError;
use crate::segment::{segments, Segment};
use crate::Point;

/// Ordered sequence of points connected by straight segments.
///
/// A valid line string has at least two points. [`LineString::new`] enforces this, but the field is public so that
/// data coming from external sources can be represented as is; consumers must tolerate shorter lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    /// Vertices of the line.
    pub points: Vec<Point>,
}

impl LineString {
    /// Creates a new line string, checking that it has at least two points.
    pub fn new(points: Vec<Point>) -> Result<Self, GeomarkTypesError> {
        if points.len() < 2 {
            return Err(GeomarkTypesError::Conversion(format!(
                "line string requires at least 2 points, got {}",
                points.len()
            )));
        }

        Ok(Self { points })
    }

    /// Vertices of the line.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates over the segments of the line.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_>> {
        segments(&self.points)
    }

    /// Total length of the line.
    pub fn length(&self) -> f64 {
        self.iter_segments().map(|s| s.length()).sum()
    }

    /// Returns true if the first and the last points of the line coincide.
    pub fn is_closed(&self) -> bool {
        is_closed(&self.points)
    }

    /// Shortest squared distance between the line path and the point. `None` for an empty line.
    pub fn distance_to_point_sq(&self, point: &Point) -> Option<f64> {
        if let [single] = self.points.as_slice() {
            return Some(Segment(single, single).distance_to_point_sq(point));
        }

        self.iter_segments()
            .map(|s| s.distance_to_point_sq(point))
            .min_by(f64::total_cmp)
    }
}

/// Closed line string used as a polygon boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRing {
    /// Vertices of the ring. The last point repeats the first one.
    pub points: Vec<Point>,
}

impl LinearRing {
    /// Creates a new ring. If the given points do not form a closed sequence, the first point is appended to the end.
    pub fn new(mut points: Vec<Point>) -> Self {
        if let Some(first) = points.first().copied() {
            if !is_closed(&points) {
                points.push(first);
            }
        }

        Self { points }
    }

    /// Vertices of the ring.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns true if the first and the last points of the ring coincide.
    pub fn is_closed(&self) -> bool {
        is_closed(&self.points)
    }

    /// Iterates over the segments of the ring.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_>> {
        segments(&self.points)
    }

    /// Signed area of the ring. Positive for counter-clockwise rings.
    pub fn area_signed(&self) -> f64 {
        let aggr: f64 = self
            .iter_segments()
            .map(|Segment(prev, p)| prev.x * p.y - p.x * prev.y)
            .sum();

        aggr / 2.0
    }
}

impl From<LinearRing> for LineString {
    fn from(value: LinearRing) -> Self {
        Self {
            points: value.points,
        }
    }
}

fn is_closed(points: &[Point]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.x == last.x && first.y == last.y,
        _ => false,
    }
}
