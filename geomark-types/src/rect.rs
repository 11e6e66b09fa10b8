//! Axis-aligned rectangle.

use nalgebra::{Point2, Scalar};
use num_traits::{FromPrimitive, Num};
use serde::{Deserialize, Serialize};

use crate::cartesian::CartesianPoint2d;

/// Axis-aligned rectangle given by its minimum and maximum coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Minimum x.
    pub x_min: N,
    /// Minimum y.
    pub y_min: N,
    /// Maximum x.
    pub x_max: N,
    /// Maximum y.
    pub y_max: N,
}

impl<N: Num + Copy + PartialOrd + Scalar + FromPrimitive> Rect<N> {
    /// Creates a new rectangle. Coordinates are taken as is, the caller must guarantee `min <= max`.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: if self.x_min < other.x_min {
                self.x_min
            } else {
                other.x_min
            },
            y_min: if self.y_min < other.y_min {
                self.y_min
            } else {
                other.y_min
            },
            x_max: if self.x_max > other.x_max {
                self.x_max
            } else {
                other.x_max
            },
            y_max: if self.y_max > other.y_max {
                self.y_max
            } else {
                other.y_max
            },
        }
    }

    /// Degenerate rectangle containing a single point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = N>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Bounding rectangle of the points, or `None` if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut rect = Self::from_point(first);
        for p in points {
            rect = rect.merge(Self::from_point(p));
        }

        Some(rect)
    }

    /// Returns true if the point is inside the rectangle or on its boundary.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point2<N> {
        let two = N::one() + N::one();
        Point2::new(
            (self.x_min + self.x_max) / two,
            (self.y_min + self.y_max) / two,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_and_center() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(-1.0, 0.5, 0.5, 3.0);
        let merged = a.merge(b);
        assert_eq!(merged, Rect::new(-1.0, 0.0, 1.0, 3.0));
        assert_eq!(merged, b.merge(a));
        assert_eq!(merged.center(), Point2::new(0.0, 1.5));
        assert_eq!(merged.width(), 2.0);
        assert_eq!(merged.height(), 3.0);
    }

    #[test]
    fn from_points() {
        let points = [Point2::new(3, 1), Point2::new(-2, 5), Point2::new(0, 0)];
        assert_eq!(
            Rect::from_points(points.iter()),
            Some(Rect::new(-2, 0, 3, 5))
        );
        assert_eq!(Rect::<i32>::from_points(std::iter::empty::<&Point2<i32>>()), None);
    }
}
