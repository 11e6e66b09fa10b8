use serde::{Deserialize, Serialize};

use crate::cartesian::CartesianPoint2d;

/// A single position with optional elevation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (longitude for geographic data).
    pub x: f64,
    /// Y coordinate (latitude for geographic data).
    pub y: f64,
    /// Elevation, if the source data has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Point {
    /// Creates a new 2d point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a new point with elevation.
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Returns true if all present coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }

    /// Returns the point at the `fraction` of the way from `self` to `other`.
    ///
    /// Elevation is interpolated only if both points have it.
    pub fn lerp(&self, other: &Point, fraction: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * fraction,
            y: self.y + (other.y - self.y) * fraction,
            z: match (self.z, other.z) {
                (Some(z0), Some(z1)) => Some(z0 + (z1 - z0) * fraction),
                _ => None,
            },
        }
    }
}

impl CartesianPoint2d for Point {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new_3d(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_keeps_elevation_only_when_both_have_it() {
        let a = Point::new_3d(0.0, 0.0, 10.0);
        let b = Point::new_3d(10.0, 20.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), Point::new_3d(5.0, 10.0, 15.0));

        let c = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(&c, 0.5), Point::new(5.0, 10.0));
    }

    #[test]
    fn finite_check() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new_3d(1.0, 2.0, f64::INFINITY).is_finite());
    }
}
