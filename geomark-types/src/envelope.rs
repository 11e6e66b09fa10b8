//! Running bounding box of everything an encoder has visited.

use serde::{Deserialize, Serialize};

use crate::cartesian::CartesianPoint2d;
use crate::rect::Rect;
use crate::Geometry;

/// Bounding box accumulator.
///
/// An envelope starts empty; the first expansion establishes its bounds and every following one can only widen
/// them. The order of expansions does not matter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    rect: Option<Rect>,
}

impl Envelope {
    /// Creates an empty envelope.
    pub const fn empty() -> Self {
        Self { rect: None }
    }

    /// Tightest envelope of the given geometry.
    pub fn of(geometry: &Geometry) -> Self {
        let mut envelope = Self::empty();
        envelope.expand(geometry);
        envelope
    }

    /// Returns true if nothing has been added to the envelope yet.
    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    /// Current bounds, `None` while the envelope is empty.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Widens the envelope to include the point.
    pub fn expand_to_include(&mut self, point: &impl CartesianPoint2d<Num = f64>) {
        let point_rect = Rect::from_point(point);
        self.rect = Some(match self.rect {
            Some(rect) => rect.merge(point_rect),
            None => point_rect,
        });
    }

    /// Widens the envelope to include every coordinate of the geometry.
    pub fn expand(&mut self, geometry: &Geometry) -> &mut Self {
        geometry.for_each_point(&mut |p| self.expand_to_include(p));
        self
    }

    /// Widens the envelope to include another one.
    pub fn merge(&mut self, other: &Envelope) -> &mut Self {
        if let Some(other_rect) = other.rect {
            self.rect = Some(match self.rect {
                Some(rect) => rect.merge(other_rect),
                None => other_rect,
            });
        }

        self
    }

    /// Returns true if the point is inside the envelope or on its boundary. An empty envelope contains nothing.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = f64>) -> bool {
        self.rect.is_some_and(|rect| rect.contains(point))
    }
}

impl From<Rect> for Envelope {
    fn from(rect: Rect) -> Self {
        Self { rect: Some(rect) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineString, LinearRing, MultiPoint, Point, Polygon};

    fn sample_geometries() -> Vec<Geometry> {
        vec![
            Point::new(1.5, -2.25).into(),
            LineString::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)])
                .expect("valid line")
                .into(),
            Polygon::from(LinearRing::new(vec![
                Point::new(-3.0, 1.0),
                Point::new(2.0, 1.0),
                Point::new(2.0, 8.0),
            ]))
            .into(),
            MultiPoint::from(vec![Point::new(100.0, 100.0), Point::new(-100.0, 0.0)]).into(),
        ]
    }

    #[test]
    fn empty_envelope_takes_first_bounds() {
        let mut envelope = Envelope::empty();
        assert!(envelope.is_empty());
        assert!(!envelope.contains(&Point::new(0.0, 0.0)));

        envelope.expand_to_include(&Point::new(3.0, 4.0));
        assert_eq!(envelope.rect(), Some(Rect::new(3.0, 4.0, 3.0, 4.0)));
    }

    #[test]
    fn envelope_is_tightest_box() {
        for geometry in sample_geometries() {
            let envelope = Envelope::of(&geometry);
            let rect = envelope.rect().expect("not empty");

            let mut touches = [false; 4];
            geometry.for_each_point(&mut |p| {
                assert!(envelope.contains(p));
                touches[0] |= p.x == rect.x_min;
                touches[1] |= p.y == rect.y_min;
                touches[2] |= p.x == rect.x_max;
                touches[3] |= p.y == rect.y_max;
            });
            assert_eq!(touches, [true; 4], "{geometry:?}");
        }
    }

    #[test]
    fn merge_is_commutative_and_associative() {
        let envelopes: Vec<Envelope> = sample_geometries().iter().map(Envelope::of).collect();
        let (a, b, c) = (envelopes[0], envelopes[1], envelopes[3]);

        let mut ab = a;
        ab.merge(&b);
        let mut ba = b;
        ba.merge(&a);
        assert_eq!(ab, ba);

        let mut ab_c = ab;
        ab_c.merge(&c);
        let mut bc = b;
        bc.merge(&c);
        let mut a_bc = a;
        a_bc.merge(&bc);
        assert_eq!(ab_c, a_bc);

        let mut with_empty = a;
        with_empty.merge(&Envelope::empty());
        assert_eq!(with_empty, a);
    }

    #[test]
    fn expansion_never_shrinks() {
        let mut envelope = Envelope::of(&Point::new(-10.0, -10.0).into());
        envelope.expand(&Point::new(10.0, 10.0).into());
        envelope.expand(&Point::new(0.0, 0.0).into());
        assert_eq!(envelope.rect(), Some(Rect::new(-10.0, -10.0, 10.0, 10.0)));
    }
}
