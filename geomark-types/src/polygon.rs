use serde::{Deserialize, Serialize};

use crate::LinearRing;

/// Area bounded by an exterior ring, with optional holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary.
    pub exterior: LinearRing,
    /// Holes.
    #[serde(default)]
    pub interiors: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a new polygon.
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Iterates over all rings of the polygon, exterior first.
    pub fn iter_rings(&self) -> impl Iterator<Item = &'_ LinearRing> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Area of the polygon with holes subtracted.
    pub fn area(&self) -> f64 {
        self.exterior.area_signed().abs()
            - self
                .interiors
                .iter()
                .map(|ring| ring.area_signed().abs())
                .sum::<f64>()
    }
}

impl From<LinearRing> for Polygon {
    fn from(value: LinearRing) -> Self {
        Self {
            exterior: value,
            interiors: vec![],
        }
    }
}
