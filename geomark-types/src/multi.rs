use serde::{Deserialize, Serialize};

use crate::{LineString, Point, Polygon};

/// A set of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPoint {
    /// Member points.
    pub parts: Vec<Point>,
}

/// A set of line strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiLineString {
    /// Member lines.
    pub parts: Vec<LineString>,
}

/// A set of polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon {
    /// Member polygons.
    pub parts: Vec<Polygon>,
}

macro_rules! impl_multi {
    ($multi:ident, $part:ident) => {
        impl $multi {
            /// Returns reference to the member geometries.
            pub fn parts(&self) -> &[$part] {
                &self.parts
            }
        }

        impl From<Vec<$part>> for $multi {
            fn from(parts: Vec<$part>) -> Self {
                Self { parts }
            }
        }
    };
}

impl_multi!(MultiPoint, Point);
impl_multi!(MultiLineString, LineString);
impl_multi!(MultiPolygon, Polygon);
