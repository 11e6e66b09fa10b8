//! Geometry model used by the `geomark` markup encoders.
//!
//! The model is a closed set of planar geometries ([`Geometry`]) together with the algorithms the encoders need
//! while walking it:
//!
//! * [`Envelope`](envelope::Envelope) - running bounding box that widens with every visited coordinate,
//! * [`centroid`](centroid::centroid) - representative point of a geometry, guaranteed to lie on the path of line
//!   geometries so that labels are anchored to the drawn line.
//!
//! Coordinates are expected to be already in the target coordinate system. No reprojection is done here.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod cartesian;
pub mod centroid;
pub mod envelope;
pub mod error;
#[cfg(feature = "geo-types")]
mod from_geo_types;
mod geometry;
mod line_string;
mod multi;
mod point;
mod polygon;
pub mod rect;
pub mod segment;

pub use geometry::{Geometry, GeometryKind};
pub use line_string::{LineString, LinearRing};
pub use multi::{MultiLineString, MultiPoint, MultiPolygon};
pub use point::Point;
pub use polygon::Polygon;
