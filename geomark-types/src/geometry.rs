use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

/// Any supported geometry.
///
/// The set of variants is closed within this crate. It is marked `non_exhaustive` so that adding a new kind is a
/// visible change for every downstream dispatcher, which must handle unknown kinds explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Geometry {
    /// Single point.
    Point(Point),
    /// Open or closed line.
    LineString(LineString),
    /// Polygon with holes.
    Polygon(Polygon),
    /// Set of points.
    MultiPoint(MultiPoint),
    /// Set of lines.
    MultiLineString(MultiLineString),
    /// Set of polygons.
    MultiPolygon(MultiPolygon),
    /// Heterogeneous set of geometries.
    GeometryCollection(Vec<Geometry>),
}

/// Kind of a [`Geometry`] without its data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum GeometryKind {
    /// See [`Geometry::Point`].
    Point,
    /// See [`Geometry::LineString`].
    LineString,
    /// See [`Geometry::Polygon`].
    Polygon,
    /// See [`Geometry::MultiPoint`].
    MultiPoint,
    /// See [`Geometry::MultiLineString`].
    MultiLineString,
    /// See [`Geometry::MultiPolygon`].
    MultiPolygon,
    /// See [`Geometry::GeometryCollection`].
    GeometryCollection,
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        };
        write!(f, "{name}")
    }
}

impl Geometry {
    /// Kind of the geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Calls `f` for every coordinate of the geometry in the order they are stored.
    pub fn for_each_point<F: FnMut(&Point)>(&self, f: &mut F) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::LineString(line) => line.points.iter().for_each(f),
            Geometry::Polygon(polygon) => Geometry::for_each_polygon_point(polygon, f),
            Geometry::MultiPoint(points) => points.parts.iter().for_each(f),
            Geometry::MultiLineString(lines) => lines
                .parts
                .iter()
                .for_each(|line| line.points.iter().for_each(&mut *f)),
            Geometry::MultiPolygon(polygons) => {
                for polygon in &polygons.parts {
                    Geometry::for_each_polygon_point(polygon, f);
                }
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.for_each_point(f);
                }
            }
        }
    }

    fn for_each_polygon_point<F: FnMut(&Point)>(polygon: &Polygon, f: &mut F) {
        for ring in polygon.iter_rings() {
            for point in &ring.points {
                f(point);
            }
        }
    }

    /// Returns true if the geometry has no coordinates at all.
    pub fn is_empty(&self) -> bool {
        let mut empty = true;
        self.for_each_point(&mut |_| empty = false);
        empty
    }

    /// Returns true if the geometry is a point or a set of points.
    pub fn is_puntal(&self) -> bool {
        matches!(self, Geometry::Point(_) | Geometry::MultiPoint(_))
    }
}

macro_rules! impl_from {
    ($variant:ident) => {
        impl From<$variant> for Geometry {
            fn from(value: $variant) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_from!(Point);
impl_from!(LineString);
impl_from!(Polygon);
impl_from!(MultiPoint);
impl_from!(MultiLineString);
impl_from!(MultiPolygon);

impl From<Vec<Geometry>> for Geometry {
    fn from(value: Vec<Geometry>) -> Self {
        Self::GeometryCollection(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearRing;

    #[test]
    fn visits_points_in_storage_order() {
        let polygon = Polygon::new(
            LinearRing::new(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
            ]),
            vec![LinearRing::new(vec![
                Point::new(1.0, 1.0),
                Point::new(2.0, 1.0),
                Point::new(2.0, 2.0),
            ])],
        );
        let geometry = Geometry::GeometryCollection(vec![
            Point::new(-1.0, -1.0).into(),
            polygon.into(),
        ]);

        let mut visited = vec![];
        geometry.for_each_point(&mut |p| visited.push((p.x, p.y)));

        assert_eq!(visited.len(), 9);
        assert_eq!(visited[0], (-1.0, -1.0));
        assert_eq!(visited[1], (0.0, 0.0));
        assert_eq!(visited[4], (0.0, 0.0));
        assert_eq!(visited[5], (1.0, 1.0));
    }

    #[test]
    fn empty_collections() {
        assert!(Geometry::GeometryCollection(vec![]).is_empty());
        assert!(Geometry::MultiPoint(MultiPoint::default()).is_empty());
        assert!(!Geometry::Point(Point::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn kind_names() {
        assert_eq!(
            Geometry::from(MultiPolygon::default()).kind().to_string(),
            "MultiPolygon"
        );
    }
}
