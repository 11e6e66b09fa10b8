use geo_types::{Coord, CoordFloat};

use crate::error::GeomarkTypesError;
use crate::{
    Geometry, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

fn convert_coord<T: CoordFloat>(coord: Coord<T>) -> Result<Point, GeomarkTypesError> {
    match (coord.x.to_f64(), coord.y.to_f64()) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => Err(GeomarkTypesError::Conversion(
            "coordinate cannot be represented as f64".into(),
        )),
    }
}

fn convert_coords<T: CoordFloat>(
    coords: impl Iterator<Item = Coord<T>>,
) -> Result<Vec<Point>, GeomarkTypesError> {
    coords.map(convert_coord).collect()
}

fn convert_line<T: CoordFloat>(
    line: &geo_types::LineString<T>,
) -> Result<LineString, GeomarkTypesError> {
    LineString::new(convert_coords(line.coords().copied())?)
}

fn convert_polygon<T: CoordFloat>(
    polygon: &geo_types::Polygon<T>,
) -> Result<Polygon, GeomarkTypesError> {
    let ring = |line: &geo_types::LineString<T>| {
        convert_coords(line.coords().copied()).map(LinearRing::new)
    };

    Ok(Polygon::new(
        ring(polygon.exterior())?,
        polygon
            .interiors()
            .iter()
            .map(ring)
            .collect::<Result<_, _>>()?,
    ))
}

impl<T: CoordFloat> TryFrom<&geo_types::Geometry<T>> for Geometry {
    type Error = GeomarkTypesError;

    fn try_from(value: &geo_types::Geometry<T>) -> Result<Self, Self::Error> {
        use geo_types::Geometry as G;

        Ok(match value {
            G::Point(p) => Geometry::Point(convert_coord(p.0)?),
            G::Line(line) => Geometry::LineString(LineString::new(vec![
                convert_coord(line.start)?,
                convert_coord(line.end)?,
            ])?),
            G::LineString(line) => Geometry::LineString(convert_line(line)?),
            G::Polygon(polygon) => Geometry::Polygon(convert_polygon(polygon)?),
            G::MultiPoint(points) => Geometry::MultiPoint(MultiPoint::from(convert_coords(
                points.iter().map(|p| p.0),
            )?)),
            G::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString::from(
                lines
                    .iter()
                    .map(convert_line)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            G::MultiPolygon(polygons) => Geometry::MultiPolygon(MultiPolygon::from(
                polygons
                    .iter()
                    .map(convert_polygon)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            G::GeometryCollection(collection) => Geometry::GeometryCollection(
                collection
                    .iter()
                    .map(Geometry::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            G::Rect(rect) => Geometry::Polygon(convert_polygon(&rect.to_polygon())?),
            G::Triangle(triangle) => Geometry::Polygon(convert_polygon(&triangle.to_polygon())?),
        })
    }
}

impl<T: CoordFloat> TryFrom<geo_types::Geometry<T>> for Geometry {
    type Error = GeomarkTypesError;

    fn try_from(value: geo_types::Geometry<T>) -> Result<Self, Self::Error> {
        Geometry::try_from(&value)
    }
}
