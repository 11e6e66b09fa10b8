//! Representative points of geometries, used to anchor labels and camera positions.
//!
//! For lines the returned point is always on the line itself: the middle of the path measured along its length,
//! not the middle of its bounding box. Areas use the area-weighted centroid.

use nalgebra::Vector2;

use crate::segment::segments;
use crate::{Geometry, LinearRing, MultiPoint, Point, Polygon};

/// Absolute tolerance used when deciding if the middle of a line falls onto a vertex.
pub const CENTROID_TOLERANCE: f64 = 1e-6;

/// Computes a representative point of the geometry.
///
/// * points are returned as is,
/// * line strings return the point at half of their length (see [`line_centroid`]),
/// * polygons and multipolygons return the area-weighted centroid,
/// * multipoints return the mean of their points, multilines the length-weighted center of their segments,
/// * a collection with a single member returns the centroid of that member,
/// * a collection with several members computes the centroid of every member and returns the first of them.
///
/// Returns `None` only for geometries without any coordinates.
pub fn centroid(geometry: &Geometry) -> Option<Point> {
    match geometry {
        Geometry::Point(p) => Some(*p),
        Geometry::LineString(line) => line_centroid(&line.points),
        Geometry::Polygon(polygon) => area_centroid(std::slice::from_ref(polygon)),
        Geometry::MultiPolygon(polygons) => area_centroid(&polygons.parts),
        Geometry::MultiPoint(points) => points_centroid(&points.parts),
        Geometry::MultiLineString(lines) => {
            lines_centroid(lines.parts.iter().map(|line| line.points.as_slice()))
        }
        Geometry::GeometryCollection(members) => collection_centroid(members),
    }
}

/// Point on the line at half of its total length.
///
/// Segments are walked from the first vertex, accumulating their lengths. The segment at which the accumulated length
/// reaches the middle contains the result. If the middle is within [`CENTROID_TOLERANCE`] of a vertex, the vertex
/// itself is returned. A line of zero length returns its first vertex.
pub fn line_centroid(points: &[Point]) -> Option<Point> {
    let first = points.first()?;
    let total: f64 = segments(points).map(|s| s.length()).sum();
    if total <= 0.0 {
        return Some(*first);
    }

    let mid = total / 2.0;
    let mut walked = 0.0;
    for segment in segments(points) {
        let length = segment.length();
        let reached = walked + length;
        if (reached - mid).abs() <= CENTROID_TOLERANCE {
            return Some(*segment.1);
        }

        if reached > mid {
            return Some(segment.point_at((mid - walked) / length));
        }

        walked = reached;
    }

    points.last().copied()
}

fn collection_centroid(members: &[Geometry]) -> Option<Point> {
    match members {
        [] => None,
        [single] => centroid(single),
        _ => {
            // Only the first member's centroid is used, the rest are computed but dropped.
            let virtual_points =
                MultiPoint::from(members.iter().filter_map(centroid).collect::<Vec<_>>());
            virtual_points.parts.first().copied()
        }
    }
}

fn points_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + Vector2::new(p.x, p.y));
    let mean = sum / points.len() as f64;

    Some(Point::new(mean.x, mean.y))
}

fn lines_centroid<'a>(lines: impl Iterator<Item = &'a [Point]> + Clone) -> Option<Point> {
    let mut weighted = Vector2::zeros();
    let mut total_length = 0.0;
    for segment in lines.clone().flat_map(segments) {
        let length = segment.length();
        let mid = segment.midpoint();
        weighted += Vector2::new(mid.x, mid.y) * length;
        total_length += length;
    }

    if total_length > 0.0 {
        let center = weighted / total_length;
        return Some(Point::new(center.x, center.y));
    }

    lines.flat_map(|points| points.first()).next().copied()
}

fn area_centroid(polygons: &[Polygon]) -> Option<Point> {
    let origin = polygons
        .iter()
        .find_map(|polygon| polygon.exterior.points.first())
        .copied()?;

    let mut area_sum = 0.0;
    let mut weighted = Vector2::zeros();
    for polygon in polygons {
        let (area, moment) = ring_moment(&polygon.exterior, &origin);
        area_sum += area;
        weighted += moment;

        for hole in &polygon.interiors {
            let (area, moment) = ring_moment(hole, &origin);
            area_sum -= area;
            weighted -= moment;
        }
    }

    if area_sum.abs() <= f64::EPSILON {
        return lines_centroid(polygons.iter().map(|p| p.exterior.points.as_slice()));
    }

    let center = weighted / area_sum;
    Some(Point::new(origin.x + center.x, origin.y + center.y))
}

/// Unsigned area of the ring and its first moment (area times centroid), relative to `origin`.
fn ring_moment(ring: &LinearRing, origin: &Point) -> (f64, Vector2<f64>) {
    let mut double_area = 0.0;
    let mut moment = Vector2::zeros();
    for segment in ring.iter_segments() {
        let a = Vector2::new(segment.0.x - origin.x, segment.0.y - origin.y);
        let b = Vector2::new(segment.1.x - origin.x, segment.1.y - origin.y);
        let cross = a.x * b.y - b.x * a.y;
        double_area += cross;
        moment += (a + b) * cross;
    }

    let area = double_area / 2.0;
    let moment = moment / 6.0;
    if area < 0.0 {
        (-area, -moment)
    } else {
        (area, moment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineString, MultiLineString, MultiPolygon};
    use approx::assert_abs_diff_eq;

    fn line(points: &[(f64, f64)]) -> LineString {
        LineString::new(points.iter().map(|&p| Point::from(p)).collect()).expect("valid line")
    }

    fn square(x: f64, y: f64, size: f64) -> LinearRing {
        LinearRing::new(vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ])
    }

    fn assert_point_eq(actual: Option<Point>, x: f64, y: f64) {
        let actual = actual.expect("centroid exists");
        assert_abs_diff_eq!(actual.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.y, y, epsilon = 1e-9);
    }

    #[test]
    fn point_is_its_own_centroid() {
        assert_eq!(
            centroid(&Point::new_3d(1.0, 2.0, 3.0).into()),
            Some(Point::new_3d(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn line_centroid_is_on_path() {
        // An L-shaped line: the middle of the bounding box is (5, 5), far from the drawn path.
        let l_shape = line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let c = centroid(&l_shape.clone().into());
        assert_point_eq(c, 10.0, 0.0);

        let lines = [
            l_shape,
            line(&[(0.0, 0.0), (3.0, 4.0)]),
            line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 7.0), (-5.0, 7.0), (-5.0, -2.0)]),
            line(&[(2.0, 2.0), (2.0, 2.0), (4.0, 2.0)]),
        ];
        for line in lines {
            let c = centroid(&line.clone().into()).expect("centroid exists");
            let distance = line.distance_to_point_sq(&c).expect("not empty").sqrt();
            assert!(distance <= CENTROID_TOLERANCE, "{line:?} -> {c:?}");
        }
    }

    #[test]
    fn line_centroid_interpolates_within_segment() {
        let c = line_centroid(&[
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 6.0),
        ]);
        assert_point_eq(c, 2.0, 2.0);
    }

    #[test]
    fn line_centroid_interpolates_elevation() {
        let c = line_centroid(&[Point::new_3d(0.0, 0.0, 0.0), Point::new_3d(4.0, 0.0, 8.0)])
            .expect("centroid exists");
        assert_eq!(c.z, Some(4.0));
    }

    #[test]
    fn zero_length_line_returns_its_vertex() {
        let c = line_centroid(&[Point::new(3.0, 3.0), Point::new(3.0, 3.0)]);
        assert_eq!(c, Some(Point::new(3.0, 3.0)));
        assert_eq!(line_centroid(&[]), None);
    }

    #[test]
    fn polygon_centroid() {
        let polygon = Polygon::from(square(0.0, 0.0, 2.0));
        assert_point_eq(centroid(&polygon.into()), 1.0, 1.0);
    }

    #[test]
    fn polygon_with_hole_moves_centroid_away_from_hole() {
        let polygon = Polygon::new(square(0.0, 0.0, 4.0), vec![square(2.0, 0.0, 2.0)]);
        // Remaining area is an L of three 2x2 squares: (1,1), (1,3), (3,3).
        assert_point_eq(centroid(&polygon.into()), 5.0 / 3.0, 7.0 / 3.0);
    }

    #[test]
    fn multipolygon_centroid_is_area_weighted() {
        let polygons = MultiPolygon::from(vec![
            Polygon::from(square(0.0, 0.0, 2.0)),
            Polygon::from(square(10.0, 0.0, 1.0)),
        ]);
        // Areas 4 and 1.
        assert_point_eq(centroid(&polygons.into()), (4.0 * 1.0 + 10.5) / 5.0, (4.0 + 0.5) / 5.0);
    }

    #[test]
    fn degenerate_polygon_falls_back_to_outline() {
        let flat = Polygon::from(LinearRing::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 0.0),
        ]));
        assert_point_eq(centroid(&flat.into()), 2.0, 0.0);
    }

    #[test]
    fn multipoint_and_multiline() {
        let points = MultiPoint::from(vec![Point::new(0.0, 0.0), Point::new(4.0, 2.0)]);
        assert_point_eq(centroid(&points.into()), 2.0, 1.0);
        assert_eq!(centroid(&MultiPoint::default().into()), None);

        let lines = MultiLineString::from(vec![
            line(&[(0.0, 0.0), (4.0, 0.0)]),
            line(&[(0.0, 10.0), (0.0, 11.0)]),
        ]);
        assert_point_eq(centroid(&lines.into()), (4.0 * 2.0) / 5.0, 10.5 / 5.0);
    }

    #[test]
    fn collection_with_single_member_recurses() {
        let collection = Geometry::GeometryCollection(vec![line(&[(0.0, 0.0), (10.0, 0.0)]).into()]);
        assert_point_eq(centroid(&collection), 5.0, 0.0);
    }

    #[test]
    fn collection_with_many_members_returns_first_member_centroid() {
        let collection = Geometry::GeometryCollection(vec![
            Point::new(0.0, 0.0).into(),
            Point::new(10.0, 10.0).into(),
        ]);
        assert_eq!(centroid(&collection), Some(Point::new(0.0, 0.0)));

        let collection = Geometry::GeometryCollection(vec![
            Geometry::GeometryCollection(vec![]),
            Polygon::from(square(0.0, 0.0, 2.0)).into(),
        ]);
        assert_point_eq(centroid(&collection), 1.0, 1.0);
        assert_eq!(centroid(&Geometry::GeometryCollection(vec![])), None);
    }
}
