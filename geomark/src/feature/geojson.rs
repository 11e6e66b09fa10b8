use geojson::{feature::Id, LineStringType, PolygonType, Position, Value};
use geomark_types::error::GeomarkTypesError;
use geomark_types::{
    Geometry, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use serde_json::Value as JsonValue;

use crate::feature::{AttributeValue, Feature, VecFeatureSource};

fn convert_geometry(value: &geojson::Geometry) -> Result<Geometry, GeomarkTypesError> {
    Ok(match &value.value {
        Value::Point(p) => Geometry::Point(convert_point(p)?),
        Value::MultiPoint(points) => Geometry::MultiPoint(MultiPoint::from(
            points.iter().map(convert_point).collect::<Result<Vec<_>, _>>()?,
        )),
        Value::LineString(points) => Geometry::LineString(convert_line(points)?),
        Value::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString::from(
            lines.iter().map(convert_line).collect::<Result<Vec<_>, _>>()?,
        )),
        Value::Polygon(polygon) => Geometry::Polygon(convert_polygon(polygon)?),
        Value::MultiPolygon(polygons) => Geometry::MultiPolygon(MultiPolygon::from(
            polygons
                .iter()
                .map(convert_polygon)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Value::GeometryCollection(members) => Geometry::GeometryCollection(
            members
                .iter()
                .map(convert_geometry)
                .collect::<Result<Vec<_>, _>>()?,
        ),
    })
}

fn convert_point(position: &Position) -> Result<Point, GeomarkTypesError> {
    match position.as_slice() {
        [x, y] => Ok(Point::new(*x, *y)),
        [x, y, z, ..] => Ok(Point::new_3d(*x, *y, *z)),
        _ => Err(GeomarkTypesError::Conversion(format!(
            "position must have at least 2 coordinates, got {}",
            position.len()
        ))),
    }
}

fn convert_points(points: &LineStringType) -> Result<Vec<Point>, GeomarkTypesError> {
    points.iter().map(convert_point).collect()
}

fn convert_line(points: &LineStringType) -> Result<LineString, GeomarkTypesError> {
    LineString::new(convert_points(points)?)
}

fn convert_polygon(polygon: &PolygonType) -> Result<Polygon, GeomarkTypesError> {
    let Some((exterior, interiors)) = polygon.split_first() else {
        return Err(GeomarkTypesError::Conversion(
            "polygon must have an exterior ring".into(),
        ));
    };

    Ok(Polygon::new(
        LinearRing::new(convert_points(exterior)?),
        interiors
            .iter()
            .map(|ring| convert_points(ring).map(LinearRing::new))
            .collect::<Result<_, _>>()?,
    ))
}

fn convert_value(value: &JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Bool(v) => AttributeValue::Bool(*v),
        JsonValue::Number(n) => match n.as_i64() {
            Some(v) => AttributeValue::Int64(v),
            None => AttributeValue::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => AttributeValue::String(s.clone()),
        other => AttributeValue::String(other.to_string()),
    }
}

impl TryFrom<&geojson::Feature> for Feature {
    type Error = GeomarkTypesError;

    /// Features without geometry cannot be rendered and are rejected. Features without id get an empty one.
    fn try_from(value: &geojson::Feature) -> Result<Self, Self::Error> {
        let geometry = value
            .geometry
            .as_ref()
            .ok_or_else(|| GeomarkTypesError::Conversion("feature has no geometry".into()))?;

        let id = match &value.id {
            Some(Id::String(s)) => s.clone(),
            Some(Id::Number(n)) => n.to_string(),
            None => String::new(),
        };

        Ok(Feature {
            id,
            attributes: value
                .properties
                .iter()
                .flatten()
                .map(|(name, value)| (name.clone(), convert_value(value)))
                .collect(),
            geometry: convert_geometry(geometry)?,
        })
    }
}

impl VecFeatureSource {
    /// Creates a source from a GeoJSON feature collection.
    ///
    /// Features that cannot be converted are skipped with a warning. Features without an id are given
    /// `<prefix>.<index>` ids.
    pub fn from_geojson(collection: &geojson::FeatureCollection, id_prefix: &str) -> Self {
        let features = collection
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| match Feature::try_from(feature) {
                Ok(mut converted) => {
                    if converted.id.is_empty() {
                        converted.id = format!("{id_prefix}.{}", index + 1);
                    }
                    Some(converted)
                }
                Err(err) => {
                    log::warn!("Skipping GeoJSON feature {index}: {err}");
                    None
                }
            })
            .collect();

        Self::new(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_feature_collection() {
        let collection: geojson::FeatureCollection = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "roads.7", "properties": {"name": "Main", "lanes": 2},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [5, 6, 7]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0]]}}
            ]
        }"#
        .parse::<geojson::GeoJson>()
        .expect("valid geojson")
        .try_into()
        .expect("feature collection");

        let source = VecFeatureSource::from_geojson(&collection, "roads");
        let features = source.features();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "roads.7");
        assert_eq!(features[0].attribute("lanes"), Some(&AttributeValue::Int64(2)));
        assert_eq!(features[1].id, "roads.2");
        assert_eq!(features[1].geometry, Geometry::Point(Point::new_3d(5.0, 6.0, 7.0)));
    }
}
