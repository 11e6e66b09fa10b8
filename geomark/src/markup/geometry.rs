use geomark_types::envelope::Envelope;
use geomark_types::{Geometry, LinearRing, Point, Polygon};

use crate::context::RenderContext;
use crate::error::EncodeError;
use crate::markup::MarkupWriter;

/// Element names of one output dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct TagContext {
    point: &'static str,
    line_string: &'static str,
    polygon: &'static str,
    linear_ring: &'static str,
    outer_boundary: &'static str,
    inner_boundary: &'static str,
    coordinates: &'static str,
    multi_point: &'static str,
    multi_line_string: &'static str,
    multi_polygon: &'static str,
    collection: &'static str,
    point_member: Option<&'static str>,
    line_string_member: Option<&'static str>,
    polygon_member: Option<&'static str>,
    geometry_member: Option<&'static str>,
    coordinate_attributes: bool,
}

impl TagContext {
    /// GML 2 names with the `gml` prefix.
    pub fn gml() -> Self {
        Self {
            point: "gml:Point",
            line_string: "gml:LineString",
            polygon: "gml:Polygon",
            linear_ring: "gml:LinearRing",
            outer_boundary: "gml:outerBoundaryIs",
            inner_boundary: "gml:innerBoundaryIs",
            coordinates: "gml:coordinates",
            multi_point: "gml:MultiPoint",
            multi_line_string: "gml:MultiLineString",
            multi_polygon: "gml:MultiPolygon",
            collection: "gml:MultiGeometry",
            point_member: Some("gml:pointMember"),
            line_string_member: Some("gml:lineStringMember"),
            polygon_member: Some("gml:polygonMember"),
            geometry_member: Some("gml:geometryMember"),
            coordinate_attributes: true,
        }
    }

    /// KML names. Every kind of multi geometry is a `MultiGeometry` without member wrappers.
    pub fn kml() -> Self {
        Self {
            point: "Point",
            line_string: "LineString",
            polygon: "Polygon",
            linear_ring: "LinearRing",
            outer_boundary: "outerBoundaryIs",
            inner_boundary: "innerBoundaryIs",
            coordinates: "coordinates",
            multi_point: "MultiGeometry",
            multi_line_string: "MultiGeometry",
            multi_polygon: "MultiGeometry",
            collection: "MultiGeometry",
            point_member: None,
            line_string_member: None,
            polygon_member: None,
            geometry_member: None,
            coordinate_attributes: false,
        }
    }

    /// Name of the collection element.
    pub fn collection(&self) -> &'static str {
        self.collection
    }
}

/// Writes geometries as markup of one dialect.
pub struct GeometryEncoder<'a> {
    context: &'a RenderContext,
    tags: TagContext,
    srs_name: Option<&'a str>,
}

impl<'a> GeometryEncoder<'a> {
    /// Creates a new encoder.
    pub fn new(context: &'a RenderContext, tags: TagContext) -> Self {
        Self {
            context,
            tags,
            srs_name: None,
        }
    }

    /// Sets the `srsName` attribute written on the outermost geometry element.
    pub fn with_srs_name(self, srs_name: Option<&'a str>) -> Self {
        Self { srs_name, ..self }
    }

    /// Writes the geometry and widens the envelope to include all its coordinates.
    ///
    /// The geometry is checked before anything is written: if it contains non-finite coordinates or geometries
    /// of an unknown kind, an error is returned and neither the writer nor the envelope is changed.
    pub fn encode(
        &self,
        geometry: &Geometry,
        writer: &mut MarkupWriter,
        envelope: &mut Envelope,
    ) -> Result<(), EncodeError> {
        check_geometry(geometry)?;
        self.write_geometry(geometry, writer, self.srs_name)?;
        envelope.expand(geometry);

        Ok(())
    }

    /// Checks that the geometry can be encoded without writing anything.
    pub fn validate(&self, geometry: &Geometry) -> Result<(), EncodeError> {
        check_geometry(geometry)
    }

    /// Encodes the geometry as a standalone fragment.
    pub fn encode_to_string(&self, geometry: &Geometry) -> Result<String, EncodeError> {
        let mut writer = MarkupWriter::new(self.context.verbose);
        self.encode(geometry, &mut writer, &mut Envelope::empty())?;
        writer.finish()
    }

    /// Formats coordinates as `x<cs>y[<cs>z]` tuples joined with the tuple separator.
    pub fn format_coordinates(&self, points: &[Point]) -> String {
        let context = self.context;
        let mut result = String::new();
        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                result.push_str(&context.tuple_separator);
            }
            result.push_str(&context.format_number(point.x));
            result.push_str(&context.coordinate_separator);
            result.push_str(&context.format_number(point.y));
            if let Some(z) = point.z {
                result.push_str(&context.coordinate_separator);
                result.push_str(&context.format_number(z));
            }
        }

        result
    }

    fn write_geometry(
        &self,
        geometry: &Geometry,
        writer: &mut MarkupWriter,
        srs_name: Option<&str>,
    ) -> Result<(), EncodeError> {
        let srs_attribute: Vec<(&str, &str)> =
            srs_name.map(|srs| ("srsName", srs)).into_iter().collect();
        let attributes = srs_attribute.as_slice();

        match geometry {
            Geometry::Point(point) => self.write_point(point, writer, attributes),
            Geometry::LineString(line) => {
                writer.start(self.tags.line_string, attributes)?;
                self.write_coordinates(&line.points, writer)?;
                writer.end(self.tags.line_string)
            }
            Geometry::Polygon(polygon) => self.write_polygon(polygon, writer, attributes),
            Geometry::MultiPoint(points) => {
                writer.start(self.tags.multi_point, attributes)?;
                for point in points.parts() {
                    self.write_member(self.tags.point_member, writer, |writer| {
                        self.write_point(point, writer, &[])
                    })?;
                }
                writer.end(self.tags.multi_point)
            }
            Geometry::MultiLineString(lines) => {
                writer.start(self.tags.multi_line_string, attributes)?;
                for line in lines.parts() {
                    self.write_member(self.tags.line_string_member, writer, |writer| {
                        writer.start(self.tags.line_string, &[])?;
                        self.write_coordinates(&line.points, writer)?;
                        writer.end(self.tags.line_string)
                    })?;
                }
                writer.end(self.tags.multi_line_string)
            }
            Geometry::MultiPolygon(polygons) => {
                writer.start(self.tags.multi_polygon, attributes)?;
                for polygon in polygons.parts() {
                    self.write_member(self.tags.polygon_member, writer, |writer| {
                        self.write_polygon(polygon, writer, &[])
                    })?;
                }
                writer.end(self.tags.multi_polygon)
            }
            Geometry::GeometryCollection(members) => {
                writer.start(self.tags.collection, attributes)?;
                for member in members {
                    self.write_member(self.tags.geometry_member, writer, |writer| {
                        self.write_geometry(member, writer, None)
                    })?;
                }
                writer.end(self.tags.collection)
            }
            other => Err(EncodeError::unsupported(other.kind())),
        }
    }

    fn write_member(
        &self,
        wrapper: Option<&str>,
        writer: &mut MarkupWriter,
        write: impl FnOnce(&mut MarkupWriter) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        match wrapper {
            Some(wrapper) => {
                writer.start(wrapper, &[])?;
                write(writer)?;
                writer.end(wrapper)
            }
            None => write(writer),
        }
    }

    fn write_point(
        &self,
        point: &Point,
        writer: &mut MarkupWriter,
        attributes: &[(&str, &str)],
    ) -> Result<(), EncodeError> {
        writer.start(self.tags.point, attributes)?;
        self.write_coordinates(std::slice::from_ref(point), writer)?;
        writer.end(self.tags.point)
    }

    fn write_polygon(
        &self,
        polygon: &Polygon,
        writer: &mut MarkupWriter,
        attributes: &[(&str, &str)],
    ) -> Result<(), EncodeError> {
        writer.start(self.tags.polygon, attributes)?;
        self.write_ring(self.tags.outer_boundary, &polygon.exterior, writer)?;
        for interior in &polygon.interiors {
            self.write_ring(self.tags.inner_boundary, interior, writer)?;
        }
        writer.end(self.tags.polygon)
    }

    fn write_ring(
        &self,
        boundary: &str,
        ring: &LinearRing,
        writer: &mut MarkupWriter,
    ) -> Result<(), EncodeError> {
        writer.start(boundary, &[])?;
        writer.start(self.tags.linear_ring, &[])?;
        self.write_coordinates(&ring.points, writer)?;
        writer.end(self.tags.linear_ring)?;
        writer.end(boundary)
    }

    fn write_coordinates(
        &self,
        points: &[Point],
        writer: &mut MarkupWriter,
    ) -> Result<(), EncodeError> {
        let decimal = self.context.decimal.to_string();
        let mut attributes = Vec::new();
        if self.tags.coordinate_attributes {
            attributes.push(("decimal", decimal.as_str()));
            attributes.push(("cs", self.context.coordinate_separator.as_str()));
            attributes.push(("ts", self.context.tuple_separator.as_str()));
        }

        if points.is_empty() {
            return writer.empty(self.tags.coordinates, &attributes);
        }

        writer.text_element(
            self.tags.coordinates,
            &attributes,
            &self.format_coordinates(points),
        )
    }
}

fn check_geometry(geometry: &Geometry) -> Result<(), EncodeError> {
    match geometry {
        Geometry::Point(_)
        | Geometry::LineString(_)
        | Geometry::Polygon(_)
        | Geometry::MultiPoint(_)
        | Geometry::MultiLineString(_)
        | Geometry::MultiPolygon(_) => {}
        Geometry::GeometryCollection(members) => {
            for member in members {
                check_geometry(member)?;
            }
        }
        other => return Err(EncodeError::unsupported(other.kind())),
    }

    let mut finite = true;
    geometry.for_each_point(&mut |point| finite &= point.is_finite());
    if finite {
        Ok(())
    } else {
        Err(EncodeError::NonFiniteCoordinate)
    }
}
