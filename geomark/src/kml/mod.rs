//! Placemark output: every feature as a styled KML `Placemark`.
//!
//! Unlike the tabular output, placemarks are independent of each other. Each one carries its own style block built
//! from the rules that apply to the feature, a `LookAt` pointing at the feature centroid and the geometry. Geometries
//! other than a single point are written as a `MultiGeometry` that starts with a marker point at the centroid.

use std::sync::Arc;

use geomark_types::centroid::centroid;
use geomark_types::envelope::Envelope;
use geomark_types::{Geometry, Point};

use crate::context::RenderContext;
use crate::diagnostic::{Diagnostic, DiagnosticStage, EncodedDocument};
use crate::error::{EncodeError, RenderError};
use crate::feature::{Feature, FeatureSource, OpenReader};
use crate::gml::AbortCheck;
use crate::markup::{GeometryEncoder, MarkupWriter, TagContext};
use crate::style::{IconStyle, PlacemarkStyle, Style, StyleResolver, SymbolizerMapper};

mod labeller;

pub use labeller::{PlacemarkLabeller, TemplateLabeller};

/// Namespace of KML 2.2 documents.
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Markup of a single placemark.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPlacemark {
    /// `Placemark` element.
    pub markup: String,
    /// Parts of the placemark that could not be written.
    pub diagnostics: Vec<Diagnostic>,
}

/// Encodes features as KML placemarks.
pub struct KmlEncoder<L = TemplateLabeller> {
    context: RenderContext,
    style: Arc<Style>,
    resolver: StyleResolver,
    mapper: SymbolizerMapper,
    labeller: L,
    abort_check: Option<AbortCheck>,
}

impl<L: PlacemarkLabeller> KmlEncoder<L> {
    /// Creates a new encoder.
    pub fn new(
        context: RenderContext,
        style: Arc<Style>,
        resolver: StyleResolver,
        labeller: L,
    ) -> Self {
        Self {
            context,
            style,
            resolver,
            mapper: SymbolizerMapper,
            labeller,
            abort_check: None,
        }
    }

    /// Sets a check that can abort [`KmlEncoder::encode`] between features.
    pub fn with_abort_check(self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            abort_check: Some(Arc::new(check)),
            ..self
        }
    }

    /// Encodes one feature as a standalone `Placemark` element.
    ///
    /// Fails if the geometry of the feature cannot be encoded. Failures of the labeller are only recorded in
    /// [`EncodedPlacemark::diagnostics`].
    pub fn encode_feature(&self, feature: &Feature) -> Result<EncodedPlacemark, RenderError> {
        let mut writer = MarkupWriter::new(self.context.verbose);
        let mut diagnostics = vec![];
        self.write_placemark(feature, &mut writer, &mut diagnostics)?;

        Ok(EncodedPlacemark {
            markup: writer.finish()?,
            diagnostics,
        })
    }

    /// Encodes all features of the source into a KML document.
    ///
    /// Features with geometries that cannot be encoded are left out and reported in the diagnostics. Errors of the
    /// source abort the rendering. The source reader is released before this method returns in any case.
    pub fn encode<S>(&self, source: &S) -> Result<EncodedDocument, RenderError>
    where
        S: FeatureSource + ?Sized,
    {
        let mut reader = OpenReader::open(source)?;
        let mut writer = MarkupWriter::new(self.context.verbose);
        let mut diagnostics = vec![];

        writer.declaration()?;
        writer.start("kml", &[("xmlns", KML_NAMESPACE)])?;
        writer.start("Document", &[])?;
        if !self.style.name.is_empty() {
            writer.text_element("name", &[], &self.style.name)?;
        }

        let mut count = 0;
        loop {
            if self.is_aborted() {
                log::debug!("KML rendering aborted after {count} features");
                return Err(RenderError::Aborted);
            }

            let Some(next) = reader.next() else {
                break;
            };
            let feature = next?;

            match self.write_placemark(&feature, &mut writer, &mut diagnostics) {
                Ok(()) => {}
                Err(EncodeError::Write(message)) => {
                    return Err(EncodeError::Write(message).into())
                }
                Err(err) => diagnostics.push(Diagnostic::new(
                    &feature.id,
                    DiagnosticStage::Geometry,
                    err,
                )),
            }

            count += 1;
        }
        drop(reader);

        writer.end("Document")?;
        writer.end("kml")?;

        log::debug!(
            "Encoded {count} placemarks with style '{}' and {} diagnostics",
            self.style.name,
            diagnostics.len()
        );

        Ok(EncodedDocument {
            markup: writer.finish()?,
            diagnostics,
        })
    }

    fn is_aborted(&self) -> bool {
        self.abort_check.as_ref().map(|check| check()).unwrap_or(false)
    }

    fn write_placemark(
        &self,
        feature: &Feature,
        writer: &mut MarkupWriter,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), EncodeError> {
        log::trace!("Encoding placemark {}", feature.id);

        let geometry_encoder = GeometryEncoder::new(&self.context, TagContext::kml());
        geometry_encoder.validate(&feature.geometry)?;

        let rules = self.resolver.resolve(
            feature,
            &self.style.rules,
            self.context.scale_denominator,
        );
        let instructions = self.mapper.map_all(
            rules.iter().flat_map(|rule| rule.symbolizers.iter()),
            feature,
        );
        let mut style = PlacemarkStyle::from_instructions(&instructions);
        if style.icon.is_none() {
            style.icon = Some(default_icon(&feature.geometry));
        }

        let name = self.labeller.name(feature, &rules).unwrap_or_else(|err| {
            diagnostics.push(Diagnostic::new(&feature.id, DiagnosticStage::Name, err));
            None
        });
        let description = self.labeller.description(feature).unwrap_or_else(|err| {
            diagnostics.push(Diagnostic::new(
                &feature.id,
                DiagnosticStage::Description,
                err,
            ));
            None
        });

        let center = centroid(&feature.geometry);

        writer.start("Placemark", &[("id", feature.id.as_str())])?;
        if let Some(name) = name {
            writer.text_element("name", &[], &name)?;
        }
        if let Some(description) = description {
            writer.text_element("description", &[], &description)?;
        }
        if let Some(center) = &center {
            self.write_look_at(center, writer)?;
        }
        self.write_style(&style, writer)?;
        self.write_geometry(&geometry_encoder, &feature.geometry, center, writer)?;
        writer.end("Placemark")
    }

    fn write_look_at(&self, center: &Point, writer: &mut MarkupWriter) -> Result<(), EncodeError> {
        writer.start("LookAt", &[])?;
        writer.text_element("longitude", &[], &self.context.format_number(center.x))?;
        writer.text_element("latitude", &[], &self.context.format_number(center.y))?;
        writer.end("LookAt")
    }

    fn write_style(
        &self,
        style: &PlacemarkStyle,
        writer: &mut MarkupWriter,
    ) -> Result<(), EncodeError> {
        writer.start("Style", &[])?;

        if let Some(icon) = &style.icon {
            writer.start("IconStyle", &[])?;
            writer.text_element("color", &[], &icon.color.to_kml())?;
            writer.text_element("scale", &[], &self.context.format_number(icon.scale))?;
            writer.start("Icon", &[])?;
            writer.text_element("href", &[], &icon.href)?;
            writer.end("Icon")?;
            writer.end("IconStyle")?;
        }

        if let Some(label) = &style.label {
            writer.start("LabelStyle", &[])?;
            writer.text_element("color", &[], &label.color.to_kml())?;
            writer.end("LabelStyle")?;
        }

        if let Some(line) = &style.line {
            writer.start("LineStyle", &[])?;
            writer.text_element("color", &[], &line.color.to_kml())?;
            writer.text_element("width", &[], &self.context.format_number(line.width))?;
            writer.end("LineStyle")?;
        }

        if let Some(poly) = &style.poly {
            writer.start("PolyStyle", &[])?;
            writer.text_element("color", &[], &poly.color.to_kml())?;
            writer.text_element("outline", &[], if poly.outline { "1" } else { "0" })?;
            writer.end("PolyStyle")?;
        }

        writer.end("Style")
    }

    fn write_geometry(
        &self,
        encoder: &GeometryEncoder,
        geometry: &Geometry,
        center: Option<Point>,
        writer: &mut MarkupWriter,
    ) -> Result<(), EncodeError> {
        let mut envelope = Envelope::empty();
        if let Geometry::Point(_) = geometry {
            return encoder.encode(geometry, writer, &mut envelope);
        }

        let collection = TagContext::kml().collection();
        writer.start(collection, &[])?;
        if let Some(center) = center {
            encoder.encode(&Geometry::Point(center), writer, &mut envelope)?;
        }
        encoder.encode(geometry, writer, &mut envelope)?;
        writer.end(collection)
    }
}

fn default_icon(geometry: &Geometry) -> IconStyle {
    if geometry.is_puntal() {
        IconStyle::default_point()
    } else {
        IconStyle::centroid_marker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LabelError, SourceError};
    use crate::feature::source::tests::FailingSource;
    use crate::feature::VecFeatureSource;
    use crate::style::{
        Fill, PointSymbolizer, PolygonSymbolizer, Rule, Stroke, TextSymbolizer,
        CENTROID_ICON_HREF, DEFAULT_ICON_HREF,
    };
    use crate::Color;
    use assert_matches::assert_matches;
    use geomark_types::{LinearRing, Polygon};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::from(LinearRing::new(vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]))
    }

    fn population_style() -> Arc<Style> {
        Arc::new(Style::new(
            "population",
            vec![
                Rule::new(
                    "small",
                    vec![
                        PolygonSymbolizer::new(Fill::new(Color::RED).with_opacity(0.5))
                            .with_stroke(Stroke::new(Color::BLACK).with_width(2.0))
                            .into(),
                        TextSymbolizer::new("{STATE_NAME}").into(),
                    ],
                )
                .with_scale_range(Some(0.0), Some(1000.0)),
                Rule::new_else("other", vec![PolygonSymbolizer::default().into()]),
            ],
        ))
    }

    fn encoder(scale: f64) -> KmlEncoder {
        KmlEncoder::new(
            RenderContext::default().with_scale_denominator(scale),
            population_style(),
            StyleResolver::new(),
            TemplateLabeller::without_description(),
        )
    }

    #[test]
    fn point_placemark() {
        let style = Arc::new(Style::new(
            "pins",
            vec![Rule::new(
                "pin",
                vec![
                    PointSymbolizer::icon("http://example.com/pin.png").into(),
                    TextSymbolizer::new("{STATE_NAME}").into(),
                ],
            )],
        ));
        let encoder = KmlEncoder::new(
            RenderContext::default(),
            style,
            StyleResolver::new(),
            TemplateLabeller::without_description(),
        );
        let feature = Feature::new("states.1", Point::new(1.5, -2.25))
            .with_attribute("STATE_NAME", "Illinois");

        let placemark = encoder.encode_feature(&feature).expect("encoded");

        assert!(placemark.diagnostics.is_empty());
        assert_eq!(
            placemark.markup,
            concat!(
                r#"<Placemark id="states.1"><name>Illinois</name>"#,
                "<LookAt><longitude>1.5</longitude><latitude>-2.25</latitude></LookAt>",
                "<Style><IconStyle><color>ffffffff</color><scale>1</scale>",
                "<Icon><href>http://example.com/pin.png</href></Icon></IconStyle>",
                "<LabelStyle><color>ff000000</color></LabelStyle></Style>",
                "<Point><coordinates>1.5,-2.25</coordinates></Point></Placemark>"
            )
        );
    }

    #[test]
    fn polygon_has_leading_centroid_point() {
        let feature =
            Feature::new("states.2", square(0.0, 0.0, 10.0)).with_attribute("STATE_NAME", "Ohio");

        let placemark = encoder(500.0).encode_feature(&feature).expect("encoded");
        let markup = &placemark.markup;

        assert!(markup.contains("<LookAt><longitude>5</longitude><latitude>5</latitude></LookAt>"));
        assert!(markup.contains(
            "<MultiGeometry><Point><coordinates>5,5</coordinates></Point><Polygon>"
        ));
        assert!(markup.contains(&format!("<href>{CENTROID_ICON_HREF}</href>")));
        assert!(markup.contains("<PolyStyle><color>800000ff</color><outline>1</outline></PolyStyle>"));
        assert!(markup.contains("<LineStyle><color>ff000000</color><width>2</width></LineStyle>"));
        assert!(markup.contains("<name>Ohio</name>"));
    }

    #[test]
    fn else_rule_applies_at_upper_scale_bound() {
        let feature =
            Feature::new("states.2", square(0.0, 0.0, 10.0)).with_attribute("STATE_NAME", "Ohio");

        let markup = encoder(1000.0)
            .encode_feature(&feature)
            .expect("encoded")
            .markup;

        assert!(markup.contains("<PolyStyle><color>ff808080</color><outline>0</outline></PolyStyle>"));
        assert!(!markup.contains("<name>"));
        assert!(!markup.contains("<LineStyle>"));
    }

    #[test]
    fn failing_label_still_emits_placemark() {
        let feature = Feature::new("states.3", square(0.0, 0.0, 2.0));

        let placemark = encoder(1.0).encode_feature(&feature).expect("encoded");

        assert!(!placemark.markup.contains("<name>"));
        assert!(placemark.markup.contains("<Polygon>"));
        assert!(placemark.markup.contains("<PolyStyle>"));
        assert_eq!(placemark.diagnostics.len(), 1);
        assert_eq!(placemark.diagnostics[0].stage, DiagnosticStage::Name);
        assert_eq!(placemark.diagnostics[0].feature_id, "states.3");
    }

    struct BrokenDescription;

    impl PlacemarkLabeller for BrokenDescription {
        fn name(&self, feature: &Feature, _rules: &[&Rule]) -> Result<Option<String>, LabelError> {
            Ok(Some(feature.id.clone()))
        }

        fn description(&self, _feature: &Feature) -> Result<Option<String>, LabelError> {
            Err(LabelError("template store is unavailable".into()))
        }
    }

    #[test]
    fn custom_labeller_failure_is_recorded() {
        let encoder = KmlEncoder::new(
            RenderContext::default(),
            Arc::new(Style::default()),
            StyleResolver::new(),
            BrokenDescription,
        );

        let placemark = encoder
            .encode_feature(&Feature::new("p.1", Point::new(3.0, 4.0)))
            .expect("encoded");

        assert!(placemark.markup.contains("<name>p.1</name>"));
        assert!(!placemark.markup.contains("<description>"));
        assert!(placemark.markup.contains(&format!("<href>{DEFAULT_ICON_HREF}</href>")));
        assert_eq!(placemark.diagnostics.len(), 1);
        assert_eq!(placemark.diagnostics[0].stage, DiagnosticStage::Description);
    }

    #[test]
    fn description_is_escaped() {
        let encoder = KmlEncoder::new(
            RenderContext::default(),
            Arc::new(Style::default()),
            StyleResolver::new(),
            TemplateLabeller::new(),
        );
        let feature = Feature::new("p.1", Point::new(0.0, 0.0)).with_attribute("NAME", "A&B");

        let markup = encoder.encode_feature(&feature).expect("encoded").markup;

        assert!(markup.contains(
            "<description>&lt;table&gt;&lt;tr&gt;&lt;td&gt;NAME&lt;/td&gt;&lt;td&gt;A&amp;B&lt;/td&gt;"
        ));
    }

    #[test]
    fn invalid_geometry_fails_single_placemark() {
        let feature = Feature::new("bad", Point::new(f64::INFINITY, 0.0));
        assert_matches!(
            encoder(1.0).encode_feature(&feature),
            Err(RenderError::Encode(EncodeError::NonFiniteCoordinate))
        );
    }

    #[test]
    fn document_skips_invalid_geometries() {
        let source = VecFeatureSource::new(vec![
            Feature::new("a", Point::new(0.0, 0.0)).with_attribute("STATE_NAME", "A"),
            Feature::new("b", Point::new(f64::NAN, 0.0)).with_attribute("STATE_NAME", "B"),
            Feature::new("c", square(0.0, 0.0, 1.0)).with_attribute("STATE_NAME", "C"),
        ]);

        let document = encoder(1.0).encode(&source).expect("encoded");

        assert!(document.markup.starts_with(
            r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document><name>population</name>"#
        ));
        assert!(document.markup.ends_with("</Document></kml>"));
        assert_eq!(document.markup.matches("<Placemark ").count(), 2);
        assert!(!document.markup.contains(r#"id="b""#));
        assert_eq!(document.diagnostics.len(), 1);
        assert_eq!(document.diagnostics[0].feature_id, "b");
        assert_eq!(document.diagnostics[0].stage, DiagnosticStage::Geometry);
    }

    #[test]
    fn source_error_releases_reader() {
        let closed = Arc::new(AtomicUsize::new(0));
        let source = FailingSource {
            features: vec![Feature::new("a", Point::new(0.0, 0.0))],
            fail_after: Some(0),
            closed: closed.clone(),
        };

        assert_matches!(
            encoder(1.0).encode(&source),
            Err(RenderError::Source(SourceError::Read(_)))
        );
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
