//! Tabular output: all features of a source as one GML 2 `wfs:FeatureCollection` document.

use std::sync::Arc;

use geomark_types::envelope::Envelope;
use geomark_types::Point;

use crate::context::RenderContext;
use crate::diagnostic::{Diagnostic, DiagnosticStage, EncodedDocument};
use crate::error::{EncodeError, RenderError};
use crate::feature::{Feature, FeatureSource, FeatureType, OpenReader};
use crate::markup::{GeometryEncoder, MarkupWriter, TagContext};

/// Namespace of the `wfs` prefix.
pub const WFS_NAMESPACE: &str = "http://www.opengis.net/wfs";
/// Namespace of the `gml` prefix.
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

const COLLECTION_TAG: &str = "wfs:FeatureCollection";
const MEMBER_TAG: &str = "gml:featureMember";

/// Check called before every feature. Returning `true` aborts the rendering.
pub type AbortCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// Encodes features of one type into a GML 2 feature collection.
///
/// The bounding box of the collection is written at the top of the document, but it is only known after the last
/// feature is read. The encoder reserves its position right after the collection start tag and fills it in when the
/// source is exhausted.
pub struct GmlEncoder {
    context: RenderContext,
    feature_type: FeatureType,
    abort_check: Option<AbortCheck>,
}

impl GmlEncoder {
    /// Creates a new encoder.
    pub fn new(context: RenderContext, feature_type: FeatureType) -> Self {
        Self {
            context,
            feature_type,
            abort_check: None,
        }
    }

    /// Sets a check that can abort the rendering between features.
    pub fn with_abort_check(self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            abort_check: Some(Arc::new(check)),
            ..self
        }
    }

    /// Encodes all features of the source.
    ///
    /// A feature whose geometry cannot be encoded is written without the geometry property and reported in
    /// [`EncodedDocument::diagnostics`]. Errors of the source abort the rendering. The source reader is released
    /// before this method returns in any case.
    pub fn encode<S>(&self, source: &S) -> Result<EncodedDocument, RenderError>
    where
        S: FeatureSource + ?Sized,
    {
        let mut reader = OpenReader::open(source)?;
        let mut writer = MarkupWriter::new(self.context.verbose);
        let mut envelope = Envelope::empty();
        let mut diagnostics = vec![];
        let geometry_encoder = self.geometry_encoder();

        writer.declaration()?;
        let feature_namespace = format!("xmlns:{}", self.feature_type.prefix);
        writer.start(
            COLLECTION_TAG,
            &[
                ("xmlns:wfs", WFS_NAMESPACE),
                ("xmlns:gml", GML_NAMESPACE),
                (
                    feature_namespace.as_str(),
                    self.feature_type.namespace_uri.as_str(),
                ),
            ],
        )?;
        let reservation = writer.reserve();

        let mut count = 0;
        loop {
            if self.is_aborted() {
                log::debug!("GML rendering aborted after {count} features");
                return Err(RenderError::Aborted);
            }

            let Some(next) = reader.next() else {
                break;
            };
            let feature = next?;

            self.encode_feature(
                &feature,
                &geometry_encoder,
                &mut writer,
                &mut envelope,
                &mut diagnostics,
            )?;

            count += 1;
        }
        drop(reader);

        writer.end(COLLECTION_TAG)?;
        if let Some(reservation) = reservation {
            writer.splice(reservation, &self.envelope_markup(&envelope)?);
        }

        log::debug!(
            "Encoded {count} features of type {} with {} diagnostics",
            self.feature_type.type_name,
            diagnostics.len()
        );

        Ok(EncodedDocument {
            markup: writer.finish()?,
            diagnostics,
        })
    }

    /// Markup of the `gml:boundedBy` element for the envelope.
    ///
    /// Empty envelope is written as `<gml:null>unknown</gml:null>`.
    pub fn envelope_markup(&self, envelope: &Envelope) -> Result<String, EncodeError> {
        let mut writer = MarkupWriter::new(self.context.verbose);
        writer.start("gml:boundedBy", &[])?;

        match envelope.rect() {
            Some(rect) => {
                let srs_attribute: Vec<(&str, &str)> = self
                    .feature_type
                    .srs_name
                    .as_deref()
                    .map(|srs| ("srsName", srs))
                    .into_iter()
                    .collect();
                let decimal = self.context.decimal.to_string();
                let corners = self.geometry_encoder().format_coordinates(&[
                    Point::new(rect.x_min, rect.y_min),
                    Point::new(rect.x_max, rect.y_max),
                ]);

                writer.start("gml:Box", &srs_attribute)?;
                writer.text_element(
                    "gml:coordinates",
                    &[
                        ("decimal", decimal.as_str()),
                        ("cs", self.context.coordinate_separator.as_str()),
                        ("ts", self.context.tuple_separator.as_str()),
                    ],
                    &corners,
                )?;
                writer.end("gml:Box")?;
            }
            None => writer.text_element("gml:null", &[], "unknown")?,
        }

        writer.end("gml:boundedBy")?;
        writer.finish()
    }

    fn geometry_encoder(&self) -> GeometryEncoder<'_> {
        GeometryEncoder::new(&self.context, TagContext::gml())
            .with_srs_name(self.feature_type.srs_name.as_deref())
    }

    fn is_aborted(&self) -> bool {
        self.abort_check.as_ref().map(|check| check()).unwrap_or(false)
    }

    fn encode_feature(
        &self,
        feature: &Feature,
        geometry_encoder: &GeometryEncoder,
        writer: &mut MarkupWriter,
        envelope: &mut Envelope,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), EncodeError> {
        log::trace!("Encoding feature {}", feature.id);

        let feature_tag = self.feature_type.qualified(&self.feature_type.type_name);
        writer.start(MEMBER_TAG, &[])?;
        writer.start(&feature_tag, &[("fid", feature.id.as_str())])?;

        for (name, value) in &feature.attributes {
            if value.is_null() {
                continue;
            }

            if !is_local_name(name) {
                diagnostics.push(Diagnostic::new(
                    &feature.id,
                    DiagnosticStage::Attribute,
                    EncodeError::InvalidName(name.clone()),
                ));
                continue;
            }

            writer.text_element(
                &self.feature_type.qualified(name),
                &[],
                &value.to_string(),
            )?;
        }

        match geometry_encoder.validate(&feature.geometry) {
            Ok(()) => {
                let property_tag = self.feature_type.qualified(&self.feature_type.geometry_name);
                writer.start(&property_tag, &[])?;
                geometry_encoder.encode(&feature.geometry, writer, envelope)?;
                writer.end(&property_tag)?;
            }
            Err(err) => diagnostics.push(Diagnostic::new(
                &feature.id,
                DiagnosticStage::Geometry,
                err,
            )),
        }

        writer.end(&feature_tag)?;
        writer.end(MEMBER_TAG)
    }
}

/// Checks that the name can be used as the local part of a qualified element name (an XML `NCName`).
fn is_local_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{B7}'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::feature::source::tests::FailingSource;
    use crate::feature::VecFeatureSource;
    use assert_matches::assert_matches;
    use geomark_types::{LinearRing, Polygon};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn states_type() -> FeatureType {
        FeatureType::new("topp", "http://www.openplans.org/topp", "states")
            .with_srs_name("EPSG:4326")
    }

    #[test]
    fn pretty_document_with_envelope_header() {
        let source = VecFeatureSource::new(vec![Feature::new("states.1", Point::new(1.5, -2.25))
            .with_attribute("NAME", "Illinois")
            .with_attribute("PERSONS", 11430602i64)
            .with_attribute("CAPITAL", crate::AttributeValue::Null)]);
        let encoder = GmlEncoder::new(RenderContext::default().with_verbose(true), states_type());

        let document = encoder.encode(&source).expect("encoded");

        assert!(document.diagnostics.is_empty());
        insta::assert_snapshot!(document.markup, @r###"
        <?xml version="1.0" encoding="UTF-8"?>
        <wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:topp="http://www.openplans.org/topp">
          <gml:boundedBy>
            <gml:Box srsName="EPSG:4326">
              <gml:coordinates decimal="." cs="," ts=" ">1.5,-2.25 1.5,-2.25</gml:coordinates>
            </gml:Box>
          </gml:boundedBy>
          <gml:featureMember>
            <topp:states fid="states.1">
              <topp:NAME>Illinois</topp:NAME>
              <topp:PERSONS>11430602</topp:PERSONS>
              <topp:the_geom>
                <gml:Point srsName="EPSG:4326">
                  <gml:coordinates decimal="." cs="," ts=" ">1.5,-2.25</gml:coordinates>
                </gml:Point>
              </topp:the_geom>
            </topp:states>
          </gml:featureMember>
        </wfs:FeatureCollection>
        "###);
    }

    #[test]
    fn empty_source_has_unknown_envelope() {
        let encoder = GmlEncoder::new(RenderContext::default(), FeatureType::default());
        let document = encoder
            .encode(&VecFeatureSource::default())
            .expect("encoded");

        assert_eq!(
            document.markup,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" "#,
                r#"xmlns:gml="http://www.opengis.net/gml" xmlns:feature="http://www.opengis.net/feature">"#,
                r#"<gml:boundedBy><gml:null>unknown</gml:null></gml:boundedBy>"#,
                r#"</wfs:FeatureCollection>"#
            )
        );
    }

    #[test]
    fn failing_geometry_is_skipped_with_diagnostic() {
        let source = VecFeatureSource::new(vec![
            Feature::new("f.1", Point::new(0.0, 0.0)).with_attribute("n", 1i64),
            Feature::new("f.2", Point::new(f64::NAN, 5.0)).with_attribute("n", 2i64),
            Feature::new(
                "f.3",
                Polygon::from(LinearRing::new(vec![
                    Point::new(1.0, 1.0),
                    Point::new(4.0, 1.0),
                    Point::new(4.0, 3.0),
                ])),
            )
            .with_attribute("n", 3i64),
        ]);
        let encoder = GmlEncoder::new(RenderContext::default(), FeatureType::default());

        let document = encoder.encode(&source).expect("encoded");

        assert_eq!(document.markup.matches("<gml:featureMember>").count(), 3);
        assert_eq!(document.markup.matches("</feature:feature>").count(), 3);
        assert_eq!(document.markup.matches("<feature:the_geom>").count(), 2);
        assert!(document
            .markup
            .contains(r#"<feature:feature fid="f.2"><feature:n>2</feature:n></feature:feature>"#));
        assert!(document.markup.contains(">0,0 4,3</gml:coordinates></gml:Box>"));

        assert_eq!(document.diagnostics.len(), 1);
        let diagnostic = &document.diagnostics[0];
        assert_eq!(diagnostic.feature_id, "f.2");
        assert_eq!(diagnostic.stage, DiagnosticStage::Geometry);
    }

    fn assert_well_formed(markup: &str) {
        let mut reader = quick_xml::Reader::from_str(markup);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => {}
                Err(err) => panic!("ill-formed document: {err}"),
            }
        }
    }

    #[test]
    fn attribute_with_invalid_element_name_is_skipped() {
        let source = VecFeatureSource::new(vec![
            Feature::new("states.1", Point::new(1.0, 2.0))
                .with_attribute("STATE NAME", "Illinois")
                .with_attribute("STATE_ABBR", "IL")
                .with_attribute("1st", 1i64)
                .with_attribute("a:b", 2i64),
            Feature::new("states.2", Point::new(3.0, 4.0)).with_attribute("STATE_ABBR", "OH"),
        ]);
        let encoder = GmlEncoder::new(RenderContext::default(), states_type());

        let document = encoder.encode(&source).expect("encoded");

        assert_well_formed(&document.markup);
        assert!(!document.markup.contains("STATE NAME"));
        assert!(document
            .markup
            .contains("<topp:STATE_ABBR>IL</topp:STATE_ABBR>"));
        assert_eq!(document.markup.matches("<topp:the_geom>").count(), 2);

        let skipped: Vec<_> = document
            .diagnostics
            .iter()
            .map(|d| (d.feature_id.as_str(), d.stage))
            .collect();
        assert_eq!(
            skipped,
            vec![
                ("states.1", DiagnosticStage::Attribute),
                ("states.1", DiagnosticStage::Attribute),
                ("states.1", DiagnosticStage::Attribute),
            ]
        );
    }

    #[test]
    fn local_names() {
        assert!(is_local_name("STATE_NAME"));
        assert!(is_local_name("_id"));
        assert!(is_local_name("name-2.b"));
        assert!(is_local_name("название"));
        assert!(!is_local_name(""));
        assert!(!is_local_name("STATE NAME"));
        assert!(!is_local_name("2nd"));
        assert!(!is_local_name("a:b"));
        assert!(!is_local_name("a<b"));
    }

    #[test]
    fn source_error_releases_reader() {
        let closed = Arc::new(AtomicUsize::new(0));
        let source = FailingSource {
            features: vec![
                Feature::new("a", Point::new(0.0, 0.0)),
                Feature::new("b", Point::new(1.0, 1.0)),
            ],
            fail_after: Some(1),
            closed: closed.clone(),
        };
        let encoder = GmlEncoder::new(RenderContext::default(), FeatureType::default());

        assert_matches!(
            encoder.encode(&source),
            Err(RenderError::Source(SourceError::Read(_)))
        );
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn abort_check_stops_rendering() {
        let closed = Arc::new(AtomicUsize::new(0));
        let source = FailingSource {
            features: vec![Feature::new("a", Point::new(0.0, 0.0))],
            fail_after: None,
            closed: closed.clone(),
        };
        let checks = Arc::new(AtomicUsize::new(0));
        let counter = checks.clone();
        let encoder = GmlEncoder::new(RenderContext::default(), FeatureType::default())
            .with_abort_check(move || counter.fetch_add(1, Ordering::SeqCst) >= 1);

        assert_matches!(encoder.encode(&source), Err(RenderError::Aborted));
        assert_eq!(checks.load(Ordering::SeqCst), 2);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
