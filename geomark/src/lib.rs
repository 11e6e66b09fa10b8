//! Geomark writes geographic features as markup documents of two dialects:
//!
//! * tabular GML 2 [feature collections](gml::GmlEncoder), where every feature becomes an element with one child per
//!   attribute and one geometry property, and the bounding box of the whole collection is written in the header,
//! * styled KML [placemarks](kml::KmlEncoder), where every feature is drawn according to a [`Style`](style::Style).
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use geomark::feature::{Feature, FeatureType, VecFeatureSource};
//! use geomark::gml::GmlEncoder;
//! use geomark::kml::{KmlEncoder, TemplateLabeller};
//! use geomark::style::{Fill, PolygonSymbolizer, Rule, Style, StyleResolver, TextSymbolizer};
//! use geomark::{Color, RenderContext};
//! use geomark::geomark_types::Point;
//!
//! let source = VecFeatureSource::new(vec![
//!     Feature::new("cities.1", Point::new(37.62, 55.75)).with_attribute("NAME", "Moscow"),
//! ]);
//!
//! let document = GmlEncoder::new(RenderContext::default(), FeatureType::default())
//!     .encode(&source)
//!     .unwrap();
//! println!("{}", document.markup);
//!
//! let style = Style::new("cities", vec![Rule::new(
//!     "all",
//!     vec![
//!         PolygonSymbolizer::new(Fill::new(Color::BLUE)).into(),
//!         TextSymbolizer::new("{NAME}").into(),
//!     ],
//! )]);
//! let document = KmlEncoder::new(
//!     RenderContext::default(),
//!     Arc::new(style),
//!     StyleResolver::new(),
//!     TemplateLabeller::new(),
//! )
//! .encode(&source)
//! .unwrap();
//! println!("{}", document.markup);
//! ```
//!
//! Features are read from a [`FeatureSource`](feature::FeatureSource). A single broken feature does not fail the
//! whole rendering: it is skipped or partially written and reported in
//! [`EncodedDocument::diagnostics`](diagnostic::EncodedDocument::diagnostics).

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod color;
pub mod context;
pub mod diagnostic;
pub mod error;
pub mod feature;
pub mod gml;
pub mod kml;
pub mod markup;
pub mod style;

pub use color::Color;
pub use context::RenderContext;
pub use diagnostic::{Diagnostic, DiagnosticStage, EncodedDocument};
pub use feature::{AttributeValue, Feature, FeatureType};

// Reexport geomark_types
pub use geomark_types;
