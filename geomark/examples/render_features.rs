//! This example converts a GeoJSON file into a GML feature collection or a styled KML document.
//!
//! Run it with the output dialect, path to a `.geojson` file and, for KML, an optional style file in JSON:
//!
//! ```shell
//! cargo run --example render_features --features geojson -- gml ./geomark/examples/data/states.geojson
//! cargo run --example render_features --features geojson -- kml ./geomark/examples/data/states.geojson ./geomark/examples/data/states_style.json
//! ```
//!
//! The scale used to select style rules is computed as if the whole data set was drawn on a 1024 pixels wide image.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use geojson::{FeatureCollection, GeoJson};
use geomark::feature::{FeatureType, VecFeatureSource};
use geomark::geomark_types::envelope::Envelope;
use geomark::gml::GmlEncoder;
use geomark::kml::{KmlEncoder, TemplateLabeller};
use geomark::style::scale::scale_denominator;
use geomark::style::{
    Fill, LineSymbolizer, PointSymbolizer, PolygonSymbolizer, Rule, Stroke, Style, StyleResolver,
    TextSymbolizer,
};
use geomark::{Color, RenderContext};

const IMAGE_WIDTH: u32 = 1024;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dialect, file_name) = match args.as_slice() {
        [dialect, file_name, ..] => (dialect.as_str(), file_name),
        _ => {
            return Err(anyhow!(
                "This example must be run with at least two arguments - output dialect (gml or kml) and name of the .geojson file to load"
            ))
        }
    };

    let json = std::fs::read_to_string(file_name)?;
    let collection = FeatureCollection::try_from(json.parse::<GeoJson>()?)?;
    let source = VecFeatureSource::from_geojson(&collection, "feature");

    let mut envelope = Envelope::empty();
    for feature in source.features() {
        envelope.expand(&feature.geometry);
    }
    let scale = envelope
        .rect()
        .and_then(|rect| scale_denominator(&rect, IMAGE_WIDTH, true))
        .unwrap_or(1.0);
    log::info!(
        "Loaded {} features, rendering at scale 1:{scale:.0}",
        source.features().len()
    );

    let context = RenderContext::default()
        .with_verbose(true)
        .with_scale_denominator(scale);

    let document = match dialect {
        "gml" => GmlEncoder::new(
            context,
            FeatureType::default().with_srs_name("EPSG:4326"),
        )
        .encode(&source)?,
        "kml" => {
            let style = match args.get(2) {
                Some(style_file) => serde_json::from_str(&std::fs::read_to_string(style_file)?)?,
                None => default_style(),
            };

            KmlEncoder::new(
                context,
                Arc::new(style),
                StyleResolver::new(),
                TemplateLabeller::new(),
            )
            .encode(&source)?
        }
        other => return Err(anyhow!("Unknown output dialect: {other}")),
    };

    if !document.diagnostics.is_empty() {
        log::warn!("{} features were not fully rendered", document.diagnostics.len());
    }
    println!("{}", document.markup);

    Ok(())
}

fn default_style() -> Style {
    Style::new(
        "default",
        vec![Rule::new(
            "all",
            vec![
                PointSymbolizer::mark("circle", Fill::new(Color::RED)).into(),
                LineSymbolizer::new(Stroke::new(Color::BLUE).with_width(2.0)).into(),
                PolygonSymbolizer::new(Fill::new(Color::GREEN).with_opacity(0.5))
                    .with_stroke(Stroke::new(Color::BLACK))
                    .into(),
                TextSymbolizer::new("{name}").into(),
            ],
        )],
    )
}
