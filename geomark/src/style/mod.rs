//! Styles select how a feature is drawn in the placemark (KML) output.
//!
//! A [`Style`] is an ordered list of [`Rule`]s. Each rule carries a scale window, an optional filter and a list of
//! [`Symbolizer`]s. The [`StyleResolver`] picks the rules that apply to a feature and the [`SymbolizerMapper`] turns
//! their symbolizers into dialect-agnostic [`DrawingInstruction`]s.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::feature::Feature;

mod mapper;
mod resolve;
pub mod scale;
mod symbolizer;

pub use mapper::{
    render_label, DrawingInstruction, IconStyle, LabelStyle, LineStyle, Outline, PlacemarkStyle,
    PolyStyle, SymbolizerMapper, CENTROID_ICON_HREF, DEFAULT_ICON_HREF, DEFAULT_ICON_SIZE,
    DEFAULT_STROKE_WIDTH,
};
pub use resolve::{StyleResolver, SCALE_TOLERANCE};
pub use symbolizer::{
    Fill, Graphic, LineSymbolizer, PointSymbolizer, PolygonSymbolizer, Stroke, Symbolizer,
    TextSymbolizer,
};

/// Named list of rules.
///
/// Styles are not changed once built. Share them between encoders with `Arc<Style>`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Style {
    /// Name of the style.
    #[serde(default)]
    pub name: String,
    /// Rules in the order of declaration.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Style {
    /// Creates a new style.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

/// Predicate over features, evaluated by a [`Rule`].
pub trait FeatureFilter: Send + Sync {
    /// Returns true if the feature passes the filter.
    fn matches(&self, feature: &Feature) -> bool;
}

impl<F> FeatureFilter for F
where
    F: Fn(&Feature) -> bool + Send + Sync,
{
    fn matches(&self, feature: &Feature) -> bool {
        self(feature)
    }
}

/// Filter shared between clones of a rule.
#[derive(Clone)]
pub struct SharedFilter(Arc<dyn FeatureFilter>);

impl SharedFilter {
    /// Wraps a filter.
    pub fn new(filter: impl FeatureFilter + 'static) -> Self {
        Self(Arc::new(filter))
    }

    /// Evaluates the filter.
    pub fn matches(&self, feature: &Feature) -> bool {
        self.0.matches(feature)
    }
}

impl Debug for SharedFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedFilter")
    }
}

/// A rule that specifies which features are drawn with the given symbolizers.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Name of the rule.
    #[serde(default)]
    pub name: String,
    /// Opaque filter. Not serialized.
    #[serde(skip)]
    pub filter: Option<SharedFilter>,
    /// Specifies a set of attributes of a feature that must have the given values for this rule to be applied.
    #[serde(default)]
    pub properties: HashMap<String, String>,
    /// Smallest scale denominator the rule is used at. Unbounded if not set.
    #[serde(default)]
    pub min_scale_denominator: Option<f64>,
    /// Scale denominator starting from which the rule is not used any more. Unbounded if not set.
    #[serde(default)]
    pub max_scale_denominator: Option<f64>,
    /// Rule used only when no other rule of the style applies.
    #[serde(default)]
    pub is_else: bool,
    /// Symbolizers in the order of declaration.
    #[serde(default)]
    pub symbolizers: Vec<Symbolizer>,
}

impl Rule {
    /// Creates a rule that applies to every feature at every scale.
    pub fn new(name: impl Into<String>, symbolizers: Vec<Symbolizer>) -> Self {
        Self {
            name: name.into(),
            symbolizers,
            ..Default::default()
        }
    }

    /// Creates an else rule.
    pub fn new_else(name: impl Into<String>, symbolizers: Vec<Symbolizer>) -> Self {
        Self {
            is_else: true,
            ..Self::new(name, symbolizers)
        }
    }

    /// Sets the opaque filter of the rule.
    pub fn with_filter(mut self, filter: impl FeatureFilter + 'static) -> Self {
        self.filter = Some(SharedFilter::new(filter));
        self
    }

    /// Adds an attribute value the feature must have.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Sets the scale window `[min, max)` of the rule.
    pub fn with_scale_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_scale_denominator = min;
        self.max_scale_denominator = max;
        self
    }

    /// Lower bound of the scale window, `-inf` if unbounded.
    pub fn min_scale(&self) -> f64 {
        self.min_scale_denominator.unwrap_or(f64::NEG_INFINITY)
    }

    /// Upper bound of the scale window, `+inf` if unbounded.
    pub fn max_scale(&self) -> f64 {
        self.max_scale_denominator.unwrap_or(f64::INFINITY)
    }

    /// Returns true if the feature passes both the property filter and the opaque filter of the rule.
    ///
    /// Scale window is not checked here.
    pub fn matches(&self, feature: &Feature) -> bool {
        let properties_match = self.properties.iter().all(|(key, value)| {
            feature
                .attribute(key)
                .map(|v| v.eq_str(value))
                .unwrap_or(false)
        });

        properties_match
            && self
                .filter
                .as_ref()
                .map(|filter| filter.matches(feature))
                .unwrap_or(true)
    }
}
