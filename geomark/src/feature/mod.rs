//! Features are the records being encoded: an id, a set of named attributes and a geometry.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use geomark_types::Geometry;
use serde::{Deserialize, Serialize};
use strfmt::DisplayStr;

#[cfg(feature = "geojson")]
mod geojson;
pub mod source;

pub use source::{FeatureReader, FeatureSource, OpenReader, VecFeatureSource};

/// A geographic object with attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Identifier, unique within one rendering call.
    pub id: String,
    /// Named attribute values. Attributes are written in the order of their names.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Default geometry of the feature.
    pub geometry: Geometry,
}

impl Feature {
    /// Creates a feature without attributes.
    pub fn new(id: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            geometry: geometry.into(),
        }
    }

    /// Adds an attribute to the feature.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Value of the attribute, if the feature has it.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int64(i64),
    /// Floating point value.
    Double(f64),
    /// Text value.
    String(String),
    /// Missing value.
    Null,
}

impl AttributeValue {
    /// Returns true if the value is [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Compares the value with its string representation.
    pub fn eq_str(&self, str_value: &str) -> bool {
        match &self {
            AttributeValue::String(s) => s == str_value,
            AttributeValue::Double(v) => str_value.parse::<f64>() == Ok(*v),
            AttributeValue::Int64(v) => str_value.parse::<i64>() == Ok(*v),
            AttributeValue::Bool(v) => str_value.parse::<bool>() == Ok(*v),
            AttributeValue::Null => false,
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::String(v) => write!(f, "{v}"),
            AttributeValue::Double(v) => write!(f, "{v}"),
            AttributeValue::Int64(v) => write!(f, "{v}"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Null => Ok(()),
        }
    }
}

impl DisplayStr for AttributeValue {
    fn display_str(&self, f: &mut strfmt::Formatter) -> strfmt::Result<()> {
        f.str(&self.to_string())?;
        Ok(())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Names used for features of one type in the tabular (GML) output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureType {
    /// Namespace prefix of the feature elements.
    pub prefix: String,
    /// Namespace URI bound to the prefix.
    pub namespace_uri: String,
    /// Local name of the feature element.
    pub type_name: String,
    /// Local name of the geometry property element.
    pub geometry_name: String,
    /// Value of the `srsName` attribute of geometry elements, if any.
    pub srs_name: Option<String>,
}

impl Default for FeatureType {
    fn default() -> Self {
        Self {
            prefix: "feature".into(),
            namespace_uri: "http://www.opengis.net/feature".into(),
            type_name: "feature".into(),
            geometry_name: "the_geom".into(),
            srs_name: None,
        }
    }
}

impl FeatureType {
    /// Creates a feature type in the given namespace.
    pub fn new(
        prefix: impl Into<String>,
        namespace_uri: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Creates a copy with the given geometry property name.
    pub fn with_geometry_name(&self, geometry_name: impl Into<String>) -> Self {
        Self {
            geometry_name: geometry_name.into(),
            ..self.clone()
        }
    }

    /// Creates a copy with the given `srsName`.
    pub fn with_srs_name(&self, srs_name: impl Into<String>) -> Self {
        Self {
            srs_name: Some(srs_name.into()),
            ..self.clone()
        }
    }

    /// Qualified name of an element in the feature namespace.
    pub fn qualified(&self, local_name: &str) -> String {
        format!("{}:{}", self.prefix, local_name)
    }
}
