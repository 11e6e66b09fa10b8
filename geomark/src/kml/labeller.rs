use crate::error::LabelError;
use crate::feature::Feature;
use crate::style::{render_label, Rule, Symbolizer};

/// Source of the textual metadata of placemarks.
///
/// Failures are reported per feature and do not prevent the placemark from being written.
pub trait PlacemarkLabeller {
    /// Name of the placemark, `None` to write no name.
    fn name(&self, feature: &Feature, rules: &[&Rule]) -> Result<Option<String>, LabelError>;

    /// Description of the placemark, `None` to write no description.
    fn description(&self, feature: &Feature) -> Result<Option<String>, LabelError>;
}

/// Labeller that takes the name from the first text symbolizer of the applied rules and describes the feature with
/// an HTML table of its attributes.
#[derive(Debug, Clone, Copy)]
pub struct TemplateLabeller {
    describe: bool,
}

impl Default for TemplateLabeller {
    fn default() -> Self {
        Self { describe: true }
    }
}

impl TemplateLabeller {
    /// Creates a labeller that writes names and descriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a labeller that writes only names.
    pub fn without_description() -> Self {
        Self { describe: false }
    }
}

impl PlacemarkLabeller for TemplateLabeller {
    fn name(&self, feature: &Feature, rules: &[&Rule]) -> Result<Option<String>, LabelError> {
        let template = rules
            .iter()
            .flat_map(|rule| rule.symbolizers.iter())
            .find_map(|symbolizer| match symbolizer {
                Symbolizer::Text(text) => Some(&text.label),
                _ => None,
            });

        template
            .map(|template| render_label(template, feature))
            .transpose()
    }

    fn description(&self, feature: &Feature) -> Result<Option<String>, LabelError> {
        if !self.describe || feature.attributes.is_empty() {
            return Ok(None);
        }

        let mut table = String::from("<table>");
        for (name, value) in &feature.attributes {
            table.push_str(&format!("<tr><td>{name}</td><td>{value}</td></tr>"));
        }
        table.push_str("</table>");

        Ok(Some(table))
    }
}
