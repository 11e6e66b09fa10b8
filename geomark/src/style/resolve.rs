use crate::feature::Feature;
use crate::style::Rule;

/// Tolerance of the lower scale window bound.
pub const SCALE_TOLERANCE: f64 = 1e-6;

/// Selects the rules of a style that apply to a feature at a scale.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver {
    tolerance: f64,
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self {
            tolerance: SCALE_TOLERANCE,
        }
    }
}

impl StyleResolver {
    /// Creates a resolver with the default scale tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rules applicable to the feature, in the order of declaration.
    ///
    /// A rule applies if the scale lies in `[min - tolerance, max)` of the rule and the feature matches its filters.
    /// The upper bound is exclusive regardless of the tolerance. Filters of rules outside of the scale window are not evaluated. Else rules are returned only if
    /// no other rule applies.
    pub fn resolve<'a>(
        &self,
        feature: &Feature,
        rules: &'a [Rule],
        scale_denominator: f64,
    ) -> Vec<&'a Rule> {
        let mut matched = Vec::new();
        let mut else_rules = Vec::new();

        for rule in rules {
            if rule.is_else {
                else_rules.push(rule);
                continue;
            }

            if !self.in_scale(rule, scale_denominator) {
                continue;
            }

            if rule.matches(feature) {
                matched.push(rule);
            }
        }

        if matched.is_empty() {
            else_rules
        } else {
            matched
        }
    }

    fn in_scale(&self, rule: &Rule, scale_denominator: f64) -> bool {
        rule.min_scale() - self.tolerance <= scale_denominator
            && scale_denominator < rule.max_scale()
    }
}
