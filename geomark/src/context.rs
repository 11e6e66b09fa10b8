//! See [`RenderContext`].

use serde::{Deserialize, Serialize};

/// Configuration of a single rendering call.
///
/// A context is created for each call and is not changed while the call runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    /// Pretty-print the output with indentation.
    pub verbose: bool,
    /// Decimal separator of numbers.
    pub decimal: char,
    /// Separator between coordinates of a single tuple.
    pub coordinate_separator: String,
    /// Separator between tuples.
    pub tuple_separator: String,
    /// Maximum number of digits after the decimal separator.
    pub num_decimals: usize,
    /// Scale denominator of the rendered map, used to select style rules.
    pub scale_denominator: f64,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            verbose: false,
            decimal: '.',
            coordinate_separator: ",".into(),
            tuple_separator: " ".into(),
            num_decimals: 6,
            scale_denominator: 1.0,
        }
    }
}

impl RenderContext {
    /// Creates a copy of the context with pretty-printing switched on or off.
    pub fn with_verbose(&self, verbose: bool) -> Self {
        Self {
            verbose,
            ..self.clone()
        }
    }

    /// Creates a copy of the context with the given coordinate and tuple separators.
    pub fn with_separators(
        &self,
        coordinate_separator: impl Into<String>,
        tuple_separator: impl Into<String>,
    ) -> Self {
        Self {
            coordinate_separator: coordinate_separator.into(),
            tuple_separator: tuple_separator.into(),
            ..self.clone()
        }
    }

    /// Creates a copy of the context with the given decimal separator.
    pub fn with_decimal(&self, decimal: char) -> Self {
        Self {
            decimal,
            ..self.clone()
        }
    }

    /// Creates a copy of the context with the given number of decimal places.
    pub fn with_num_decimals(&self, num_decimals: usize) -> Self {
        Self {
            num_decimals,
            ..self.clone()
        }
    }

    /// Creates a copy of the context with the given scale denominator.
    pub fn with_scale_denominator(&self, scale_denominator: f64) -> Self {
        Self {
            scale_denominator,
            ..self.clone()
        }
    }

    /// Formats a number, rounding it to `num_decimals` digits and dropping trailing zeros.
    pub fn format_number(&self, value: f64) -> String {
        let factor = 10f64.powi(self.num_decimals.min(15) as i32);
        let mut rounded = (value * factor).round() / factor;
        if !rounded.is_finite() {
            rounded = value;
        }
        if rounded == 0.0 {
            // Avoids printing "-0".
            rounded = 0.0;
        }

        let formatted = rounded.to_string();
        if self.decimal == '.' {
            formatted
        } else {
            formatted.replace('.', &self.decimal.to_string())
        }
    }
}
