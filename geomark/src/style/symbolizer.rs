use serde::{Deserialize, Serialize};

use crate::Color;

/// Drawing directive of a style rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbolizer {
    /// Draws points with an icon or a mark.
    Point(PointSymbolizer),
    /// Draws lines.
    Line(LineSymbolizer),
    /// Draws filled areas.
    Polygon(PolygonSymbolizer),
    /// Draws a text label.
    Text(TextSymbolizer),
}

impl From<PointSymbolizer> for Symbolizer {
    fn from(value: PointSymbolizer) -> Self {
        Self::Point(value)
    }
}

impl From<LineSymbolizer> for Symbolizer {
    fn from(value: LineSymbolizer) -> Self {
        Self::Line(value)
    }
}

impl From<PolygonSymbolizer> for Symbolizer {
    fn from(value: PolygonSymbolizer) -> Self {
        Self::Polygon(value)
    }
}

impl From<TextSymbolizer> for Symbolizer {
    fn from(value: TextSymbolizer) -> Self {
        Self::Text(value)
    }
}

/// Color with an opacity.
///
/// The alpha channel of `color` is not used, `opacity` replaces it. Missing opacity means fully opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Fill color.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl Fill {
    /// Creates an opaque fill.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: None,
        }
    }

    /// Sets the opacity of the fill.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..self
        }
    }

    /// Color with the opacity applied.
    pub fn effective_color(&self) -> Color {
        apply_opacity(self.color, self.opacity)
    }
}

/// Line drawing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    #[serde(default)]
    pub opacity: Option<f64>,
    /// Width of the line in pixels.
    #[serde(default)]
    pub width: Option<f64>,
}

impl Stroke {
    /// Creates an opaque stroke of the default width.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: None,
            width: None,
        }
    }

    /// Sets the line width.
    pub fn with_width(self, width: f64) -> Self {
        Self {
            width: Some(width),
            ..self
        }
    }

    /// Sets the opacity of the stroke.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..self
        }
    }

    /// Color with the opacity applied.
    pub fn effective_color(&self) -> Color {
        apply_opacity(self.color, self.opacity)
    }
}

fn apply_opacity(color: Color, opacity: Option<f64>) -> Color {
    Color::from_rgb_opacity(
        color.r() as i32,
        color.g() as i32,
        color.b() as i32,
        opacity.unwrap_or(1.0),
    )
}

/// Image used to draw a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Graphic {
    /// Icon loaded from the given URL.
    ExternalIcon {
        /// Location of the icon.
        href: String,
    },
    /// Well known shape, e.g. `circle` or `square`.
    Mark {
        /// Name of the shape.
        well_known_name: String,
    },
}

impl Default for Graphic {
    fn default() -> Self {
        Self::Mark {
            well_known_name: "square".into(),
        }
    }
}

/// Symbolizer for point geometries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSymbolizer {
    /// Icon or mark.
    #[serde(default)]
    pub graphic: Graphic,
    /// Color of a mark.
    #[serde(default)]
    pub fill: Option<Fill>,
    /// Opacity of the graphic in `[0, 1]`.
    #[serde(default)]
    pub opacity: Option<f64>,
    /// Size of the graphic in pixels.
    #[serde(default)]
    pub size: Option<f64>,
}

impl PointSymbolizer {
    /// Creates a symbolizer that draws points with an external icon.
    pub fn icon(href: impl Into<String>) -> Self {
        Self {
            graphic: Graphic::ExternalIcon { href: href.into() },
            ..Default::default()
        }
    }

    /// Creates a symbolizer that draws points with a well known mark.
    pub fn mark(well_known_name: impl Into<String>, fill: Fill) -> Self {
        Self {
            graphic: Graphic::Mark {
                well_known_name: well_known_name.into(),
            },
            fill: Some(fill),
            ..Default::default()
        }
    }

    /// Sets the size of the graphic.
    pub fn with_size(self, size: f64) -> Self {
        Self {
            size: Some(size),
            ..self
        }
    }
}

/// Symbolizer for line geometries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSymbolizer {
    /// Line parameters.
    #[serde(default)]
    pub stroke: Option<Stroke>,
}

impl LineSymbolizer {
    /// Creates a new line symbolizer.
    pub fn new(stroke: Stroke) -> Self {
        Self {
            stroke: Some(stroke),
        }
    }
}

/// Symbolizer for polygon geometries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSymbolizer {
    /// Area fill.
    #[serde(default)]
    pub fill: Option<Fill>,
    /// Outline.
    #[serde(default)]
    pub stroke: Option<Stroke>,
}

impl PolygonSymbolizer {
    /// Creates a symbolizer with a fill and no outline.
    pub fn new(fill: Fill) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
        }
    }

    /// Sets the outline.
    pub fn with_stroke(self, stroke: Stroke) -> Self {
        Self {
            stroke: Some(stroke),
            ..self
        }
    }
}

/// Symbolizer for text labels.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSymbolizer {
    /// Label template. Attribute names in braces are replaced by their values, e.g. `{NAME}`.
    pub label: String,
    /// Text color.
    #[serde(default)]
    pub fill: Option<Fill>,
}

impl TextSymbolizer {
    /// Creates a new text symbolizer.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fill: None,
        }
    }
}
