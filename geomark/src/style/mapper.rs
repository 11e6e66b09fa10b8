use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::LabelError;
use crate::feature::Feature;
use crate::style::{Fill, Graphic, Stroke, Symbolizer};
use crate::Color;

/// Icon used for points drawn with a mark or without any point symbolizer.
pub const DEFAULT_ICON_HREF: &str = "http://maps.google.com/mapfiles/kml/pal4/icon57.png";
/// Icon used for the marker point placed at the centroid of non-point geometries.
pub const CENTROID_ICON_HREF: &str = "http://maps.google.com/mapfiles/kml/pal4/icon25.png";
/// Size of a point graphic that corresponds to the icon scale of 1.
pub const DEFAULT_ICON_SIZE: f64 = 16.0;
/// Line width used when a stroke has none.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

lazy_static! {
    static ref DEFAULT_FILL: Fill = Fill::new(Color::MEDIUM_GRAY);
    static ref DEFAULT_STROKE: Stroke = Stroke::new(Color::BLACK).with_width(DEFAULT_STROKE_WIDTH);
    static ref DEFAULT_ICON: IconStyle = IconStyle {
        href: DEFAULT_ICON_HREF.to_string(),
        color: Color::WHITE,
        scale: 1.0,
    };
    static ref CENTROID_ICON: IconStyle = IconStyle {
        href: CENTROID_ICON_HREF.to_string(),
        color: Color::WHITE,
        scale: 0.4,
    };
}

/// Drawing parameters of one symbolizer, independent of the output dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingInstruction {
    /// Draw points with an icon.
    Icon {
        /// Location of the icon image.
        href: String,
        /// Tint of the icon.
        color: Color,
        /// Icon size relative to its natural size.
        scale: f64,
    },
    /// Draw lines.
    Line {
        /// Line color.
        color: Color,
        /// Line width in pixels.
        width: f64,
    },
    /// Fill areas.
    Area {
        /// Fill color.
        fill: Color,
        /// Outline, if the area has one.
        outline: Option<Outline>,
    },
    /// Draw a text label.
    Label {
        /// Label text, `None` if the template could not be evaluated for the feature.
        text: Option<String>,
        /// Text color.
        color: Color,
    },
}

/// Outline of an area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
}

impl From<&Stroke> for Outline {
    fn from(stroke: &Stroke) -> Self {
        Self {
            color: stroke.effective_color(),
            width: stroke.width.unwrap_or(DEFAULT_STROKE_WIDTH),
        }
    }
}

/// Converts symbolizers into [`DrawingInstruction`]s.
///
/// Missing fills and strokes are replaced by defaults: `#808080` fill, black stroke of width 1, black text.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolizerMapper;

impl SymbolizerMapper {
    /// Maps a symbolizer for the given feature. Never fails.
    pub fn map(&self, symbolizer: &Symbolizer, feature: &Feature) -> DrawingInstruction {
        match symbolizer {
            Symbolizer::Point(point) => {
                let (href, default_color) = match &point.graphic {
                    Graphic::ExternalIcon { href } => (href.clone(), Color::WHITE),
                    Graphic::Mark { .. } => (DEFAULT_ICON_HREF.to_string(), DEFAULT_FILL.color),
                };
                let base = point
                    .fill
                    .as_ref()
                    .map(Fill::effective_color)
                    .unwrap_or(default_color);
                let color = match point.opacity {
                    Some(opacity) => Color::from_rgb_opacity(
                        base.r() as i32,
                        base.g() as i32,
                        base.b() as i32,
                        opacity,
                    ),
                    None => base,
                };

                DrawingInstruction::Icon {
                    href,
                    color,
                    scale: point.size.unwrap_or(DEFAULT_ICON_SIZE) / DEFAULT_ICON_SIZE,
                }
            }
            Symbolizer::Line(line) => {
                let outline = Outline::from(line.stroke.as_ref().unwrap_or(&*DEFAULT_STROKE));
                DrawingInstruction::Line {
                    color: outline.color,
                    width: outline.width,
                }
            }
            Symbolizer::Polygon(polygon) => DrawingInstruction::Area {
                fill: polygon
                    .fill
                    .as_ref()
                    .unwrap_or(&*DEFAULT_FILL)
                    .effective_color(),
                outline: polygon.stroke.as_ref().map(Outline::from),
            },
            Symbolizer::Text(text) => DrawingInstruction::Label {
                text: match render_label(&text.label, feature) {
                    Ok(text) => Some(text),
                    Err(err) => {
                        log::debug!("Label of feature {} is not available: {err}", feature.id);
                        None
                    }
                },
                color: text
                    .fill
                    .as_ref()
                    .map(Fill::effective_color)
                    .unwrap_or(Color::BLACK),
            },
        }
    }

    /// Maps all symbolizers of the rules, in order.
    pub fn map_all<'a>(
        &self,
        symbolizers: impl IntoIterator<Item = &'a Symbolizer>,
        feature: &Feature,
    ) -> Vec<DrawingInstruction> {
        symbolizers
            .into_iter()
            .map(|symbolizer| self.map(symbolizer, feature))
            .collect()
    }
}

/// Fills a label template with the attribute values of the feature.
///
/// Attribute names are put in braces: `"{NAME} ({POP})"`. Null attributes are substituted with an empty string.
/// Referencing an attribute the feature does not have is an error.
pub fn render_label(template: &str, feature: &Feature) -> Result<String, LabelError> {
    let vars: HashMap<String, _> = feature
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    strfmt::strfmt(template, &vars).map_err(|err| LabelError(err.to_string()))
}

/// Icon style of a placemark.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    /// Location of the icon image.
    pub href: String,
    /// Tint of the icon.
    pub color: Color,
    /// Icon size relative to its natural size.
    pub scale: f64,
}

impl IconStyle {
    /// Icon used for points without a point symbolizer.
    pub fn default_point() -> Self {
        DEFAULT_ICON.clone()
    }

    /// Icon of the marker point at the centroid of a non-point geometry.
    pub fn centroid_marker() -> Self {
        CENTROID_ICON.clone()
    }
}

/// Line style of a placemark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
}

/// Polygon style of a placemark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyStyle {
    /// Fill color.
    pub color: Color,
    /// Draw the outline with the line style.
    pub outline: bool,
}

/// Label style of a placemark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Text color.
    pub color: Color,
}

/// Drawing instructions merged into at most one style of each kind.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlacemarkStyle {
    /// Icon style.
    pub icon: Option<IconStyle>,
    /// Line style.
    pub line: Option<LineStyle>,
    /// Polygon style.
    pub poly: Option<PolyStyle>,
    /// Label style.
    pub label: Option<LabelStyle>,
}

impl PlacemarkStyle {
    /// Merges the instructions. Later instructions override earlier ones of the same kind.
    pub fn from_instructions<'a>(
        instructions: impl IntoIterator<Item = &'a DrawingInstruction>,
    ) -> Self {
        let mut style = Self::default();
        for instruction in instructions {
            match instruction {
                DrawingInstruction::Icon { href, color, scale } => {
                    style.icon = Some(IconStyle {
                        href: href.clone(),
                        color: *color,
                        scale: *scale,
                    });
                }
                DrawingInstruction::Line { color, width } => {
                    style.line = Some(LineStyle {
                        color: *color,
                        width: *width,
                    });
                }
                DrawingInstruction::Area { fill, outline } => {
                    style.poly = Some(PolyStyle {
                        color: *fill,
                        outline: outline.is_some(),
                    });
                    if let Some(outline) = outline {
                        style.line = Some(LineStyle {
                            color: outline.color,
                            width: outline.width,
                        });
                    }
                }
                DrawingInstruction::Label { color, .. } => {
                    style.label = Some(LabelStyle { color: *color });
                }
            }
        }

        style
    }

    /// Returns true if no style of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.icon.is_none() && self.line.is_none() && self.poly.is_none() && self.label.is_none()
    }
}
