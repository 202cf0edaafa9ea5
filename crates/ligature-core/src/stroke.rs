//! Stroke and line-style definitions.
//!
//! Exported types:
//! - [`StrokeDefinition`]: color, width, line style, cap and join of a connector stroke
//! - [`LineStyle`]: the dash pattern family (solid, dashed, dotted, dash-dot)
//! - [`StrokeCap`] / [`StrokeJoin`]: endpoint and corner rendering
//! - [`apply_stroke!`](crate::apply_stroke!): applies a stroke to an SVG element
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#000000"`, `0.5` |
//! | `width` | `stroke-width` | `2.0` |
//! | `style` | `stroke-dasharray` | `"10,5"`, `"10,5,2,5"` |
//! | `cap` | `stroke-linecap` | `"butt"`, `"round"`, `"square"` |
//! | `join` | `stroke-linejoin` | `"miter"`, `"round"`, `"bevel"` |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Dash pattern of a connector line.
///
/// Serialized with kebab-case names (`"dash-dot"`), matching connector data
/// stored by host documents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// 10px dash, 5px gap
    Dashed,
    /// 2px dot, 3px gap
    Dotted,
    /// 10px dash, 5px gap, 2px dot, 5px gap
    DashDot,
}

impl LineStyle {
    /// Returns the dash pattern for this style, or `None` for solid lines.
    ///
    /// ```
    /// use ligature_core::stroke::LineStyle;
    ///
    /// assert_eq!(LineStyle::Solid.dash_array(), None);
    /// assert_eq!(LineStyle::DashDot.dash_array(), Some(&[10.0, 5.0, 2.0, 5.0][..]));
    /// ```
    pub fn dash_array(self) -> Option<&'static [f32]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(&[10.0, 5.0]),
            Self::Dotted => Some(&[2.0, 3.0]),
            Self::DashDot => Some(&[10.0, 5.0, 2.0, 5.0]),
        }
    }

    /// Returns the SVG `stroke-dasharray` value for this style, or `None` for solid lines
    pub fn to_svg_value(self) -> Option<String> {
        self.dash_array().map(|pattern| {
            pattern
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::DashDot => "dash-dot",
        }
    }
}

/// Dash pattern lookup by line style.
pub fn stroke_dash_array(style: LineStyle) -> Option<&'static [f32]> {
    style.dash_array()
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "dash-dot" | "dashdot" => Ok(Self::DashDot),
            _ => Err(format!(
                "invalid line style `{s}`, valid values: solid, dashed, dotted, dash-dot"
            )),
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Defines how line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    /// Flat cap at the exact endpoint (SVG default)
    #[default]
    Butt,
    /// Rounded cap extending beyond the endpoint by half the stroke width
    Round,
    /// Square cap extending beyond the endpoint by half the stroke width
    Square,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Defines how line corners (joins) are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    /// Sharp corner with mitered point (SVG default)
    #[default]
    Miter,
    /// Rounded corner
    Round,
    /// Beveled (cut-off) corner
    Bevel,
}

impl StrokeJoin {
    /// Returns the SVG stroke-linejoin value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A stroke definition for rendering connector paths and marker outlines.
///
/// # Examples
///
/// ```
/// use ligature_core::{color::Color, stroke::{LineStyle, StrokeDefinition}};
///
/// let mut stroke = StrokeDefinition::new(Color::new("steelblue").unwrap(), 2.0);
/// stroke.set_style(LineStyle::Dashed);
/// assert_eq!(stroke.style().to_svg_value().as_deref(), Some("10,5"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: LineStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the line style.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// Returns the stroke cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Returns the stroke join style.
    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Sets the line style.
    pub fn set_style(&mut self, style: LineStyle) {
        self.style = style;
    }

    /// Sets the stroke cap style.
    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }

    /// Sets the stroke join style.
    pub fn set_join(&mut self, join: StrokeJoin) {
        self.join = join;
    }

    /// Returns a copy of this stroke with a different color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 2.0,
            style: LineStyle::default(),
            cap: StrokeCap::Round,
            join: StrokeJoin::Round,
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// ```
/// use ligature_core::{color::Color, stroke::StrokeDefinition};
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::new(Color::new("black").unwrap(), 2.0);
/// let path = svg_element::Path::new().set("d", "M 0 0 L 10 0");
/// let path = ligature_core::apply_stroke!(path, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
            .set("stroke-linejoin", $stroke.join().to_svg_value());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
