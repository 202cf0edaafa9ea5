//! Configuration types for connector routing, the draw tool and SVG export.
//!
//! All types implement [`serde::Deserialize`] and fall back to their defaults
//! for every missing field, so a configuration file only needs to list what
//! it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`RoutingConfig`] - Default routing options of connectors built from scene documents.
//! - [`DrawToolConfig`] - Behavior and styling of the [`OrthogonalDrawTool`](crate::tool::OrthogonalDrawTool).
//! - [`StyleConfig`] - Colors and margins used by the SVG exporter.
//!
//! # Example
//!
//! ```
//! # use ligature::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [draw_tool]
//!     snap_to_grid = true
//!     grid_size = 10
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.draw_tool().snap_to_grid());
//! assert_eq!(config.draw_tool().grid_size(), 10.0);
//! assert_eq!(config.routing().curvature(), 0.5);
//! ```

use serde::Deserialize;

use ligature_core::{
    color::Color,
    marker::{DEFAULT_MARKER_SIZE, MarkerKind},
    port::DEFAULT_PORT_SNAP_DISTANCE,
    route::DEFAULT_CURVATURE,
    stroke::{LineStyle, StrokeDefinition},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Routing configuration section.
    #[serde(default)]
    routing: RoutingConfig,

    /// Draw tool configuration section.
    #[serde(default)]
    draw_tool: DrawToolConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its three sections.
    pub fn new(routing: RoutingConfig, draw_tool: DrawToolConfig, style: StyleConfig) -> Self {
        Self {
            routing,
            draw_tool,
            style,
        }
    }

    /// Returns the routing configuration.
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Returns the draw tool configuration.
    pub fn draw_tool(&self) -> &DrawToolConfig {
        &self.draw_tool
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Default routing options for connectors that do not set their own.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    curvature: f32,
    smooth_corners: bool,
    corner_radius: f32,
    avoid_obstacles: bool,
    /// Maximum distance at which a free endpoint snaps to a shape port.
    port_snap_distance: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            curvature: DEFAULT_CURVATURE,
            smooth_corners: false,
            corner_radius: 10.0,
            avoid_obstacles: false,
            port_snap_distance: DEFAULT_PORT_SNAP_DISTANCE,
        }
    }
}

impl RoutingConfig {
    pub fn curvature(&self) -> f32 {
        self.curvature
    }

    pub fn smooth_corners(&self) -> bool {
        self.smooth_corners
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn avoid_obstacles(&self) -> bool {
        self.avoid_obstacles
    }

    pub fn port_snap_distance(&self) -> f32 {
        self.port_snap_distance
    }
}

/// Behavior and styling of the interactive orthogonal draw tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawToolConfig {
    snap_to_grid: bool,
    grid_size: f32,
    smooth_corners: bool,
    corner_radius: f32,
    start_marker: MarkerKind,
    end_marker: MarkerKind,
    marker_size: f32,
    line_style: LineStyle,
    stroke_width: f32,
    /// Color of the finished line, as a color string.
    stroke_color: String,
    /// Color of the live preview, as a color string.
    preview_color: String,
    /// Radius of the handles drawn at placed points.
    handle_radius: f32,
}

impl Default for DrawToolConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 20.0,
            smooth_corners: false,
            corner_radius: 10.0,
            start_marker: MarkerKind::None,
            end_marker: MarkerKind::Arrow,
            marker_size: DEFAULT_MARKER_SIZE,
            line_style: LineStyle::Solid,
            stroke_width: 2.0,
            stroke_color: "#1f2937".to_string(),
            preview_color: "#3b82f6".to_string(),
            handle_radius: 4.0,
        }
    }
}

impl DrawToolConfig {
    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    pub fn smooth_corners(&self) -> bool {
        self.smooth_corners
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn start_marker(&self) -> MarkerKind {
        self.start_marker
    }

    pub fn end_marker(&self) -> MarkerKind {
        self.end_marker
    }

    pub fn marker_size(&self) -> f32 {
        self.marker_size
    }

    pub fn handle_radius(&self) -> f32 {
        self.handle_radius
    }

    /// Enables or disables grid snapping.
    pub fn set_snap_to_grid(&mut self, snap: bool, grid_size: f32) {
        self.snap_to_grid = snap;
        self.grid_size = grid_size;
    }

    /// Enables or disables corner smoothing.
    pub fn set_smooth_corners(&mut self, smooth: bool, corner_radius: f32) {
        self.smooth_corners = smooth;
        self.corner_radius = corner_radius;
    }

    /// Sets the marker kinds attached to finished lines.
    pub fn set_markers(&mut self, start: MarkerKind, end: MarkerKind) {
        self.start_marker = start;
        self.end_marker = end;
    }

    /// Stroke of a finished line.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured stroke color cannot be parsed.
    pub fn stroke(&self) -> Result<StrokeDefinition, String> {
        let color = Color::new(&self.stroke_color)
            .map_err(|err| format!("Invalid draw tool stroke color in config: {err}"))?;
        let mut stroke = StrokeDefinition::new(color, self.stroke_width);
        stroke.set_style(self.line_style);
        Ok(stroke)
    }

    /// Color of the live preview.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured preview color cannot be parsed.
    pub fn preview_color(&self) -> Result<Color, String> {
        Color::new(&self.preview_color)
            .map_err(|err| format!("Invalid draw tool preview color in config: {err}"))
    }
}

/// Visual styling configuration for exported SVG documents.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color of the document, as a color string.
    background_color: Option<String>,
    /// Fill color of shapes, as a color string.
    shape_fill: String,
    /// Outline color of shapes, as a color string.
    shape_stroke: String,
    /// Margin around the scene content.
    margin: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            shape_fill: "#f8fafc".to_string(),
            shape_stroke: "#334155".to_string(),
            margin: 50.0,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed shape fill [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn shape_fill(&self) -> Result<Color, String> {
        Color::new(&self.shape_fill).map_err(|err| format!("Invalid shape fill in config: {err}"))
    }

    /// Returns the parsed shape outline [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn shape_stroke(&self) -> Result<Color, String> {
        Color::new(&self.shape_stroke)
            .map_err(|err| format!("Invalid shape stroke in config: {err}"))
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.routing().curvature(), 0.5);
        assert_eq!(config.routing().port_snap_distance(), 30.0);
        assert!(!config.draw_tool().snap_to_grid());
        assert_eq!(config.draw_tool().end_marker(), MarkerKind::Arrow);
        assert!(config.draw_tool().preview_color().is_ok());
        assert!(config.draw_tool().stroke().is_ok());
        assert_eq!(config.style().background_color(), Ok(None));
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [routing]
            avoid_obstacles = true

            [draw_tool]
            start_marker = "diamond"
            end_marker = "open-arrow"
            line_style = "dash-dot"

            [style]
            background_color = "white"
            "#,
        )
        .unwrap();

        assert!(config.routing().avoid_obstacles());
        assert_eq!(config.routing().corner_radius(), 10.0);
        assert_eq!(config.draw_tool().start_marker(), MarkerKind::Diamond);
        assert_eq!(config.draw_tool().end_marker(), MarkerKind::OpenArrow);
        assert_eq!(
            config.draw_tool().stroke().unwrap().style(),
            LineStyle::DashDot
        );
        assert!(config.style().background_color().unwrap().is_some());
    }

    #[test]
    fn test_invalid_color_is_reported_on_access() {
        let config: AppConfig = toml::from_str(
            r#"
            [draw_tool]
            preview_color = "not-a-color"
            "#,
        )
        .unwrap();

        let err = config.draw_tool().preview_color().unwrap_err();
        assert!(err.contains("Invalid draw tool preview color"));
    }

    #[test]
    fn test_unknown_marker_is_rejected() {
        let result = toml::from_str::<AppConfig>(
            r#"
            [draw_tool]
            end_marker = "star"
            "#,
        );
        assert!(result.is_err());
    }
}
