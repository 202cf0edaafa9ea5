//! Interactive orthogonal line drawing.
//!
//! [`OrthogonalDrawTool`] turns a sequence of clicks into an orthogonal
//! connector. While drawing it keeps two kinds of temporary objects in the
//! scene: one handle per placed point, and a single live preview (a path plus
//! its markers) that is fully replaced on every pointer move.
//!
//! ```text
//!          start           finish (ok)
//!   Idle ─────────► Drawing ──────────► Finishing ──► Idle
//!    ▲                 │
//!    └──── cancel ─────┘
//! ```
//!
//! Finishing is only observable from inside [`OrthogonalDrawTool::finish`];
//! a failed finish leaves the tool drawing.

use log::{debug, info, warn};
use thiserror::Error;

use ligature_core::{
    color::Color,
    geometry::Point,
    identifier::Id,
    marker::{Marker, MarkerKind, create_marker, marker_angle},
    route::{PathGeometry, RoutingStyle, orthogonalize, points_to_path, smooth_orthogonal_path},
    stroke::StrokeDefinition,
};

use crate::{
    config::DrawToolConfig,
    connector::{Connector, ConnectorData, ConnectorStyle, ConnectorVisual},
    scene::{Cursor, Handle, Preview, PreviewElement, Scene, SceneObject},
};

/// Errors returned by [`OrthogonalDrawTool::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawToolError {
    #[error("at least two distinct points are needed to finish a line")]
    NotEnoughPoints,

    #[error("no line is being drawn")]
    NotDrawing,
}

/// Lifecycle of the draw tool.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    #[default]
    Idle,
    Drawing,
    Finishing,
}

/// Public view of the tool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSnapshot {
    pub is_drawing: bool,
    pub waypoint_count: usize,
}

/// A user-facing message produced by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolNotice {
    Hint(String),
    Warning(String),
}

/// Selection and cursor state to restore when drawing ends.
#[derive(Debug, Clone, Copy)]
struct SavedInteraction {
    selection_enabled: bool,
    cursor: Cursor,
}

/// Stateful multi-click tool for freehand orthogonal lines.
///
/// # Examples
///
/// ```
/// use ligature::{config::DrawToolConfig, scene::Scene, tool::OrthogonalDrawTool};
///
/// let mut scene = Scene::new();
/// let mut tool = OrthogonalDrawTool::new(DrawToolConfig::default());
///
/// tool.start(&mut scene);
/// tool.add_point(&mut scene, 0.0, 0.0);
/// tool.add_point(&mut scene, 50.0, 0.0);
/// tool.add_point(&mut scene, 50.0, 50.0);
/// let id = tool.finish(&mut scene).unwrap();
///
/// assert_eq!(scene.len(), 1);
/// assert!(scene.connector(id).is_some());
/// ```
#[derive(Debug)]
pub struct OrthogonalDrawTool {
    config: DrawToolConfig,
    state: ToolState,
    waypoints: Vec<Point>,
    /// Last pointer position seen by [`update_preview`](Self::update_preview).
    pending: Option<Point>,
    handle_ids: Vec<Id>,
    preview_ids: Vec<Id>,
    hint_shown: bool,
    notices: Vec<ToolNotice>,
    saved: Option<SavedInteraction>,
}

impl OrthogonalDrawTool {
    pub fn new(config: DrawToolConfig) -> Self {
        Self {
            config,
            state: ToolState::Idle,
            waypoints: Vec::new(),
            pending: None,
            handle_ids: Vec::new(),
            preview_ids: Vec::new(),
            hint_shown: false,
            notices: Vec::new(),
            saved: None,
        }
    }

    pub fn config(&self) -> &DrawToolConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn phase(&self) -> ToolState {
        self.state
    }

    pub fn state(&self) -> ToolSnapshot {
        ToolSnapshot {
            is_drawing: self.state == ToolState::Drawing,
            waypoint_count: self.waypoints.len(),
        }
    }

    /// Drains the notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<ToolNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Starts a new line.
    ///
    /// Discards an unfinished line, disables selection and switches the
    /// cursor to a crosshair.
    pub fn start(&mut self, scene: &mut Scene) {
        if self.state == ToolState::Drawing {
            debug!("Restarting draw tool, discarding the unfinished line");
            self.clear_temporaries(scene);
        } else {
            self.saved = Some(SavedInteraction {
                selection_enabled: scene.selection_enabled(),
                cursor: scene.cursor(),
            });
        }

        self.waypoints.clear();
        self.pending = None;
        self.state = ToolState::Drawing;
        scene.set_selection_enabled(false);
        scene.set_cursor(Cursor::Crosshair);
        info!("Orthogonal draw tool started");
    }

    /// Places a point. Ignored unless drawing.
    ///
    /// Returns the placed point, snapped to the grid when configured.
    pub fn add_point(&mut self, scene: &mut Scene, x: f32, y: f32) -> Option<Point> {
        if self.state != ToolState::Drawing {
            return None;
        }

        let point = self.snap(Point::new(x, y));
        self.waypoints.push(point);

        let handle_id = scene.generate_id("handle");
        scene.add_generated(SceneObject::Handle(Handle::new(
            handle_id,
            point,
            self.config.handle_radius(),
            self.preview_color(),
        )));
        self.handle_ids.push(handle_id);
        debug!(x = point.x(), y = point.y(), count = self.waypoints.len(); "Point added");

        if !self.hint_shown {
            self.hint_shown = true;
            self.notices.push(ToolNotice::Hint(
                "Click to add corners, finish to create the line, cancel to discard it"
                    .to_string(),
            ));
        }

        self.update_preview(scene, point.x(), point.y());
        Some(point)
    }

    /// Redraws the preview through the placed points and the pointer position.
    ///
    /// Does nothing unless drawing with at least one placed point. The
    /// previous preview is removed before the new one is added.
    pub fn update_preview(&mut self, scene: &mut Scene, x: f32, y: f32) -> bool {
        if self.state != ToolState::Drawing || self.waypoints.is_empty() {
            return false;
        }

        let current = self.snap(Point::new(x, y));
        self.pending = Some(current);

        let mut points = self.waypoints.clone();
        points.push(current);
        let path = self.build_path(&points);

        self.remove_preview(scene);

        let color = self.preview_color();
        let width = self.config.stroke().map_or(2.0, |stroke| stroke.width());
        let markers = self.build_markers(&path, color);

        let path_id = scene.generate_id("preview");
        scene.add_generated(SceneObject::Preview(Preview::new(
            path_id,
            PreviewElement::Path(path),
            color,
            width,
        )));
        self.preview_ids.push(path_id);

        for marker in markers {
            let marker_id = scene.generate_id("preview");
            scene.add_generated(SceneObject::Preview(Preview::new(
                marker_id,
                PreviewElement::Marker(marker),
                color,
                width,
            )));
            self.preview_ids.push(marker_id);
        }

        scene.render_all();
        true
    }

    /// Turns the placed points into a permanent connector.
    ///
    /// With a single placed point, the last preview position counts as the
    /// second point.
    ///
    /// # Errors
    ///
    /// Returns [`DrawToolError::NotDrawing`] when no line is in progress and
    /// [`DrawToolError::NotEnoughPoints`] (plus a warning notice) when fewer
    /// than two distinct points are available; the line stays in progress.
    /// Repeated clicks on the same spot count once.
    pub fn finish(&mut self, scene: &mut Scene) -> Result<Id, DrawToolError> {
        if self.state != ToolState::Drawing {
            return Err(DrawToolError::NotDrawing);
        }

        let mut points = self.waypoints.clone();
        if let (1, Some(pending)) = (points.len(), self.pending) {
            if !pending.approx_eq(points[0]) {
                points.push(pending);
            }
        }
        let route = orthogonalize(&points);
        if route.len() < 2 {
            warn!(waypoints = self.waypoints.len(); "Not enough points to finish the line");
            self.notices.push(ToolNotice::Warning(
                "Place at least two points before finishing the line".to_string(),
            ));
            return Err(DrawToolError::NotEnoughPoints);
        }

        self.state = ToolState::Finishing;
        self.clear_temporaries(scene);

        let path = self.smooth(&route);
        let origin = path.bounds().map_or(Point::default(), |bounds| bounds.center());
        let stroke = self.config.stroke().unwrap_or_else(|err| {
            warn!(err:%; "Falling back to the default stroke");
            StrokeDefinition::default()
        });

        let id = scene.generate_id("connector");
        let data = ConnectorData {
            id,
            source_shape_id: None,
            source_port: None,
            target_shape_id: None,
            target_port: None,
            waypoints: None,
            style: ConnectorStyle {
                start_marker: self.config.start_marker(),
                end_marker: self.config.end_marker(),
                line_style: stroke.style(),
                routing_style: RoutingStyle::Orthogonal,
                stroke_width: stroke.width(),
                stroke_color: stroke.color(),
                smooth_corners: self.config.smooth_corners(),
                corner_radius: self.config.corner_radius(),
                ..ConnectorStyle::default()
            },
        };
        let visual = ConnectorVisual::new(
            path,
            self.config.start_marker(),
            self.config.end_marker(),
            self.config.marker_size(),
            origin,
        );
        scene.add_generated(SceneObject::Connector(Connector::new(data, visual)));

        self.waypoints.clear();
        self.pending = None;
        self.restore_interaction(scene);
        self.state = ToolState::Idle;
        scene.render_all();

        info!(connector_id:% = id, vertices = route.len(); "Orthogonal line finished");
        Ok(id)
    }

    /// Discards the line in progress.
    ///
    /// Returns false when no line is being drawn.
    pub fn cancel(&mut self, scene: &mut Scene) -> bool {
        if self.state != ToolState::Drawing {
            return false;
        }

        self.clear_temporaries(scene);
        self.waypoints.clear();
        self.pending = None;
        self.restore_interaction(scene);
        self.state = ToolState::Idle;
        scene.render_all();
        info!("Orthogonal line cancelled");
        true
    }

    fn snap(&self, point: Point) -> Point {
        if self.config.snap_to_grid() {
            point.snap_to_grid(self.config.grid_size())
        } else {
            point
        }
    }

    fn build_path(&self, points: &[Point]) -> PathGeometry {
        self.smooth(&orthogonalize(points))
    }

    fn smooth(&self, orthogonal: &[Point]) -> PathGeometry {
        if self.config.smooth_corners() {
            smooth_orthogonal_path(orthogonal, self.config.corner_radius())
        } else {
            points_to_path(orthogonal)
        }
    }

    fn build_markers(&self, path: &PathGeometry, color: Color) -> Vec<Marker> {
        let (Some(start), Some(end)) = (path.start(), path.end()) else {
            return Vec::new();
        };
        if path.commands().len() < 2 {
            return Vec::new();
        }

        let size = self.config.marker_size();
        [
            (start, path.start_direction(), self.config.start_marker()),
            (end, path.end_direction(), self.config.end_marker()),
        ]
        .into_iter()
        .filter(|(_, _, kind)| *kind != MarkerKind::None)
        .filter_map(|(at, direction, kind)| {
            create_marker(at, marker_angle(direction), kind, color, size)
        })
        .collect()
    }

    fn preview_color(&self) -> Color {
        self.config.preview_color().unwrap_or_else(|err| {
            warn!(err:%; "Falling back to the default preview color");
            Color::default()
        })
    }

    fn remove_preview(&mut self, scene: &mut Scene) {
        for id in self.preview_ids.drain(..) {
            scene.remove(id);
        }
    }

    fn clear_temporaries(&mut self, scene: &mut Scene) {
        self.remove_preview(scene);
        for id in self.handle_ids.drain(..) {
            scene.remove(id);
        }
    }

    fn restore_interaction(&mut self, scene: &mut Scene) {
        let saved = self.saved.take().unwrap_or(SavedInteraction {
            selection_enabled: true,
            cursor: Cursor::Default,
        });
        scene.set_selection_enabled(saved.selection_enabled);
        scene.set_cursor(saved.cursor);
    }
}
