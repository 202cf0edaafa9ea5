//! Scene documents.
//!
//! A scene document is a TOML file listing shapes, helpers and connectors,
//! plus an optional list of shape moves that are replayed after the scene is
//! built. Connectors can be bound to shapes (by explicit port position, by
//! snapping a point to the nearest port, or by letting the facing ports be
//! chosen) or placed between absolute points.
//!
//! ```toml
//! [[shapes]]
//! id = "client"
//! left = 0
//! top = 0
//! width = 120
//! height = 60
//!
//! [[shapes]]
//! id = "server"
//! left = 300
//! top = 0
//! width = 120
//! height = 60
//!
//! [[connectors]]
//! from = "client"
//! to = "server"
//! to_port = "left"
//! routing = "orthogonal"
//!
//! [[moves]]
//! shape = "server"
//! dy = 120
//! ```

use log::{debug, info};
use serde::Deserialize;

use ligature_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    identifier::Id,
    marker::MarkerKind,
    port::{Port, PortPosition, PortPreference, find_best_ports, find_nearest_port, port_at},
    route::RoutingStyle,
    shape::ShapeGeometry,
    stroke::LineStyle,
};

use crate::{
    config::{AppConfig, RoutingConfig},
    connector::{ConnectorOptions, ConnectorStyle, create_connector},
    error::LigatureError,
    scene::{Helper, HelperKind, Scene, SceneObject, Shape},
    sync::update_connected_lines,
};

/// A parsed scene document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDocument {
    #[serde(default)]
    shapes: Vec<ShapeEntry>,
    #[serde(default)]
    helpers: Vec<HelperEntry>,
    #[serde(default)]
    connectors: Vec<ConnectorEntry>,
    #[serde(default)]
    moves: Vec<ShapeMove>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeEntry {
    id: String,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    #[serde(default = "unit_scale")]
    scale_x: f32,
    #[serde(default = "unit_scale")]
    scale_y: f32,
    #[serde(default)]
    angle: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct HelperEntry {
    id: String,
    kind: HelperKind,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConnectorEntry {
    id: Option<String>,
    from: Option<String>,
    from_port: Option<PortPosition>,
    to: Option<String>,
    to_port: Option<PortPosition>,
    start: Option<[f32; 2]>,
    end: Option<[f32; 2]>,
    #[serde(default)]
    waypoints: Vec<[f32; 2]>,
    #[serde(default)]
    routing: RoutingStyle,
    start_marker: Option<MarkerKind>,
    end_marker: Option<MarkerKind>,
    #[serde(default)]
    line_style: LineStyle,
    stroke_width: Option<f32>,
    stroke_color: Option<String>,
    curvature: Option<f32>,
    smooth_corners: Option<bool>,
    corner_radius: Option<f32>,
    avoid_obstacles: Option<bool>,
}

/// A shape edit replayed after the scene is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeMove {
    shape: String,
    #[serde(default)]
    dx: f32,
    #[serde(default)]
    dy: f32,
    angle: Option<f32>,
    scale: Option<[f32; 2]>,
}

fn unit_scale() -> f32 {
    1.0
}

fn to_point([x, y]: [f32; 2]) -> Point {
    Point::new(x, y)
}

/// One end of a connector while its binding is being resolved.
#[derive(Debug, Clone, Copy)]
struct End<'a> {
    shape: Option<&'a Shape>,
    port: Option<Port>,
    point: Option<Point>,
}

impl End<'_> {
    fn needs_port(&self) -> bool {
        self.shape.is_some() && self.port.is_none()
    }

    fn is_missing(&self) -> bool {
        self.shape.is_none() && self.point.is_none()
    }
}

impl SceneDocument {
    /// Parses a scene document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::Document`] if the text is not a valid document.
    pub fn from_toml(text: &str) -> Result<Self, LigatureError> {
        toml::from_str(text).map_err(|err| LigatureError::Document(err.to_string()))
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Builds a scene holding every shape, helper and connector of the document.
    ///
    /// Connector options left unset fall back to `config`'s routing section.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::DuplicateId`] for reused ids,
    /// [`LigatureError::UnknownShape`] for connectors bound to missing shapes
    /// and [`LigatureError::Document`] for connectors without a resolvable
    /// endpoint or with an invalid color.
    pub fn build_scene(&self, config: &AppConfig) -> Result<Scene, LigatureError> {
        let mut scene = Scene::new();

        for entry in &self.shapes {
            let shape = Shape::new(
                Id::new(&entry.id),
                entry.left,
                entry.top,
                entry.width,
                entry.height,
            )
            .with_scale(entry.scale_x, entry.scale_y)
            .with_angle(entry.angle);
            scene.add(SceneObject::Shape(shape))?;
        }

        for entry in &self.helpers {
            let bounds = Bounds::new_from_top_left(
                Point::new(entry.left, entry.top),
                Size::new(entry.width, entry.height),
            );
            scene.add(SceneObject::Helper(Helper::new(
                Id::new(&entry.id),
                entry.kind,
                bounds,
            )))?;
        }

        for (index, entry) in self.connectors.iter().enumerate() {
            let options = resolve_connector(&scene, index, entry, config.routing())?;
            create_connector(&mut scene, options)?;
        }

        info!(
            shapes = self.shapes.len(),
            connectors = self.connectors.len();
            "Scene built"
        );
        Ok(scene)
    }

    /// Replays the document's shape moves, rerouting connected lines after each.
    ///
    /// Returns the total number of connector updates.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::UnknownShape`] if a move targets a missing shape.
    pub fn apply_moves(&self, scene: &mut Scene) -> Result<usize, LigatureError> {
        let mut updated = 0;
        for entry in &self.moves {
            let shape_id = Id::new(&entry.shape);
            let shape = scene
                .shape_mut(shape_id)
                .ok_or(LigatureError::UnknownShape(shape_id))?;

            shape.translate(Point::new(entry.dx, entry.dy));
            if let Some(angle) = entry.angle {
                shape.set_angle(angle);
            }
            if let Some([scale_x, scale_y]) = entry.scale {
                shape.set_scale(scale_x, scale_y);
            }
            debug!(shape_id:%, dx = entry.dx, dy = entry.dy; "Shape moved");

            updated += update_connected_lines(scene, shape_id);
        }
        Ok(updated)
    }
}

fn resolve_connector(
    scene: &Scene,
    index: usize,
    entry: &ConnectorEntry,
    routing: &RoutingConfig,
) -> Result<ConnectorOptions, LigatureError> {
    let snap_distance = routing.port_snap_distance();
    let mut source = resolve_end(
        scene,
        entry.from.as_deref(),
        entry.from_port,
        entry.start.map(to_point),
        snap_distance,
    )?;
    let mut target = resolve_end(
        scene,
        entry.to.as_deref(),
        entry.to_port,
        entry.end.map(to_point),
        snap_distance,
    )?;
    if source.is_missing() {
        return Err(LigatureError::Document(format!("connector #{index} has no start")));
    }
    if target.is_missing() {
        return Err(LigatureError::Document(format!("connector #{index} has no end")));
    }

    // Sides bound without a port get the port facing the other end. These
    // stay unpinned so sync keeps choosing the facing port.
    let (mut source_pinned, mut target_pinned) = (!source.needs_port(), !target.needs_port());
    if let (Some(from), Some(to)) = (source.shape, target.shape) {
        let (best_source, best_target) = find_best_ports(from, to, PortPreference::default());
        if source.needs_port() {
            source.port = Some(best_source);
        }
        if target.needs_port() {
            target.port = Some(best_target);
        }
    } else {
        if let (Some(shape), Some(towards)) = (source.shape, target.point) {
            if source.needs_port() {
                source.port = find_nearest_port(shape, towards, f32::INFINITY);
                source_pinned = true;
            }
        }
        if let (Some(shape), Some(towards)) = (target.shape, source.point) {
            if target.needs_port() {
                target.port = find_nearest_port(shape, towards, f32::INFINITY);
                target_pinned = true;
            }
        }
    }

    let start = source
        .port
        .map(|port| port.point())
        .or(source.point)
        .ok_or_else(|| LigatureError::Document(format!("connector #{index} has no start")))?;
    let end = target
        .port
        .map(|port| port.point())
        .or(target.point)
        .ok_or_else(|| LigatureError::Document(format!("connector #{index} has no end")))?;

    let defaults = ConnectorStyle::default();
    let stroke_color = match &entry.stroke_color {
        Some(color) => Color::new(color).map_err(LigatureError::Document)?,
        None => defaults.stroke_color,
    };
    let style = ConnectorStyle {
        start_marker: entry.start_marker.unwrap_or(defaults.start_marker),
        end_marker: entry.end_marker.unwrap_or(defaults.end_marker),
        line_style: entry.line_style,
        routing_style: entry.routing,
        stroke_width: entry.stroke_width.unwrap_or(defaults.stroke_width),
        stroke_color,
        curvature: entry.curvature.unwrap_or(routing.curvature()),
        smooth_corners: entry.smooth_corners.unwrap_or(routing.smooth_corners()),
        corner_radius: entry.corner_radius.unwrap_or(routing.corner_radius()),
        avoid_obstacles: entry.avoid_obstacles.unwrap_or(routing.avoid_obstacles()),
    };

    let mut options = ConnectorOptions::new(start, end).with_style(style);
    if let Some(id) = &entry.id {
        options = options.with_id(Id::new(id));
    }
    if !entry.waypoints.is_empty() {
        options = options.with_waypoints(entry.waypoints.iter().copied().map(to_point).collect());
    }

    options.source_shape_id = source.shape.map(|shape| shape.id());
    options.target_shape_id = target.shape.map(|shape| shape.id());
    if source_pinned {
        options.source_port = source.port.map(|port| port.id());
    }
    if target_pinned {
        options.target_port = target.port.map(|port| port.id());
    }
    Ok(options)
}

fn resolve_end<'a>(
    scene: &'a Scene,
    shape_id: Option<&str>,
    position: Option<PortPosition>,
    point: Option<Point>,
    snap_distance: f32,
) -> Result<End<'a>, LigatureError> {
    let Some(shape_id) = shape_id.map(Id::new) else {
        return Ok(End {
            shape: None,
            port: None,
            point,
        });
    };
    let shape = scene
        .shape(shape_id)
        .ok_or(LigatureError::UnknownShape(shape_id))?;

    let port = match (position, point) {
        (Some(position), _) => Some(port_at(shape, position)),
        (None, Some(point)) => find_nearest_port(shape, point, snap_distance),
        (None, None) => None,
    };
    Ok(End {
        shape: Some(shape),
        port,
        point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BOXES: &str = r#"
        [[shapes]]
        id = "doc-a"
        left = 0
        top = 0
        width = 100
        height = 50

        [[shapes]]
        id = "doc-b"
        left = 300
        top = 0
        width = 100
        height = 50
    "#;

    fn build(extra: &str) -> Result<Scene, LigatureError> {
        let text = format!("{TWO_BOXES}\n{extra}");
        SceneDocument::from_toml(&text)?.build_scene(&AppConfig::default())
    }

    #[test]
    fn test_facing_ports_are_chosen() {
        let scene = build(
            r#"
            [[connectors]]
            id = "doc-line"
            from = "doc-a"
            to = "doc-b"
            "#,
        )
        .unwrap();

        let connector = scene.connector(Id::new("doc-line")).unwrap();
        assert_eq!(connector.path().start(), Some(Point::new(100.0, 25.0)));
        assert_eq!(connector.path().end(), Some(Point::new(300.0, 25.0)));
        assert_eq!(connector.data().source_port, None);
        assert_eq!(connector.data().source_shape_id, Some(Id::new("doc-a")));
    }

    #[test]
    fn test_explicit_port_and_point_snapping() {
        let scene = build(
            r#"
            [[connectors]]
            id = "doc-snap"
            from = "doc-a"
            from_port = "bottom"
            to = "doc-b"
            end = [305.0, 48.0]
            "#,
        )
        .unwrap();

        let data = scene.connector(Id::new("doc-snap")).unwrap().data().clone();
        assert_eq!(data.source_port, Some(Id::new("doc-a-bottom")));
        assert_eq!(data.target_port, Some(Id::new("doc-b-bottom-left")));
    }

    #[test]
    fn test_free_connector_and_style_defaults() {
        let text = r#"
            [[connectors]]
            start = [0.0, 0.0]
            end = [50.0, 80.0]
            routing = "orthogonal"
            end_marker = "diamond"
            stroke_color = "red"
        "#;
        let config: AppConfig = toml::from_str(
            r#"
            [routing]
            smooth_corners = true
            corner_radius = 6
            "#,
        )
        .unwrap();
        let scene = SceneDocument::from_toml(text)
            .unwrap()
            .build_scene(&config)
            .unwrap();

        let connector = scene.connectors().next().unwrap();
        let style = &connector.data().style;
        assert_eq!(style.routing_style, RoutingStyle::Orthogonal);
        assert_eq!(style.end_marker, MarkerKind::Diamond);
        assert!(style.smooth_corners);
        assert_eq!(style.corner_radius, 6.0);
        assert_eq!(style.stroke_color, Color::new("red").unwrap());
        assert!(!connector.data().is_bound());
    }

    #[test]
    fn test_half_bound_connector_faces_free_point() {
        let scene = build(
            r#"
            [[connectors]]
            id = "doc-half"
            from = "doc-a"
            end = [50.0, 400.0]
            "#,
        )
        .unwrap();

        let connector = scene.connector(Id::new("doc-half")).unwrap();
        assert_eq!(connector.path().start(), Some(Point::new(50.0, 50.0)));
        assert_eq!(connector.data().source_port, Some(Id::new("doc-a-bottom")));
    }

    #[test]
    fn test_unknown_shape() {
        let err = build(
            r#"
            [[connectors]]
            from = "doc-a"
            to = "doc-missing"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LigatureError::UnknownShape(id) if id == "doc-missing"));
    }

    #[test]
    fn test_missing_endpoint() {
        let err = build(
            r#"
            [[connectors]]
            from = "doc-a"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LigatureError::Document(msg) if msg.contains("no end")));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = SceneDocument::from_toml(
            r#"
            [[shapes]]
            id = "doc-x"
            left = 0
            top = 0
            width = 1
            height = 1
            colour = "red"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LigatureError::Document(_)));
    }

    #[test]
    fn test_moves_reroute_connected_lines() {
        let text = format!(
            "{TWO_BOXES}\n{}",
            r#"
            [[connectors]]
            id = "doc-moved"
            from = "doc-a"
            from_port = "right"
            to = "doc-b"
            to_port = "left"

            [[moves]]
            shape = "doc-b"
            dy = 100
            scale = [2.0, 1.0]
            "#
        );
        let document = SceneDocument::from_toml(&text).unwrap();
        assert_eq!(document.move_count(), 1);
        let mut scene = document.build_scene(&AppConfig::default()).unwrap();

        assert_eq!(document.apply_moves(&mut scene).unwrap(), 1);
        let shape = scene.shape(Id::new("doc-b")).unwrap();
        assert_eq!(shape.scaled_size().width(), 200.0);
        let end = scene.connector(Id::new("doc-moved")).unwrap().path().end();
        assert_eq!(end, Some(Point::new(300.0, 125.0)));
    }

    #[test]
    fn test_helpers_are_added() {
        let scene = build(
            r#"
            [[helpers]]
            id = "doc-grid"
            kind = "grid"
            left = -10
            top = -10
            width = 500
            height = 500
            "#,
        )
        .unwrap();
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.obstacles().count(), 2);
    }
}
