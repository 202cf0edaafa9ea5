//! Connector entities.
//!
//! A connector is one indivisible scene object: a routed path plus up to two
//! endpoint markers. Its [`ConnectorData`] records the bindings and style
//! needed to reroute it later (see [`crate::sync`]).
//!
//! # Visual variants
//!
//! - [`ConnectorVisual::SimplePath`]: a bare path in scene coordinates.
//! - [`ConnectorVisual::MarkerDecorated`]: a path stored in local space under
//!   a group transform. Markers are never stored; they are derived from the
//!   local anchor points and the live transform every time they are read, so
//!   moving, scaling or rotating the group can never leave them behind.

use log::{info, trace};
use serde::{Deserialize, Serialize};

use ligature_core::{
    color::Color,
    geometry::{Bounds, Point, Transform},
    identifier::Id,
    marker::{DEFAULT_MARKER_SIZE, Marker, MarkerKind, create_marker, marker_angle},
    port::{Port, PortPosition, find_port_by_id},
    route::{
        DEFAULT_CURVATURE, PathGeometry, RoutingStyle, bezier_through_waypoints, points_to_path,
        route_curved, route_orthogonal, route_orthogonal_smart, route_straight,
        smooth_orthogonal_path,
    },
    stroke::{LineStyle, StrokeDefinition},
};

use crate::{
    error::LigatureError,
    scene::{Scene, SceneObject},
};

/// Routing and styling options of a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorStyle {
    pub start_marker: MarkerKind,
    pub end_marker: MarkerKind,
    pub line_style: LineStyle,
    pub routing_style: RoutingStyle,
    pub stroke_width: f32,
    pub stroke_color: Color,
    pub curvature: f32,
    pub smooth_corners: bool,
    pub corner_radius: f32,
    pub avoid_obstacles: bool,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            start_marker: MarkerKind::None,
            end_marker: MarkerKind::Arrow,
            line_style: LineStyle::Solid,
            routing_style: RoutingStyle::Straight,
            stroke_width: 2.0,
            stroke_color: Color::default(),
            curvature: DEFAULT_CURVATURE,
            smooth_corners: false,
            corner_radius: 10.0,
            avoid_obstacles: false,
        }
    }
}

impl ConnectorStyle {
    /// Stroke used to draw the path.
    pub fn stroke(&self) -> StrokeDefinition {
        let mut stroke = StrokeDefinition::new(self.stroke_color, self.stroke_width);
        stroke.set_style(self.line_style);
        stroke
    }
}

/// Serializable description of a connector.
///
/// Shape ids that no longer resolve make the connector stale, never invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorData {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_shape_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_shape_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<Id>,
    /// Points the path passes through. Non-empty waypoints override the routing style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Point>>,
    #[serde(flatten)]
    pub style: ConnectorStyle,
}

impl ConnectorData {
    /// Returns true if at least one endpoint is bound to a shape.
    pub fn is_bound(&self) -> bool {
        self.source_shape_id.is_some() || self.target_shape_id.is_some()
    }

    /// Returns true if the connector is bound to `shape_id` at either end.
    pub fn is_connected_to(&self, shape_id: Id) -> bool {
        self.source_shape_id == Some(shape_id) || self.target_shape_id == Some(shape_id)
    }

    fn active_waypoints(&self) -> Option<&[Point]> {
        self.waypoints.as_deref().filter(|points| !points.is_empty())
    }
}

/// Geometry of a connector.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorVisual {
    /// A bare path in scene coordinates.
    SimplePath(PathGeometry),
    /// A path with endpoint markers, stored in local space under `transform`.
    MarkerDecorated {
        path: PathGeometry,
        /// Path vertices in local space.
        local_points: Vec<Point>,
        transform: Transform,
        start_marker: MarkerKind,
        end_marker: MarkerKind,
        marker_size: f32,
    },
}

impl ConnectorVisual {
    /// Wraps a scene-space path, decorating it when at least one marker is visible.
    ///
    /// The group transform starts as a translation to `origin`; the stored
    /// path and anchor points are the scene path mapped through its inverse.
    pub fn new(
        path: PathGeometry,
        start_marker: MarkerKind,
        end_marker: MarkerKind,
        marker_size: f32,
        origin: Point,
    ) -> Self {
        if !start_marker.is_visible() && !end_marker.is_visible() {
            return Self::SimplePath(path);
        }

        let transform = Transform::translation(origin);
        let local = path.transform(&Transform::translation(origin.scale(-1.0)));
        Self::MarkerDecorated {
            local_points: local.vertices(),
            path: local,
            transform,
            start_marker,
            end_marker,
            marker_size,
        }
    }

    /// The path in scene coordinates.
    pub fn scene_path(&self) -> PathGeometry {
        match self {
            Self::SimplePath(path) => path.clone(),
            Self::MarkerDecorated {
                path, transform, ..
            } => path.transform(transform),
        }
    }

    /// Markers placed from the local anchor points and the live transform.
    ///
    /// Anchors and directions are mapped into the scene before the glyphs are
    /// built, which cancels the group scale: markers keep their configured
    /// size and proportions under any non-uniform scaling.
    pub fn markers(&self, color: Color) -> Vec<Marker> {
        let Self::MarkerDecorated {
            path,
            local_points,
            transform,
            start_marker,
            end_marker,
            marker_size,
        } = self
        else {
            return Vec::new();
        };

        let (Some(first), Some(last)) = (local_points.first(), local_points.last()) else {
            return Vec::new();
        };

        let start_direction = transform.apply_vector(path.start_direction());
        let end_direction = transform.apply_vector(path.end_direction());

        [
            create_marker(
                transform.apply(*first),
                marker_angle(start_direction),
                *start_marker,
                color,
                *marker_size,
            ),
            create_marker(
                transform.apply(*last),
                marker_angle(end_direction),
                *end_marker,
                color,
                *marker_size,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Group transform of a decorated visual.
    pub fn transform(&self) -> Option<Transform> {
        match self {
            Self::SimplePath(_) => None,
            Self::MarkerDecorated { transform, .. } => Some(*transform),
        }
    }

    /// Inverse-scale factors that cancel the group scale on marker glyphs.
    pub fn counter_scale(&self) -> (f32, f32) {
        match self {
            Self::SimplePath(_) => (1.0, 1.0),
            Self::MarkerDecorated { transform, .. } => {
                let (sx, sy) = (transform.scale_x(), transform.scale_y());
                (
                    if sx > 0.0 { 1.0 / sx } else { 1.0 },
                    if sy > 0.0 { 1.0 / sy } else { 1.0 },
                )
            }
        }
    }

    /// Replaces the path with a new scene-space path, keeping the transform.
    fn set_scene_path(&mut self, scene_path: PathGeometry) {
        match self {
            Self::SimplePath(path) => *path = scene_path,
            Self::MarkerDecorated {
                path,
                local_points,
                transform,
                ..
            } => {
                let inverse = transform.inverse().unwrap_or_else(|| {
                    *transform = Transform::identity();
                    Transform::identity()
                });
                *path = scene_path.transform(&inverse);
                *local_points = path.vertices();
            }
        }
    }
}

/// A connector scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    data: ConnectorData,
    visual: ConnectorVisual,
}

impl Connector {
    pub fn new(data: ConnectorData, visual: ConnectorVisual) -> Self {
        Self { data, visual }
    }

    pub fn id(&self) -> Id {
        self.data.id
    }

    pub fn data(&self) -> &ConnectorData {
        &self.data
    }

    pub fn visual(&self) -> &ConnectorVisual {
        &self.visual
    }

    pub fn stroke(&self) -> StrokeDefinition {
        self.data.style.stroke()
    }

    /// The routed path in scene coordinates.
    pub fn path(&self) -> PathGeometry {
        self.visual.scene_path()
    }

    /// Endpoint markers, re-derived from the current geometry.
    pub fn markers(&self) -> Vec<Marker> {
        self.visual.markers(self.data.style.stroke_color)
    }

    /// Bounds of the whole unit, path and markers included.
    pub fn bounds(&self) -> Option<Bounds> {
        let path_bounds = self.path().bounds();
        self.markers()
            .iter()
            .map(Marker::bounds)
            .fold(path_bounds, |acc, bounds| match acc {
                Some(acc) => Some(acc.merge(&bounds)),
                None => Some(bounds),
            })
    }

    /// Parts of a connector are never selectable on their own.
    pub fn subtarget_selectable(&self) -> bool {
        false
    }

    /// Replaces the group transform. Returns false for undecorated connectors.
    pub(crate) fn set_transform(&mut self, new_transform: Transform) -> bool {
        match &mut self.visual {
            ConnectorVisual::MarkerDecorated { transform, .. } => {
                *transform = new_transform;
                true
            }
            ConnectorVisual::SimplePath(_) => false,
        }
    }

    /// Replaces the routed path in place, keeping id and visual variant.
    pub(crate) fn set_path(&mut self, path: PathGeometry) {
        self.visual.set_scene_path(path);
    }
}

/// Options of [`create_connector`].
#[derive(Debug, Clone, Default)]
pub struct ConnectorOptions {
    /// Explicit id; a fresh `connector-{n}` id is generated when unset.
    pub id: Option<Id>,
    pub start: Point,
    pub end: Point,
    pub source_shape_id: Option<Id>,
    pub source_port: Option<Id>,
    pub target_shape_id: Option<Id>,
    pub target_port: Option<Id>,
    pub waypoints: Option<Vec<Point>>,
    pub style: ConnectorStyle,
}

impl ConnectorOptions {
    /// Options for a free connector between two absolute points.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Binds the start to `port` of `shape_id` and moves the start onto it.
    pub fn with_source(mut self, shape_id: Id, port: &Port) -> Self {
        self.source_shape_id = Some(shape_id);
        self.source_port = Some(port.id());
        self.start = port.point();
        self
    }

    /// Binds the end to `port` of `shape_id` and moves the end onto it.
    pub fn with_target(mut self, shape_id: Id, port: &Port) -> Self {
        self.target_shape_id = Some(shape_id);
        self.target_port = Some(port.id());
        self.end = port.point();
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = Some(waypoints);
        self
    }

    pub fn with_style(mut self, style: ConnectorStyle) -> Self {
        self.style = style;
        self
    }
}

/// Creates a connector and adds it to the scene.
///
/// Non-empty waypoints give a smooth curve through `start`, the waypoints and
/// `end`. Otherwise the routing style decides: curved connectors use a single
/// Bezier, orthogonal ones an axis-aligned route (obstacle-avoiding when
/// `avoid_obstacles` is set, corner-smoothed when `smooth_corners` is set),
/// straight ones a single segment.
///
/// # Errors
///
/// Returns [`LigatureError::DuplicateId`] if the explicit id is already used.
///
/// # Examples
///
/// ```
/// use ligature::{
///     connector::{create_connector, ConnectorOptions},
///     geometry::Point,
///     scene::Scene,
/// };
///
/// let mut scene = Scene::new();
/// let id = create_connector(
///     &mut scene,
///     ConnectorOptions::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
/// )
/// .unwrap();
///
/// let connector = scene.connector(id).unwrap();
/// assert_eq!(connector.path().length(), 100.0);
/// assert_eq!(connector.markers().len(), 1);
/// ```
pub fn create_connector(scene: &mut Scene, options: ConnectorOptions) -> Result<Id, LigatureError> {
    let id = match options.id {
        Some(id) if scene.contains(id) => return Err(LigatureError::DuplicateId(id)),
        Some(id) => id,
        None => scene.generate_id("connector"),
    };

    let data = ConnectorData {
        id,
        source_shape_id: options.source_shape_id,
        source_port: options.source_port,
        target_shape_id: options.target_shape_id,
        target_port: options.target_port,
        waypoints: options.waypoints,
        style: options.style,
    };

    let source_position = resolve_port(scene, data.source_shape_id, data.source_port)
        .map(|port| port.position());
    let target_position = resolve_port(scene, data.target_shape_id, data.target_port)
        .map(|port| port.position());

    let path = compute_connector_path(
        scene,
        &data,
        RouteEnds {
            start: options.start,
            end: options.end,
            start_port: source_position,
            end_port: target_position,
        },
        data.style.avoid_obstacles,
    );
    trace!(connector_id:% = id, path:% = path; "Connector routed");

    let visual = ConnectorVisual::new(
        path,
        data.style.start_marker,
        data.style.end_marker,
        DEFAULT_MARKER_SIZE,
        Point::default(),
    );

    info!(
        connector_id:% = id,
        routing_style:% = data.style.routing_style;
        "Connector created"
    );
    scene.add(SceneObject::Connector(Connector::new(data, visual)))
}

/// Endpoints of a route with their optional port hints.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RouteEnds {
    pub start: Point,
    pub end: Point,
    pub start_port: Option<PortPosition>,
    pub end_port: Option<PortPosition>,
}

/// Routes a connector path. Waypoints take precedence over the routing style.
pub(crate) fn compute_connector_path(
    scene: &Scene,
    data: &ConnectorData,
    ends: RouteEnds,
    avoid_obstacles: bool,
) -> PathGeometry {
    if let Some(waypoints) = data.active_waypoints() {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(ends.start);
        points.extend_from_slice(waypoints);
        points.push(ends.end);
        return bezier_through_waypoints(&points);
    }

    let style = &data.style;
    match style.routing_style {
        RoutingStyle::Straight => points_to_path(&route_straight(ends.start, ends.end)),
        RoutingStyle::Curved => route_curved(ends.start, ends.end, style.curvature),
        RoutingStyle::Orthogonal => {
            let points = if avoid_obstacles {
                let exclude: Vec<Id> = [data.source_shape_id, data.target_shape_id]
                    .into_iter()
                    .flatten()
                    .collect();
                route_orthogonal_smart(
                    scene.obstacles(),
                    ends.start,
                    ends.end,
                    ends.start_port,
                    ends.end_port,
                    &exclude,
                )
            } else {
                route_orthogonal(ends.start, ends.end, ends.start_port, ends.end_port)
            };

            if style.smooth_corners {
                smooth_orthogonal_path(&points, style.corner_radius)
            } else {
                points_to_path(&points)
            }
        }
    }
}

/// Resolves a bound port against the current scene.
pub(crate) fn resolve_port(scene: &Scene, shape_id: Option<Id>, port_id: Option<Id>) -> Option<Port> {
    let shape = scene.shape(shape_id?)?;
    find_port_by_id(shape, port_id?)
}
