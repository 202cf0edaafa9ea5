//! Connection ports on shape boundaries.
//!
//! Every shape exposes exactly eight ports: the four corners and the four
//! edge midpoints of its (scaled, unrotated) box. Ports are never stored;
//! they are recomputed from the shape's current geometry whenever they are
//! needed, so they always follow moves and resizes.
//!
//! ```text
//!   top-left ──── top ──── top-right
//!      │                       │
//!    left                    right
//!      │                       │
//!  bottom-left ── bottom ── bottom-right
//! ```

use std::{fmt, str::FromStr};

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::Point,
    identifier::Id,
    shape::ShapeGeometry,
};

/// Default search radius, in scene units, for [`find_nearest_port`].
pub const DEFAULT_PORT_SNAP_DISTANCE: f32 = 30.0;

/// Placement of a port on the shape's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortPosition {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl PortPosition {
    /// All positions in canonical order.
    pub const ALL: [PortPosition; 8] = [
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Relative coordinates of this position inside the box (`0`, `0.5` or `1`).
    pub fn relative(self) -> (f32, f32) {
        match self {
            Self::Top => (0.5, 0.0),
            Self::Right => (1.0, 0.5),
            Self::Bottom => (0.5, 1.0),
            Self::Left => (0.0, 0.5),
            Self::TopLeft => (0.0, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomRight => (1.0, 1.0),
            Self::BottomLeft => (0.0, 1.0),
        }
    }

    /// Kebab-case name used in port ids and documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
        }
    }
}

impl fmt::Display for PortPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a port position name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid port position `{0}`")]
pub struct ParsePortPositionError(String);

impl FromStr for PortPosition {
    type Err = ParsePortPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|position| position.name() == s)
            .ok_or_else(|| ParsePortPositionError(s.to_string()))
    }
}

/// Which connector ends a port accepts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortKind {
    Source,
    Target,
    #[default]
    Both,
}

/// A resolved anchor point on a shape.
///
/// Invariant: `x = left + scaled_width · rel_x` and
/// `y = top + scaled_height · rel_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    id: Id,
    position: PortPosition,
    x: f32,
    y: f32,
    rel_x: f32,
    rel_y: f32,
    kind: PortKind,
}

impl Port {
    /// Port id, `{shape_id}-{position}`.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn position(&self) -> PortPosition {
        self.position
    }

    /// Absolute x-coordinate.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Absolute y-coordinate.
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn rel_x(&self) -> f32 {
        self.rel_x
    }

    pub fn rel_y(&self) -> f32 {
        self.rel_y
    }

    pub fn kind(&self) -> PortKind {
        self.kind
    }

    /// Absolute position as a point.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Angle a marker attached to this port should face, see [`port_angle`].
    pub fn angle(&self) -> f32 {
        port_angle(self.position)
    }
}

/// Computes the eight ports of `shape` from its current geometry.
///
/// # Examples
///
/// ```
/// # use ligature_core::{geometry::Point, identifier::Id, port::{calculate_shape_ports, PortPosition}, shape::ShapeGeometry};
/// struct Rect;
/// impl ShapeGeometry for Rect {
///     fn id(&self) -> Id { Id::new("rect") }
///     fn left(&self) -> f32 { 0.0 }
///     fn top(&self) -> f32 { 0.0 }
///     fn width(&self) -> f32 { 100.0 }
///     fn height(&self) -> f32 { 50.0 }
/// }
///
/// let ports = calculate_shape_ports(&Rect);
/// let right = ports.iter().find(|p| p.position() == PortPosition::Right).unwrap();
/// assert_eq!(right.point(), Point::new(100.0, 25.0));
/// assert_eq!(right.id(), "rect-right");
/// ```
pub fn calculate_shape_ports<S: ShapeGeometry + ?Sized>(shape: &S) -> [Port; 8] {
    let shape_id = shape.id();
    let left = shape.left();
    let top = shape.top();
    let size = shape.scaled_size();

    PortPosition::ALL.map(|position| {
        let (rel_x, rel_y) = position.relative();
        Port {
            id: shape_id.with_suffix(position.name()),
            position,
            x: left + size.width() * rel_x,
            y: top + size.height() * rel_y,
            rel_x,
            rel_y,
            kind: PortKind::Both,
        }
    })
}

/// Resolves a port of `shape` by its id.
pub fn find_port_by_id<S: ShapeGeometry + ?Sized>(shape: &S, port_id: Id) -> Option<Port> {
    calculate_shape_ports(shape)
        .into_iter()
        .find(|port| port.id == port_id)
}

/// Resolves a port of `shape` by its position.
pub fn port_at<S: ShapeGeometry + ?Sized>(shape: &S, position: PortPosition) -> Port {
    let ports = calculate_shape_ports(shape);
    // ALL and the computed array share the same order.
    let index = PortPosition::ALL
        .iter()
        .position(|p| *p == position)
        .unwrap_or_default();
    ports[index]
}

/// Returns the port of `shape` closest to `point`, or `None` if even the
/// closest one is farther than `max_distance`.
pub fn find_nearest_port<S: ShapeGeometry + ?Sized>(
    shape: &S,
    point: Point,
    max_distance: f32,
) -> Option<Port> {
    let nearest = calculate_shape_ports(shape).into_iter().min_by(|a, b| {
        a.point()
            .distance_to(point)
            .total_cmp(&b.point().distance_to(point))
    })?;

    let distance = nearest.point().distance_to(point);
    trace!(port:% = nearest.id, distance; "Nearest port candidate");
    (distance <= max_distance).then_some(nearest)
}

/// Explicit port positions requested for a connection.
///
/// The preference only applies when both sides are set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PortPreference {
    pub source: Option<PortPosition>,
    pub target: Option<PortPosition>,
}

impl PortPreference {
    pub fn new(source: PortPosition, target: PortPosition) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
        }
    }
}

/// Picks the source and target port positions for a connection between two shapes.
///
/// An explicit preference with both sides wins. Otherwise the dominant axis
/// of the center-to-center vector decides: a mostly vertical layout connects
/// bottom to top (or top to bottom when the target is above), a mostly
/// horizontal one right to left (or left to right).
pub fn choose_ports_by_direction<F, T>(
    from: &F,
    to: &T,
    preferred: PortPreference,
) -> (PortPosition, PortPosition)
where
    F: ShapeGeometry + ?Sized,
    T: ShapeGeometry + ?Sized,
{
    if let (Some(source), Some(target)) = (preferred.source, preferred.target) {
        return (source, target);
    }

    let delta = to.center().sub_point(from.center());
    if delta.y().abs() > delta.x().abs() {
        if delta.y() > 0.0 {
            (PortPosition::Bottom, PortPosition::Top)
        } else {
            (PortPosition::Top, PortPosition::Bottom)
        }
    } else if delta.x() > 0.0 {
        (PortPosition::Right, PortPosition::Left)
    } else {
        (PortPosition::Left, PortPosition::Right)
    }
}

/// Resolves [`choose_ports_by_direction`] to concrete ports.
pub fn find_best_ports<F, T>(from: &F, to: &T, preferred: PortPreference) -> (Port, Port)
where
    F: ShapeGeometry + ?Sized,
    T: ShapeGeometry + ?Sized,
{
    let (source, target) = choose_ports_by_direction(from, to, preferred);
    (port_at(from, source), port_at(to, target))
}

/// Outward-facing angle of a port position, in degrees.
///
/// ```
/// use ligature_core::port::{port_angle, PortPosition};
///
/// assert_eq!(port_angle(PortPosition::Right), 0.0);
/// assert_eq!(port_angle(PortPosition::Bottom), 90.0);
/// assert_eq!(port_angle(PortPosition::Left), 180.0);
/// assert_eq!(port_angle(PortPosition::Top), -90.0);
/// ```
pub fn port_angle(position: PortPosition) -> f32 {
    match position {
        PortPosition::Right => 0.0,
        PortPosition::BottomRight => 45.0,
        PortPosition::Bottom => 90.0,
        PortPosition::BottomLeft => 135.0,
        PortPosition::Left => 180.0,
        PortPosition::TopLeft => -135.0,
        PortPosition::Top => -90.0,
        PortPosition::TopRight => -45.0,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[derive(Debug)]
    struct TestShape {
        id: &'static str,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        scale_x: f32,
        scale_y: f32,
    }

    impl TestShape {
        fn new(id: &'static str, left: f32, top: f32, width: f32, height: f32) -> Self {
            Self {
                id,
                left,
                top,
                width,
                height,
                scale_x: 1.0,
                scale_y: 1.0,
            }
        }
    }

    impl ShapeGeometry for TestShape {
        fn id(&self) -> Id {
            Id::new(self.id)
        }
        fn left(&self) -> f32 {
            self.left
        }
        fn top(&self) -> f32 {
            self.top
        }
        fn width(&self) -> f32 {
            self.width
        }
        fn height(&self) -> f32 {
            self.height
        }
        fn scale_x(&self) -> f32 {
            self.scale_x
        }
        fn scale_y(&self) -> f32 {
            self.scale_y
        }
    }

    #[test]
    fn test_calculate_shape_ports_positions() {
        let shape = TestShape::new("cell", 10.0, 20.0, 100.0, 50.0);
        let ports = calculate_shape_ports(&shape);

        let expected = [
            (PortPosition::Top, 60.0, 20.0),
            (PortPosition::Right, 110.0, 45.0),
            (PortPosition::Bottom, 60.0, 70.0),
            (PortPosition::Left, 10.0, 45.0),
            (PortPosition::TopLeft, 10.0, 20.0),
            (PortPosition::TopRight, 110.0, 20.0),
            (PortPosition::BottomRight, 110.0, 70.0),
            (PortPosition::BottomLeft, 10.0, 70.0),
        ];
        for (port, (position, x, y)) in ports.iter().zip(expected) {
            assert_eq!(port.position(), position);
            assert_eq!(port.x(), x);
            assert_eq!(port.y(), y);
            assert_eq!(port.kind(), PortKind::Both);
        }
    }

    #[test]
    fn test_calculate_shape_ports_respects_scale() {
        let mut shape = TestShape::new("scaled", 0.0, 0.0, 100.0, 50.0);
        shape.scale_x = 2.0;
        shape.scale_y = 0.5;

        let bottom_right = port_at(&shape, PortPosition::BottomRight);
        assert_eq!(bottom_right.point(), Point::new(200.0, 25.0));
    }

    #[test]
    fn test_port_ids_are_prefixed_with_shape_id() {
        let shape = TestShape::new("mito", 0.0, 0.0, 10.0, 10.0);
        let ports = calculate_shape_ports(&shape);
        assert_eq!(ports[0].id(), "mito-top");
        assert_eq!(ports[6].id(), "mito-bottom-right");
    }

    #[test]
    fn test_find_port_by_id() {
        let shape = TestShape::new("golgi", 0.0, 0.0, 40.0, 40.0);
        let port = find_port_by_id(&shape, Id::new("golgi-left")).unwrap();
        assert_eq!(port.position(), PortPosition::Left);
        assert!(find_port_by_id(&shape, Id::new("golgi-middle")).is_none());
        assert!(find_port_by_id(&shape, Id::new("other-left")).is_none());
    }

    #[test]
    fn test_find_nearest_port_within_distance() {
        let shape = TestShape::new("a", 0.0, 0.0, 100.0, 100.0);
        let port = find_nearest_port(&shape, Point::new(105.0, 45.0), DEFAULT_PORT_SNAP_DISTANCE)
            .unwrap();
        assert_eq!(port.position(), PortPosition::Right);
    }

    #[test]
    fn test_find_nearest_port_too_far() {
        let shape = TestShape::new("a", 0.0, 0.0, 100.0, 100.0);
        assert!(
            find_nearest_port(&shape, Point::new(200.0, 50.0), DEFAULT_PORT_SNAP_DISTANCE)
                .is_none()
        );
        // Exactly at the limit still snaps.
        assert!(find_nearest_port(&shape, Point::new(130.0, 50.0), 30.0).is_some());
    }

    #[test]
    fn test_choose_ports_by_direction() {
        let origin = TestShape::new("o", 0.0, 0.0, 10.0, 10.0);
        let right = TestShape::new("r", 100.0, 10.0, 10.0, 10.0);
        let left = TestShape::new("l", -100.0, 10.0, 10.0, 10.0);
        let below = TestShape::new("b", 10.0, 100.0, 10.0, 10.0);
        let above = TestShape::new("t", 10.0, -100.0, 10.0, 10.0);
        let none = PortPreference::default();

        assert_eq!(
            choose_ports_by_direction(&origin, &right, none),
            (PortPosition::Right, PortPosition::Left)
        );
        assert_eq!(
            choose_ports_by_direction(&origin, &left, none),
            (PortPosition::Left, PortPosition::Right)
        );
        assert_eq!(
            choose_ports_by_direction(&origin, &below, none),
            (PortPosition::Bottom, PortPosition::Top)
        );
        assert_eq!(
            choose_ports_by_direction(&origin, &above, none),
            (PortPosition::Top, PortPosition::Bottom)
        );
    }

    #[test]
    fn test_choose_ports_preference() {
        let a = TestShape::new("a", 0.0, 0.0, 10.0, 10.0);
        let b = TestShape::new("b", 100.0, 0.0, 10.0, 10.0);

        let both = PortPreference::new(PortPosition::Top, PortPosition::Top);
        assert_eq!(
            choose_ports_by_direction(&a, &b, both),
            (PortPosition::Top, PortPosition::Top)
        );

        // A one-sided preference is ignored.
        let partial = PortPreference {
            source: Some(PortPosition::Bottom),
            target: None,
        };
        assert_eq!(
            choose_ports_by_direction(&a, &b, partial),
            (PortPosition::Right, PortPosition::Left)
        );
    }

    #[test]
    fn test_find_best_ports() {
        let a = TestShape::new("a", 0.0, 0.0, 20.0, 20.0);
        let b = TestShape::new("b", 0.0, 100.0, 20.0, 20.0);
        let (source, target) = find_best_ports(&a, &b, PortPreference::default());
        assert_eq!(source.point(), Point::new(10.0, 20.0));
        assert_eq!(target.point(), Point::new(10.0, 100.0));
    }

    #[test]
    fn test_port_angle_diagonals() {
        assert_approx_eq!(f32, port_angle(PortPosition::BottomRight), 45.0);
        assert_approx_eq!(f32, port_angle(PortPosition::BottomLeft), 135.0);
        assert_approx_eq!(f32, port_angle(PortPosition::TopLeft), -135.0);
        assert_approx_eq!(f32, port_angle(PortPosition::TopRight), -45.0);
    }

    #[test]
    fn test_port_position_from_str() {
        for position in PortPosition::ALL {
            assert_eq!(position.name().parse::<PortPosition>(), Ok(position));
        }
        assert!("middle".parse::<PortPosition>().is_err());
    }
}
