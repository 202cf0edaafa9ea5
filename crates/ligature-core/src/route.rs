//! Connector path routing.
//!
//! All routers are pure functions of their inputs. Polyline routers
//! ([`route_straight`], [`route_orthogonal`], [`route_orthogonal_smart`],
//! [`orthogonalize`]) return the vertex list so callers can still smooth or
//! convert it; curve producers return a [`PathGeometry`] directly.
//!
//! # Routing styles
//!
//! | Style | Router | Shape of the result |
//! |-------|--------|---------------------|
//! | `straight` | [`route_straight`] | one segment |
//! | `curved` | [`route_curved`] | one cubic Bezier |
//! | `orthogonal` | [`route_orthogonal`] / [`route_orthogonal_smart`] | three axis-aligned segments |

use std::{fmt, str::FromStr};

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use svg::node::element::path::Data;

use crate::{
    geometry::{Bounds, Point, Transform},
    identifier::Id,
    port::PortPosition,
};

/// Margin kept between a detouring orthogonal route and the obstacle it avoids.
pub const OBSTACLE_CLEARANCE: f32 = 20.0;

/// Default control point offset factor of [`route_curved`].
pub const DEFAULT_CURVATURE: f32 = 0.5;

/// Number of samples used when flattening a curve segment.
const CURVE_SAMPLES: usize = 32;

/// Tension used by [`bezier_through_waypoints`] for its control points.
const WAYPOINT_TENSION: f32 = 0.3;

/// How a connector between two endpoints is routed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingStyle {
    /// A single straight segment (default)
    #[default]
    Straight,
    /// A single cubic Bezier curve
    Curved,
    /// Horizontal and vertical segments only
    Orthogonal,
}

impl RoutingStyle {
    fn name(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Curved => "curved",
            Self::Orthogonal => "orthogonal",
        }
    }
}

impl FromStr for RoutingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "curved" => Ok(Self::Curved),
            "orthogonal" => Ok(Self::Orthogonal),
            _ => Err(format!(
                "invalid routing style `{s}`, valid values: straight, curved, orthogonal"
            )),
        }
    }
}

impl fmt::Display for RoutingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single drawing command of a [`PathGeometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic Bezier from the current point.
    QuadTo { ctrl: Point, to: Point },
    /// Cubic Bezier from the current point.
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
}

impl PathCommand {
    /// The point this command ends at.
    pub fn end_point(&self) -> Point {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => p,
            Self::QuadTo { to, .. } | Self::CubicTo { to, .. } => to,
        }
    }

    fn map(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::QuadTo { ctrl, to } => Self::QuadTo {
                ctrl: f(ctrl),
                to: f(to),
            },
            Self::CubicTo { ctrl1, ctrl2, to } => Self::CubicTo {
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
                to: f(to),
            },
        }
    }
}

/// Structured path geometry produced by the routers.
///
/// A path always starts with a [`PathCommand::MoveTo`] unless it is empty.
///
/// # Examples
///
/// ```
/// use ligature_core::{geometry::Point, route::points_to_path};
///
/// let path = points_to_path(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
/// assert_eq!(path.to_string(), "M 0 0 L 100 0");
/// assert_eq!(path.length(), 100.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    commands: Vec<PathCommand>,
}

impl PathGeometry {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First point of the path.
    pub fn start(&self) -> Option<Point> {
        self.commands.first().map(PathCommand::end_point)
    }

    /// Last point of the path.
    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(PathCommand::end_point)
    }

    /// End points of every command, control points excluded.
    pub fn vertices(&self) -> Vec<Point> {
        self.commands.iter().map(PathCommand::end_point).collect()
    }

    /// Approximates the path by a polyline, sampling every curve segment.
    pub fn flatten(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.commands.len());
        let mut current = Point::default();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
                PathCommand::QuadTo { ctrl, to } => {
                    points.extend(
                        (1..=CURVE_SAMPLES)
                            .map(|i| quad_point(current, ctrl, to, i as f32 / CURVE_SAMPLES as f32)),
                    );
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    points.extend((1..=CURVE_SAMPLES).map(|i| {
                        cubic_point(current, ctrl1, ctrl2, to, i as f32 / CURVE_SAMPLES as f32)
                    }));
                }
            }
            current = command.end_point();
        }
        points
    }

    /// Total drawn length. Curves are measured on their flattened polyline.
    pub fn length(&self) -> f32 {
        let mut length = 0.0;
        let mut current: Option<Point> = None;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => current = Some(p),
                PathCommand::LineTo(p) => {
                    if let Some(from) = current {
                        length += from.distance_to(p);
                    }
                    current = Some(p);
                }
                PathCommand::QuadTo { ctrl, to } => {
                    let from = current.unwrap_or(ctrl);
                    let samples = (0..=CURVE_SAMPLES)
                        .map(|i| quad_point(from, ctrl, to, i as f32 / CURVE_SAMPLES as f32));
                    length += polyline_length(&samples.collect::<Vec<_>>());
                    current = Some(to);
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    let from = current.unwrap_or(ctrl1);
                    let samples = (0..=CURVE_SAMPLES).map(|i| {
                        cubic_point(from, ctrl1, ctrl2, to, i as f32 / CURVE_SAMPLES as f32)
                    });
                    length += polyline_length(&samples.collect::<Vec<_>>());
                    current = Some(to);
                }
            }
        }
        length
    }

    /// Bounds of the path including control points.
    ///
    /// A Bezier curve lies inside the hull of its control points, so these
    /// bounds always contain the drawn path.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.commands.iter().flat_map(|command| match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::QuadTo { ctrl, to } => vec![ctrl, to],
            PathCommand::CubicTo { ctrl1, ctrl2, to } => vec![ctrl1, ctrl2, to],
        }))
    }

    /// Direction the path travels when it reaches its end point.
    ///
    /// Computed from the nearest distinct control point or vertex before the
    /// end. Falls back to `end - start`, then to `+X`.
    pub fn end_direction(&self) -> Point {
        let Some(end) = self.end() else {
            return Point::new(1.0, 0.0);
        };

        let last = self.commands.len() - 1;
        let mut candidates = Vec::with_capacity(4);
        match self.commands[last] {
            PathCommand::CubicTo { ctrl1, ctrl2, .. } => candidates.extend([ctrl2, ctrl1]),
            PathCommand::QuadTo { ctrl, .. } => candidates.push(ctrl),
            _ => {}
        }
        candidates.extend(self.commands[..last].iter().rev().map(PathCommand::end_point));

        self.direction_from(end, candidates, |start| end.sub_point(start), Point::new(1.0, 0.0))
    }

    /// Direction pointing away from the path at its start point.
    ///
    /// The mirror of [`end_direction`](Self::end_direction): a start marker
    /// oriented along this vector points outward.
    pub fn start_direction(&self) -> Point {
        let Some(start) = self.start() else {
            return Point::new(-1.0, 0.0);
        };

        let mut candidates = Vec::with_capacity(4);
        for command in self.commands.iter().skip(1) {
            match *command {
                PathCommand::CubicTo { ctrl1, ctrl2, to } => candidates.extend([ctrl1, ctrl2, to]),
                PathCommand::QuadTo { ctrl, to } => candidates.extend([ctrl, to]),
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => candidates.push(p),
            }
        }

        let end = self.end().unwrap_or(start);
        self.direction_from(start, candidates, |_| start.sub_point(end), Point::new(-1.0, 0.0))
    }

    fn direction_from(
        &self,
        anchor: Point,
        candidates: Vec<Point>,
        fallback: impl Fn(Point) -> Point,
        last_resort: Point,
    ) -> Point {
        if let Some(neighbor) = candidates.into_iter().find(|p| !p.approx_eq(anchor)) {
            return anchor.sub_point(neighbor);
        }
        let start = self.start().unwrap_or(anchor);
        let vector = fallback(start);
        if vector.hypot() > 0.0 {
            vector
        } else {
            last_resort
        }
    }

    /// Maps every point of the path, control points included, through `transform`.
    pub fn transform(&self, transform: &Transform) -> Self {
        Self {
            commands: self
                .commands
                .iter()
                .map(|command| command.map(|p| transform.apply(p)))
                .collect(),
        }
    }

    /// Converts the path into SVG path data.
    pub fn to_svg_data(&self) -> Data {
        self.commands
            .iter()
            .fold(Data::new(), |data, command| match *command {
                PathCommand::MoveTo(p) => data.move_to(vec![p.x(), p.y()]),
                PathCommand::LineTo(p) => data.line_to(vec![p.x(), p.y()]),
                PathCommand::QuadTo { ctrl, to } => {
                    data.quadratic_curve_to(vec![ctrl.x(), ctrl.y(), to.x(), to.y()])
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => data.cubic_curve_to(vec![
                    ctrl1.x(),
                    ctrl1.y(),
                    ctrl2.x(),
                    ctrl2.y(),
                    to.x(),
                    to.y(),
                ]),
            })
    }
}

impl fmt::Display for PathGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, command) in self.commands.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match *command {
                PathCommand::MoveTo(p) => write!(f, "M {} {}", p.x(), p.y())?,
                PathCommand::LineTo(p) => write!(f, "L {} {}", p.x(), p.y())?,
                PathCommand::QuadTo { ctrl, to } => {
                    write!(f, "Q {} {}, {} {}", ctrl.x(), ctrl.y(), to.x(), to.y())?
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                    f,
                    "C {} {}, {} {}, {} {}",
                    ctrl1.x(),
                    ctrl1.y(),
                    ctrl2.x(),
                    ctrl2.y(),
                    to.x(),
                    to.y()
                )?,
            }
        }
        Ok(())
    }
}

/// An obstacle considered by [`route_orthogonal_smart`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: Id,
    pub bounds: Bounds,
}

impl Obstacle {
    pub fn new(id: Id, bounds: Bounds) -> Self {
        Self { id, bounds }
    }
}

/// Straight two-point route.
pub fn route_straight(start: Point, end: Point) -> Vec<Point> {
    vec![start, end]
}

/// Single cubic Bezier between `start` and `end`.
///
/// Both control points are offset horizontally by `distance * curvature`,
/// whatever the orientation of the two endpoints.
///
/// ```
/// use ligature_core::{geometry::Point, route::route_curved};
///
/// let path = route_curved(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0.5);
/// assert_eq!(path.to_string(), "M 0 0 C 50 0, 50 0, 100 0");
/// ```
pub fn route_curved(start: Point, end: Point, curvature: f32) -> PathGeometry {
    let offset = start.distance_to(end) * curvature;
    PathGeometry::new(vec![
        PathCommand::MoveTo(start),
        PathCommand::CubicTo {
            ctrl1: Point::new(start.x() + offset, start.y()),
            ctrl2: Point::new(end.x() - offset, end.y()),
            to: end,
        },
    ])
}

/// Orthogonal route with three segments through the midpoint.
///
/// When the horizontal distance dominates the route goes horizontal,
/// vertical, horizontal through the horizontal midpoint; otherwise vertical,
/// horizontal, vertical through the vertical midpoint. The port hints do not
/// affect the result.
pub fn route_orthogonal(
    start: Point,
    end: Point,
    _start_port: Option<PortPosition>,
    _end_port: Option<PortPosition>,
) -> Vec<Point> {
    let abs_dist = end.sub_point(start).abs();
    let mid = start.midpoint(end);

    if abs_dist.x() > abs_dist.y() {
        vec![
            start,
            Point::new(mid.x(), start.y()),
            Point::new(mid.x(), end.y()),
            end,
        ]
    } else {
        vec![
            start,
            Point::new(start.x(), mid.y()),
            Point::new(end.x(), mid.y()),
            end,
        ]
    }
}

/// Orthogonal route that steps around the first obstacle blocking the simple route.
///
/// Obstacles listed in `exclude` (typically the two connected shapes) are
/// ignored, as are obstacles whose bounds, expanded by
/// [`OBSTACLE_CLEARANCE`], do not touch the box spanned by the endpoints.
/// Without relevant obstacles this is [`route_orthogonal`].
///
/// A blocked route moves its middle channel next to the obstacle. The route's
/// own orientation is tried first, on the side where the start point lies,
/// then the opposite side, then the perpendicular orientation. The first
/// candidate whose segments cross no obstacle wins; when none clears, the
/// simple route is returned.
pub fn route_orthogonal_smart<I>(
    obstacles: I,
    start: Point,
    end: Point,
    start_port: Option<PortPosition>,
    end_port: Option<PortPosition>,
    exclude: &[Id],
) -> Vec<Point>
where
    I: IntoIterator<Item = Obstacle>,
{
    let simple = route_orthogonal(start, end, start_port, end_port);
    let route_box = Bounds::from_corners(start, end);

    let candidates: Vec<Obstacle> = obstacles
        .into_iter()
        .filter(|obstacle| !exclude.contains(&obstacle.id))
        .collect();
    let blocking = candidates
        .iter()
        .filter(|obstacle| obstacle.bounds.expand(OBSTACLE_CLEARANCE).intersects(&route_box))
        .find(|obstacle| route_crosses(&simple, &obstacle.bounds));
    let Some(blocking) = blocking else {
        return simple;
    };

    trace!(obstacle:% = blocking.id, bounds:? = blocking.bounds; "Detouring orthogonal route");

    let channel = blocking.bounds.expand(OBSTACLE_CLEARANCE);
    let center = blocking.bounds.center();
    let abs_dist = end.sub_point(start).abs();

    let (top_first, left_first) = (start.y() < center.y(), start.x() < center.x());
    let horizontal_channels = if top_first {
        [channel.min_y(), channel.max_y()]
    } else {
        [channel.max_y(), channel.min_y()]
    }
    .map(|y| vec![start, Point::new(start.x(), y), Point::new(end.x(), y), end]);
    let vertical_channels = if left_first {
        [channel.min_x(), channel.max_x()]
    } else {
        [channel.max_x(), channel.min_x()]
    }
    .map(|x| vec![start, Point::new(x, start.y()), Point::new(x, end.y()), end]);

    let detours = if abs_dist.y() >= abs_dist.x() {
        horizontal_channels.into_iter().chain(vertical_channels)
    } else {
        vertical_channels.into_iter().chain(horizontal_channels)
    };

    for detour in detours {
        if !candidates
            .iter()
            .any(|obstacle| route_crosses(&detour, &obstacle.bounds))
        {
            return detour;
        }
    }

    debug!(obstacle:% = blocking.id; "No detour clears the obstacles, keeping the simple route");
    simple
}

fn route_crosses(points: &[Point], bounds: &Bounds) -> bool {
    points
        .windows(2)
        .any(|segment| segment_crosses(segment[0], segment[1], bounds))
}

/// Returns true when the segment `from`-`to` overlaps the interior of `bounds`.
///
/// Touching an edge does not count as crossing.
fn segment_crosses(from: Point, to: Point, bounds: &Bounds) -> bool {
    let segment = Bounds::from_corners(from, to);
    segment.min_x() < bounds.max_x()
        && segment.max_x() > bounds.min_x()
        && segment.min_y() < bounds.max_y()
        && segment.max_y() > bounds.min_y()
}

/// Converts an orthogonal polyline into a path with rounded corners.
///
/// Each interior vertex becomes a quadratic curve whose radius is clamped to
/// half of the shorter adjacent segment. Fewer than three points give a
/// plain polyline.
pub fn smooth_orthogonal_path(points: &[Point], corner_radius: f32) -> PathGeometry {
    if points.len() < 3 {
        return points_to_path(points);
    }

    let mut commands = Vec::with_capacity(points.len() * 2);
    commands.push(PathCommand::MoveTo(points[0]));

    for window in points.windows(3) {
        let (prev, corner, next) = (window[0], window[1], window[2]);
        let len_in = prev.distance_to(corner);
        let len_out = corner.distance_to(next);
        let radius = corner_radius.min(len_in / 2.0).min(len_out / 2.0).max(0.0);

        if radius <= 0.0 {
            commands.push(PathCommand::LineTo(corner));
            continue;
        }

        let before = corner.lerp(prev, radius / len_in);
        let after = corner.lerp(next, radius / len_out);
        commands.push(PathCommand::LineTo(before));
        commands.push(PathCommand::QuadTo {
            ctrl: corner,
            to: after,
        });
    }

    commands.push(PathCommand::LineTo(points[points.len() - 1]));
    PathGeometry::new(commands)
}

/// Smooth multi-segment cubic path passing through every point.
///
/// No points give an empty path, one point a lone move, two points a straight
/// line.
pub fn bezier_through_waypoints(points: &[Point]) -> PathGeometry {
    let n = points.len();
    match n {
        0 => return PathGeometry::default(),
        1 => return PathGeometry::new(vec![PathCommand::MoveTo(points[0])]),
        2 => return points_to_path(points),
        _ => {}
    }

    let mut commands = Vec::with_capacity(n);
    commands.push(PathCommand::MoveTo(points[0]));

    for i in 0..n - 1 {
        let (ctrl1, ctrl2) = if i == 0 {
            (
                points[0].add_point(points[1].sub_point(points[0]).scale(WAYPOINT_TENSION)),
                points[1].sub_point(points[2].sub_point(points[0]).scale(WAYPOINT_TENSION)),
            )
        } else if i == n - 2 {
            (
                points[n - 2].add_point(points[n - 1].sub_point(points[n - 3]).scale(WAYPOINT_TENSION)),
                points[n - 2].add_point(points[n - 1].sub_point(points[n - 2]).scale(0.5)),
            )
        } else {
            (
                points[i].add_point(points[i + 1].sub_point(points[i - 1]).scale(WAYPOINT_TENSION)),
                points[i + 1].sub_point(points[i + 2].sub_point(points[i]).scale(WAYPOINT_TENSION)),
            )
        };
        commands.push(PathCommand::CubicTo {
            ctrl1,
            ctrl2,
            to: points[i + 1],
        });
    }

    PathGeometry::new(commands)
}

/// Polyline through `points`.
pub fn points_to_path(points: &[Point]) -> PathGeometry {
    let mut commands = Vec::with_capacity(points.len());
    if let Some((first, rest)) = points.split_first() {
        commands.push(PathCommand::MoveTo(*first));
        commands.extend(rest.iter().map(|p| PathCommand::LineTo(*p)));
    }
    PathGeometry::new(commands)
}

/// Makes a freehand polyline orthogonal.
///
/// An elbow is inserted between consecutive points that share neither
/// coordinate, going horizontal first when the horizontal distance is at
/// least the vertical one. Repeated points are dropped.
///
/// ```
/// use ligature_core::{geometry::Point, route::orthogonalize};
///
/// let points = orthogonalize(&[Point::new(0.0, 0.0), Point::new(50.0, 20.0)]);
/// assert_eq!(
///     points,
///     vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(50.0, 20.0)]
/// );
/// ```
pub fn orthogonalize(points: &[Point]) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len() * 2);
    for &point in points {
        let Some(&last) = result.last() else {
            result.push(point);
            continue;
        };
        if point.approx_eq(last) {
            continue;
        }

        let delta = point.sub_point(last).abs();
        let aligned = delta.x() <= crate::geometry::EPSILON || delta.y() <= crate::geometry::EPSILON;
        if !aligned {
            let elbow = if delta.x() >= delta.y() {
                Point::new(point.x(), last.y())
            } else {
                Point::new(last.x(), point.y())
            };
            result.push(elbow);
        }
        result.push(point);
    }
    result
}

/// Sum of the segment lengths of a polyline.
pub fn polyline_length(points: &[Point]) -> f32 {
    points
        .windows(2)
        .map(|segment| segment[0].distance_to(segment[1]))
        .sum()
}

fn quad_point(from: Point, ctrl: Point, to: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    from.scale(mt * mt)
        .add_point(ctrl.scale(2.0 * mt * t))
        .add_point(to.scale(t * t))
}

fn cubic_point(from: Point, ctrl1: Point, ctrl2: Point, to: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    from.scale(mt * mt * mt)
        .add_point(ctrl1.scale(3.0 * mt * mt * t))
        .add_point(ctrl2.scale(3.0 * mt * t * t))
        .add_point(to.scale(t * t * t))
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn polyline_strategy() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec(point_strategy(), 0..8)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A straight route is exactly as long as the endpoint distance.
    fn check_straight_length(a: Point, b: Point) -> Result<(), TestCaseError> {
        let path = points_to_path(&route_straight(a, b));
        prop_assert!(approx_eq!(
            f32,
            path.length(),
            a.distance_to(b),
            epsilon = 1e-3
        ));
        Ok(())
    }

    /// Orthogonal routes only use axis-aligned segments and are never shorter
    /// than the direct distance.
    fn check_orthogonal_route(a: Point, b: Point) -> Result<(), TestCaseError> {
        let points = route_orthogonal(a, b, None, None);
        prop_assert_eq!(points.first().copied(), Some(a));
        prop_assert_eq!(points.last().copied(), Some(b));
        for segment in points.windows(2) {
            prop_assert!(segment[0].x() == segment[1].x() || segment[0].y() == segment[1].y());
        }
        prop_assert!(polyline_length(&points) + 1e-2 >= a.distance_to(b));
        Ok(())
    }

    /// Corner curves never reach past the middle of an adjacent segment.
    fn check_smoothing_radius(points: Vec<Point>, radius: f32) -> Result<(), TestCaseError> {
        let orthogonal = orthogonalize(&points);
        let path = smooth_orthogonal_path(&orthogonal, radius);
        let commands = path.commands();
        for (idx, command) in commands.iter().enumerate() {
            if let PathCommand::QuadTo { ctrl, to } = *command {
                let before = commands[idx - 1].end_point();
                let used_in = before.distance_to(ctrl);
                let used_out = to.distance_to(ctrl);
                prop_assert!(used_in <= radius + 1e-2);
                prop_assert!(used_out <= radius + 1e-2);

                let fits_a_corner = (1..orthogonal.len() - 1).any(|i| {
                    orthogonal[i] == ctrl
                        && used_in <= orthogonal[i - 1].distance_to(ctrl) / 2.0 + 1e-2
                        && used_out <= orthogonal[i + 1].distance_to(ctrl) / 2.0 + 1e-2
                });
                prop_assert!(fits_a_corner);
            }
        }
        Ok(())
    }

    /// Orthogonalized polylines keep every input point and are axis-aligned.
    fn check_orthogonalize(points: Vec<Point>) -> Result<(), TestCaseError> {
        let result = orthogonalize(&points);
        for segment in result.windows(2) {
            let delta = segment[1].sub_point(segment[0]).abs();
            prop_assert!(
                delta.x() <= crate::geometry::EPSILON || delta.y() <= crate::geometry::EPSILON
            );
        }
        for p in &points {
            prop_assert!(result.iter().any(|r| r.approx_eq(*p)));
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn straight_length(a in point_strategy(), b in point_strategy()) {
            check_straight_length(a, b)?;
        }

        #[test]
        fn orthogonal_route(a in point_strategy(), b in point_strategy()) {
            check_orthogonal_route(a, b)?;
        }

        #[test]
        fn smoothing_radius(points in polyline_strategy(), radius in 0.0f32..100.0) {
            check_smoothing_radius(points, radius)?;
        }

        #[test]
        fn orthogonalize_is_axis_aligned(points in polyline_strategy()) {
            check_orthogonalize(points)?;
        }
    }
}
