//! Connector endpoint markers.
//!
//! A marker is a small polygon whose tip sits exactly on a connector endpoint
//! and which points along the connector's direction at that endpoint. All
//! glyphs are defined tip-at-origin pointing toward `+X`, then rotated and
//! translated into place.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    geometry::{Bounds, Point},
};

/// Default marker size in scene units.
pub const DEFAULT_MARKER_SIZE: f32 = 10.0;

/// Number of sides used to approximate a circle marker.
const CIRCLE_SIDES: usize = 8;

/// Glyph drawn at a connector endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    #[default]
    None,
    /// Filled triangle
    Arrow,
    /// Outlined triangle
    OpenArrow,
    Diamond,
    Circle,
    /// Filled square
    Block,
    /// Short bar across the line
    Tee,
}

impl MarkerKind {
    fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Arrow => "arrow",
            Self::OpenArrow => "open-arrow",
            Self::Diamond => "diamond",
            Self::Circle => "circle",
            Self::Block => "block",
            Self::Tee => "tee",
        }
    }

    /// Returns true for every kind except [`MarkerKind::None`].
    pub fn is_visible(self) -> bool {
        self != Self::None
    }

    /// Outline of the glyph in local space, tip at the origin pointing to `+X`.
    fn outline(self, size: f32) -> Vec<Point> {
        let half = size / 2.0;
        match self {
            Self::None => Vec::new(),
            Self::Arrow | Self::OpenArrow => vec![
                Point::new(0.0, 0.0),
                Point::new(-size, -half),
                Point::new(-size, half),
            ],
            Self::Diamond => vec![
                Point::new(0.0, 0.0),
                Point::new(-half, -size / 3.0),
                Point::new(-size, 0.0),
                Point::new(-half, size / 3.0),
            ],
            Self::Circle => {
                let center = Point::new(-half, 0.0);
                (0..CIRCLE_SIDES)
                    .map(|i| {
                        let angle = 360.0 * i as f32 / CIRCLE_SIDES as f32;
                        Point::new(half, 0.0)
                            .rotate_degrees(angle)
                            .add_point(center)
                    })
                    .collect()
            }
            Self::Block => vec![
                Point::new(0.0, -half),
                Point::new(0.0, half),
                Point::new(-size, half),
                Point::new(-size, -half),
            ],
            Self::Tee => {
                let depth = size / 5.0;
                vec![
                    Point::new(0.0, -half),
                    Point::new(0.0, half),
                    Point::new(-depth, half),
                    Point::new(-depth, -half),
                ]
            }
        }
    }
}

impl FromStr for MarkerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "arrow" => Ok(Self::Arrow),
            "open-arrow" => Ok(Self::OpenArrow),
            "diamond" => Ok(Self::Diamond),
            "circle" => Ok(Self::Circle),
            "block" => Ok(Self::Block),
            "tee" => Ok(Self::Tee),
            _ => Err(format!(
                "invalid marker `{s}`, valid values: none, arrow, open-arrow, diamond, circle, block, tee"
            )),
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A placed endpoint marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    kind: MarkerKind,
    points: Vec<Point>,
    fill: Option<Color>,
    stroke: Color,
    angle: f32,
}

impl Marker {
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Polygon vertices in scene coordinates.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Fill color, `None` for outlined glyphs.
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Color {
        self.stroke
    }

    /// Orientation of the marker in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// The tip of the marker, which is the connector endpoint it decorates.
    pub fn tip(&self) -> Point {
        match self.kind {
            // Square glyphs have no vertex at the tip: it is the middle of the front edge.
            MarkerKind::Block | MarkerKind::Tee => self.points[0].midpoint(self.points[1]),
            // The circle touches the endpoint with its first vertex.
            _ => self.points[0],
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::enclosing(self.points.iter().copied()).unwrap_or_default()
    }

    /// SVG `points` attribute value of the polygon.
    pub fn svg_points(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.x(), p.y()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds a marker of `kind` with its tip at `at`, oriented along `angle` degrees.
///
/// Returns `None` for [`MarkerKind::None`]. Open arrows are outlined only;
/// every other glyph is filled with `color`.
///
/// # Examples
///
/// ```
/// use ligature_core::{
///     color::Color,
///     geometry::Point,
///     marker::{create_marker, MarkerKind, DEFAULT_MARKER_SIZE},
/// };
///
/// let color = Color::default();
/// let arrow = create_marker(
///     Point::new(100.0, 0.0),
///     0.0,
///     MarkerKind::Arrow,
///     color,
///     DEFAULT_MARKER_SIZE,
/// )
/// .unwrap();
/// assert_eq!(arrow.points()[0], Point::new(100.0, 0.0));
/// assert!(create_marker(Point::default(), 0.0, MarkerKind::None, color, 10.0).is_none());
/// ```
pub fn create_marker(
    at: Point,
    angle: f32,
    kind: MarkerKind,
    color: Color,
    size: f32,
) -> Option<Marker> {
    if !kind.is_visible() {
        return None;
    }

    let points = kind
        .outline(size)
        .into_iter()
        .map(|p| p.rotate_degrees(angle).add_point(at))
        .collect();
    let fill = (kind != MarkerKind::OpenArrow).then_some(color);

    Some(Marker {
        kind,
        points,
        fill,
        stroke: color,
        angle,
    })
}

/// Marker orientation in degrees for a direction vector.
pub fn marker_angle(direction: Point) -> f32 {
    direction.angle_degrees()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn black() -> Color {
        Color::default()
    }

    #[test]
    fn test_marker_kind_from_str() {
        assert_eq!("open-arrow".parse::<MarkerKind>().unwrap(), MarkerKind::OpenArrow);
        assert_eq!("tee".parse::<MarkerKind>().unwrap(), MarkerKind::Tee);
        assert!("star".parse::<MarkerKind>().is_err());
        assert_eq!(MarkerKind::OpenArrow.to_string(), "open-arrow");
    }

    #[test]
    fn test_none_marker() {
        assert!(create_marker(Point::new(1.0, 1.0), 45.0, MarkerKind::None, black(), 10.0).is_none());
    }

    #[test]
    fn test_arrow_points_along_angle() {
        let marker =
            create_marker(Point::new(50.0, 50.0), 90.0, MarkerKind::Arrow, black(), 10.0).unwrap();
        let points = marker.points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Point::new(50.0, 50.0));
        // Pointing down, the base lies above the tip.
        assert_approx_eq!(f32, points[1].y(), 40.0, epsilon = 1e-3);
        assert_approx_eq!(f32, points[2].y(), 40.0, epsilon = 1e-3);
        assert_approx_eq!(f32, points[1].x(), 55.0, epsilon = 1e-3);
        assert_approx_eq!(f32, points[2].x(), 45.0, epsilon = 1e-3);
        assert_eq!(marker.fill(), Some(black()));
        assert_eq!(marker.angle(), 90.0);
    }

    #[test]
    fn test_open_arrow_is_unfilled() {
        let marker =
            create_marker(Point::default(), 0.0, MarkerKind::OpenArrow, black(), 10.0).unwrap();
        assert_eq!(marker.fill(), None);
        assert_eq!(marker.stroke(), black());
    }

    #[test]
    fn test_circle_has_eight_sides() {
        let marker =
            create_marker(Point::new(10.0, 0.0), 0.0, MarkerKind::Circle, black(), 10.0).unwrap();
        assert_eq!(marker.points().len(), 8);
        assert!(marker.tip().approx_eq(Point::new(10.0, 0.0)));
        let bounds = marker.bounds();
        assert_approx_eq!(f32, bounds.width(), 10.0, epsilon = 1e-3);
        assert_approx_eq!(f32, bounds.center().x(), 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_block_and_tee_tip() {
        for kind in [MarkerKind::Block, MarkerKind::Tee] {
            let marker = create_marker(Point::new(3.0, 4.0), 180.0, kind, black(), 10.0).unwrap();
            assert!(marker.tip().approx_eq(Point::new(3.0, 4.0)));
            // Rotated by 180 degrees, the body extends to the right of the tip.
            assert!(marker.bounds().max_x() > 3.0);
        }
    }

    #[test]
    fn test_diamond_bounds() {
        let marker =
            create_marker(Point::new(0.0, 0.0), 0.0, MarkerKind::Diamond, black(), 12.0).unwrap();
        let bounds = marker.bounds();
        assert_eq!(bounds.min_x(), -12.0);
        assert_eq!(bounds.max_x(), 0.0);
        assert_approx_eq!(f32, bounds.height(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_marker_angle() {
        assert_eq!(marker_angle(Point::new(1.0, 0.0)), 0.0);
        assert_eq!(marker_angle(Point::new(0.0, 1.0)), 90.0);
        assert_eq!(marker_angle(Point::new(-1.0, 0.0)), 180.0);
        assert_eq!(marker_angle(Point::new(0.0, -1.0)), -90.0);
    }

    #[test]
    fn test_svg_points() {
        let marker =
            create_marker(Point::new(10.0, 0.0), 0.0, MarkerKind::Arrow, black(), 10.0).unwrap();
        assert_eq!(marker.svg_points(), "10,0 0,-5 0,5");
    }
}
