//! The shape capability consumed by port calculation and routing.
//!
//! Routing never depends on concrete shape variants. Anything that can report
//! its placement (position, size, scale, rotation) implements
//! [`ShapeGeometry`] and can be connected.

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// Read access to the geometry of a connectable shape.
///
/// `left`/`top` are the unrotated top-left corner, `width`/`height` are the
/// unscaled dimensions. Rotation (`angle`, degrees) happens around the
/// center of the scaled box.
pub trait ShapeGeometry {
    /// Identifier of the shape in its scene.
    fn id(&self) -> Id;

    fn left(&self) -> f32;

    fn top(&self) -> f32;

    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn scale_x(&self) -> f32 {
        1.0
    }

    fn scale_y(&self) -> f32 {
        1.0
    }

    fn angle(&self) -> f32 {
        0.0
    }

    /// Width and height after scaling.
    fn scaled_size(&self) -> Size {
        Size::new(
            self.width() * self.scale_x(),
            self.height() * self.scale_y(),
        )
    }

    /// Center of the scaled box.
    fn center(&self) -> Point {
        let size = self.scaled_size();
        Point::new(
            self.left() + size.width() / 2.0,
            self.top() + size.height() / 2.0,
        )
    }

    /// Axis-aligned bounding rectangle in scene coordinates, rotation included.
    fn bounding_rect(&self) -> Bounds {
        let size = self.scaled_size();
        let unrotated = Bounds::new_from_top_left(Point::new(self.left(), self.top()), size);
        let angle = self.angle();
        if angle == 0.0 {
            return unrotated;
        }

        let center = unrotated.center();
        let corners = [
            Point::new(unrotated.min_x(), unrotated.min_y()),
            Point::new(unrotated.max_x(), unrotated.min_y()),
            Point::new(unrotated.max_x(), unrotated.max_y()),
            Point::new(unrotated.min_x(), unrotated.max_y()),
        ];
        Bounds::enclosing(
            corners
                .into_iter()
                .map(|corner| corner.sub_point(center).rotate_degrees(angle).add_point(center)),
        )
        .unwrap_or(unrotated)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    struct Box2 {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        scale: f32,
        angle: f32,
    }

    impl ShapeGeometry for Box2 {
        fn id(&self) -> Id {
            Id::new("box")
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
            self.scale
        }
        fn scale_y(&self) -> f32 {
            self.scale
        }
        fn angle(&self) -> f32 {
            self.angle
        }
    }

    #[test]
    fn test_scaled_bounding_rect() {
        let shape = Box2 {
            left: 10.0,
            top: 20.0,
            width: 50.0,
            height: 30.0,
            scale: 2.0,
            angle: 0.0,
        };
        let rect = shape.bounding_rect();
        assert_eq!(rect.min_x(), 10.0);
        assert_eq!(rect.min_y(), 20.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 60.0);
        assert_eq!(shape.center(), Point::new(60.0, 50.0));
    }

    #[test]
    fn test_rotated_bounding_rect_swaps_extent() {
        let shape = Box2 {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 20.0,
            scale: 1.0,
            angle: 90.0,
        };
        let rect = shape.bounding_rect();
        assert_approx_eq!(f32, rect.width(), 20.0, epsilon = 1e-3);
        assert_approx_eq!(f32, rect.height(), 100.0, epsilon = 1e-3);
        assert!(rect.center().approx_eq(Point::new(50.0, 10.0)));
    }
}
