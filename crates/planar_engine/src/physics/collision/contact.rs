//! Narrow-phase collision and contact normals
//!
//! [`collide`] dispatches on the shape pair with an exhaustive match. Every
//! routine reports touching shapes as colliding and always produces unit
//! normals, falling back to a fixed axis when the geometry has no preferred
//! direction (coincident circle centers, a circle center inside a rect).

use super::primitives::{Circle, Rect};
use super::shape::Shape;
use crate::foundation::math::{utils, Vec2};

/// Normals of a colliding shape pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Leaves shape A, pointing toward shape B
    pub normal_a: Vec2,
    /// Leaves shape B, pointing toward shape A
    pub normal_b: Vec2,
}

impl Contact {
    fn from_a(normal_a: Vec2) -> Self {
        Self {
            normal_a,
            normal_b: -normal_a,
        }
    }

    /// Same contact seen from the other participant
    pub fn swapped(self) -> Self {
        Self {
            normal_a: self.normal_b,
            normal_b: self.normal_a,
        }
    }
}

/// Test two world-space shapes, returning contact normals on overlap
pub fn collide(a: &Shape, b: &Shape) -> Option<Contact> {
    match (a, b) {
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle(a, b),
        (Shape::Rect(a), Shape::Circle(b)) => rect_circle(a, b),
        (Shape::Circle(a), Shape::Rect(b)) => rect_circle(b, a).map(Contact::swapped),
        (Shape::Rect(a), Shape::Rect(b)) => rect_rect(a, b),
    }
}

/// Circle against circle; A's normal runs along the center line
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<Contact> {
    if !a.intersects(b) {
        return None;
    }
    let normal = utils::try_normalize(b.center - a.center).unwrap_or_else(Vec2::x);
    Some(Contact::from_a(normal))
}

/// Rectangle (A) against circle (B)
///
/// The rect normal is the per-axis sign of the offset from the closest point
/// to the circle center, normalized: axis-aligned when the center is outside
/// on one axis, diagonal when outside on both. The circle normal points from
/// its center toward the closest point. A center inside the rect pushes out
/// through the face of least penetration.
pub fn rect_circle(rect: &Rect, circle: &Circle) -> Option<Contact> {
    if !circle.intersects_rect(rect) {
        return None;
    }

    let closest = rect.closest_point(circle.center);
    let offset = circle.center - closest;
    let signs = Vec2::new(utils::axis_sign(offset.x), utils::axis_sign(offset.y));

    match (utils::try_normalize(signs), utils::try_normalize(offset)) {
        (Some(normal_rect), Some(toward_center)) => Some(Contact {
            normal_a: normal_rect,
            normal_b: -toward_center,
        }),
        _ => Some(Contact::from_a(least_penetration_face(rect, circle.center))),
    }
}

/// Rectangle against rectangle with a separating-axis test
///
/// The normal lies along the axis of least overlap, oriented from A's
/// center toward B's.
pub fn rect_rect(a: &Rect, b: &Rect) -> Option<Contact> {
    let overlap = a.overlap(b);
    if overlap.x < 0.0 || overlap.y < 0.0 {
        return None;
    }

    let between = b.center() - a.center();
    let normal = if overlap.x <= overlap.y {
        Vec2::new(direction(between.x), 0.0)
    } else {
        Vec2::new(0.0, direction(between.y))
    };
    Some(Contact::from_a(normal))
}

fn direction(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Outward normal of the face nearest to `point`, which lies inside `rect`
fn least_penetration_face(rect: &Rect, point: Vec2) -> Vec2 {
    let faces = [
        (rect.max.x - point.x, Vec2::new(1.0, 0.0)),
        (point.x - rect.min.x, Vec2::new(-1.0, 0.0)),
        (rect.max.y - point.y, Vec2::new(0.0, 1.0)),
        (point.y - rect.min.y, Vec2::new(0.0, -1.0)),
    ];
    faces
        .iter()
        .fold(faces[0], |best, face| if face.0 < best.0 { *face } else { best })
        .1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_rect() -> Rect {
        Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0))
    }

    #[test]
    fn test_circle_circle_normals_are_opposed() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 1.0);
        let b = Circle::new(Vec2::new(0.0, 1.5), 1.0);
        let contact = circle_circle(&a, &b).unwrap();

        assert_relative_eq!(contact.normal_a, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.normal_b, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_circle_circle_touching_and_apart() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 1.5);
        assert!(circle_circle(&a, &Circle::new(Vec2::new(4.0, 0.0), 2.5)).is_some());
        assert!(circle_circle(&a, &Circle::new(Vec2::new(4.001, 0.0), 2.5)).is_none());
    }

    #[test]
    fn test_coincident_circles_fall_back_to_x_axis() {
        let a = Circle::new(Vec2::new(3.0, 3.0), 1.0);
        let contact = circle_circle(&a, &a).unwrap();
        assert_relative_eq!(contact.normal_a, Vec2::new(1.0, 0.0));
        assert_relative_eq!(contact.normal_b, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rect_normal_is_axis_aligned_outside_on_one_axis() {
        let circle = Circle::new(Vec2::new(2.5, 1.2), 1.0);
        let contact = rect_circle(&unit_rect(), &circle).unwrap();

        assert_relative_eq!(contact.normal_a, Vec2::new(1.0, 0.0));
        assert_relative_eq!(contact.normal_a.magnitude(), 1.0);
        assert_relative_eq!(contact.normal_b, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rect_normal_uses_both_axes_at_a_corner() {
        let circle = Circle::new(Vec2::new(2.5, -0.5), 1.0);
        let contact = rect_circle(&unit_rect(), &circle).unwrap();
        let diagonal = std::f32::consts::FRAC_1_SQRT_2;

        assert_relative_eq!(contact.normal_a, Vec2::new(diagonal, -diagonal), epsilon = 1e-6);
        assert_relative_eq!(contact.normal_a.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(contact.normal_b, Vec2::new(-diagonal, diagonal), epsilon = 1e-6);
    }

    #[test]
    fn test_circle_inside_rect_pushes_through_nearest_face() {
        let circle = Circle::new(Vec2::new(1.8, 1.0), 0.5);
        let contact = rect_circle(&unit_rect(), &circle).unwrap();
        assert_relative_eq!(contact.normal_a, Vec2::new(1.0, 0.0));
        assert_relative_eq!(contact.normal_b, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_dispatch_swaps_normals_for_circle_first() {
        let circle = Shape::circle(Vec2::new(-0.5, 1.0), 1.0);
        let rect = Shape::Rect(unit_rect());
        let contact = collide(&circle, &rect).unwrap();

        assert_relative_eq!(contact.normal_a, Vec2::new(1.0, 0.0));
        assert_relative_eq!(contact.normal_b, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rect_rect_least_penetration_axis() {
        let a = unit_rect();
        let b = Rect::new(Vec2::new(1.5, 0.5), Vec2::new(4.0, 1.5));
        let contact = rect_rect(&a, &b).unwrap();
        assert_relative_eq!(contact.normal_a, Vec2::new(1.0, 0.0));

        let above = Rect::new(Vec2::new(0.0, 1.9), Vec2::new(2.0, 3.0));
        let contact = rect_rect(&a, &above).unwrap();
        assert_relative_eq!(contact.normal_a, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.normal_b, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_rect_rect_separated() {
        let a = unit_rect();
        let b = Rect::new(Vec2::new(2.1, 0.0), Vec2::new(3.0, 2.0));
        assert!(rect_rect(&a, &b).is_none());
        let touching = Rect::new(Vec2::new(2.0, 0.0), Vec2::new(3.0, 2.0));
        assert!(rect_rect(&a, &touching).is_some());
    }
}
