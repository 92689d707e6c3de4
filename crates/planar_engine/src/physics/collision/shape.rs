//! Collider shape abstraction
//!
//! Shapes are stored in local space on the collider component and
//! transformed to world space once per step from the cached transform.

use super::primitives::{Circle, Rect};
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Collision shape, either local or world space depending on the owner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A circle
    Circle(Circle),
    /// An axis-aligned rectangle
    Rect(Rect),
}

/// Discriminant of [`Shape`], used to keep storage type-homogeneous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// [`Shape::Circle`]
    Circle,
    /// [`Shape::Rect`]
    Rect,
}

impl ShapeKind {
    /// Number of shape kinds
    pub const COUNT: usize = 2;

    /// Every kind, in storage order
    pub const ALL: [ShapeKind; Self::COUNT] = [ShapeKind::Circle, ShapeKind::Rect];

    /// Position of this kind in per-kind arrays
    pub const fn slot(self) -> usize {
        match self {
            ShapeKind::Circle => 0,
            ShapeKind::Rect => 1,
        }
    }
}

impl Shape {
    /// Creates a circle shape
    pub const fn circle(center: Vec2, radius: f32) -> Self {
        Self::Circle(Circle::new(center, radius))
    }

    /// Creates a rectangle shape from its corners
    pub const fn rect(min: Vec2, max: Vec2) -> Self {
        Self::Rect(Rect::new(min, max))
    }

    /// Creates a rectangle centered on the local origin, e.g. from texture dimensions
    pub fn rect_from_size(size: Vec2) -> Self {
        Self::Rect(Rect::from_center_size(Vec2::zeros(), size))
    }

    /// Kind tag
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle(_) => ShapeKind::Circle,
            Self::Rect(_) => ShapeKind::Rect,
        }
    }

    /// Geometric preconditions hold (positive radius, `min < max`)
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Circle(circle) => circle.is_valid(),
            Self::Rect(rect) => rect.is_valid(),
        }
    }

    /// Transform a local shape into world space
    ///
    /// Circles scale uniformly by the larger scale magnitude, both their
    /// radius and their offset from the origin. Rectangle corners are scaled
    /// componentwise. Orientation is ignored: rectangles stay axis-aligned.
    pub fn to_world(&self, position: Vec2, scale: Vec2) -> Shape {
        match self {
            Self::Circle(circle) => {
                let factor = scale.x.abs().max(scale.y.abs());
                Self::Circle(Circle::new(
                    position + circle.center * factor,
                    circle.radius * factor,
                ))
            }
            Self::Rect(rect) => {
                let a = rect.min.component_mul(&scale) + position;
                let b = rect.max.component_mul(&scale) + position;
                // A negative scale swaps the corners
                Self::Rect(Rect::new(a.inf(&b), a.sup(&b)))
            }
        }
    }

    /// Check if the shape overlaps a rectangle
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        match self {
            Self::Circle(circle) => circle.intersects_rect(rect),
            Self::Rect(own) => own.intersects(rect),
        }
    }

    /// Axis-aligned bounds
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Circle(circle) => circle.bounds(),
            Self::Rect(rect) => *rect,
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_to_world_uses_max_scale() {
        let local = Shape::circle(Vec2::new(1.0, 0.0), 2.0);
        let world = local.to_world(Vec2::new(10.0, 5.0), Vec2::new(2.0, 3.0));

        match world {
            Shape::Circle(circle) => {
                assert_relative_eq!(circle.center, Vec2::new(13.0, 5.0));
                assert_relative_eq!(circle.radius, 6.0);
            }
            Shape::Rect(_) => panic!("kind changed"),
        }
    }

    #[test]
    fn test_mirrored_circle_keeps_positive_radius() {
        let local = Shape::circle(Vec2::zeros(), 1.0);
        let world = local.to_world(Vec2::zeros(), Vec2::new(-1.0, -1.0));

        match world {
            Shape::Circle(circle) => assert_relative_eq!(circle.radius, 1.0),
            Shape::Rect(_) => panic!("kind changed"),
        }
        let other = Shape::circle(Vec2::new(1.5, 0.0), 1.0);
        assert!(crate::physics::collision::contact::collide(&world, &other).is_some());
    }

    #[test]
    fn test_rect_to_world_scales_componentwise() {
        let local = Shape::rect(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 2.0));
        let world = local.to_world(Vec2::new(5.0, 0.0), Vec2::new(2.0, 0.5));

        assert_eq!(
            world,
            Shape::rect(Vec2::new(3.0, -0.5), Vec2::new(7.0, 1.0))
        );
    }

    #[test]
    fn test_kind_slots_are_distinct() {
        assert_eq!(ShapeKind::ALL.map(ShapeKind::slot), [0, 1]);
        assert_eq!(Shape::rect_from_size(Vec2::new(4.0, 2.0)).kind(), ShapeKind::Rect);
    }
}
