//! Primitive collision shapes and overlap tests
//!
//! Provides the two geometric primitives of the core (circles and
//! axis-aligned rectangles) with inclusive overlap predicates. Touching
//! boundaries count as overlap everywhere in this module.

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// A circle for collision detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point
    pub center: Vec2,
    /// Radius, strictly positive for a valid circle
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Radius is positive and every component finite
    pub fn is_valid(&self) -> bool {
        self.radius.is_finite()
            && self.radius > 0.0
            && self.center.iter().all(|c| c.is_finite())
    }

    /// Check if this circle intersects another
    ///
    /// Intersecting iff the squared center distance is at most `(r1 + r2)^2`.
    pub fn intersects(&self, other: &Circle) -> bool {
        let distance_squared = (other.center - self.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Check if this circle intersects a rectangle
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest = rect.closest_point(self.center);
        (self.center - closest).magnitude_squared() <= self.radius * self.radius
    }

    /// Smallest rectangle containing the circle
    pub fn bounds(&self) -> Rect {
        let extent = Vec2::new(self.radius, self.radius);
        Rect::new(self.center - extent, self.center + extent)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Rect {
    /// Creates a rectangle from its corners
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle centered on `center` with the given full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// `min < max` on both axes with finite corners
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|c| c.is_finite())
            && self.min.x < self.max.x
            && self.min.y < self.max.y
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Full width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point lies inside or on the boundary
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this rectangle overlaps another (touching edges overlap)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Closest point of the rectangle to `point`, clamped per axis
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Overlap extent on each axis; negative components mean separation
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    /// The four quadrants split at the midpoint
    ///
    /// Order: +x+y, +x-y, -x-y, -x+y.
    pub fn quadrants(&self) -> [Rect; 4] {
        let mid = self.center();
        [
            Rect::new(mid, self.max),
            Rect::new(Vec2::new(mid.x, self.min.y), Vec2::new(self.max.x, mid.y)),
            Rect::new(self.min, mid),
            Rect::new(Vec2::new(self.min.x, mid.y), Vec2::new(mid.x, self.max.y)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_boundary_is_inclusive() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 1.0);
        let touching = Circle::new(Vec2::new(3.0, 0.0), 2.0);
        let apart = Circle::new(Vec2::new(3.0 + 1.0e-3, 0.0), 2.0);

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        assert!(Circle::new(Vec2::new(5.0, 1.0), 1.0).intersects_rect(&rect));
        assert!(!Circle::new(Vec2::new(5.0, 3.5), 1.0).intersects_rect(&rect));
        assert!(Circle::new(Vec2::new(2.0, 1.0), 0.1).intersects_rect(&rect));
    }

    #[test]
    fn test_rect_validity() {
        assert!(Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)).is_valid());
        assert!(!Rect::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0)).is_valid());
        assert!(!Rect::new(Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0)).is_valid());
        assert!(!Circle::new(Vec2::zeros(), 0.0).is_valid());
        assert!(!Circle::new(Vec2::zeros(), f32::NAN).is_valid());
    }

    #[test]
    fn test_quadrant_order() {
        let rect = Rect::new(Vec2::new(-2.0, -2.0), Vec2::new(2.0, 2.0));
        let centers: Vec<Vec2> = rect.quadrants().iter().map(Rect::center).collect();

        assert_relative_eq!(centers[0], Vec2::new(1.0, 1.0));
        assert_relative_eq!(centers[1], Vec2::new(1.0, -1.0));
        assert_relative_eq!(centers[2], Vec2::new(-1.0, -1.0));
        assert_relative_eq!(centers[3], Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_rect_overlap_extent() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0));
        let b = Rect::new(Vec2::new(3.0, 1.0), Vec2::new(6.0, 2.0));
        assert_relative_eq!(a.overlap(&b), Vec2::new(1.0, 1.0));
        assert!(a.intersects(&b));
    }
}
