//! Collision detection components
//!
//! A collider keeps its shape in local space together with a cached copy of
//! the owner's position and scale. The world-space shape and the contact list
//! are rebuilt by the collider store on every step.

use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use crate::physics::collision::Shape;

/// One contact seen from the collider that stores it
///
/// `shape_a` and `normal_a` belong to the owner of the list, `shape_b` and
/// `normal_b` to [`other`](Self::other).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Entity owning the other collider
    pub other: Entity,
    /// Own world-space shape
    pub shape_a: Shape,
    /// Other world-space shape
    pub shape_b: Shape,
    /// Leaves the own surface, pointing toward the other shape
    pub normal_a: Vec2,
    /// Leaves the other surface, pointing toward this shape
    pub normal_b: Vec2,
}

impl Collision {
    /// Normal of the surface that was hit, facing this collider
    pub fn surface_normal(&self) -> Vec2 {
        self.normal_b
    }
}

/// Component that gives an entity a collision shape
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// Shape in local space
    pub shape: Shape,
    /// Owner position at the last refresh
    pub cached_position: Vec2,
    /// Owner scale at the last refresh
    pub cached_scale: Vec2,
    world_shape: Shape,
    collisions: Vec<Collision>,
}

impl ColliderComponent {
    /// Create a collider with an identity cache
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            cached_position: Vec2::zeros(),
            cached_scale: Vec2::new(1.0, 1.0),
            world_shape: shape,
            collisions: Vec::new(),
        }
    }

    /// Builder pattern: Seed the transform cache
    pub fn with_cache(mut self, position: Vec2, scale: Vec2) -> Self {
        self.cached_position = position;
        self.cached_scale = scale;
        self.world_shape = self.shape.to_world(position, scale);
        self
    }

    /// World-space shape computed at the last step
    pub fn world_shape(&self) -> &Shape {
        &self.world_shape
    }

    /// Contacts found at the last step
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Whether the last step found any contact
    pub fn is_colliding(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// Recompute the world shape from the cache and drop last step's contacts
    pub(crate) fn begin_step(&mut self) {
        self.world_shape = self.shape.to_world(self.cached_position, self.cached_scale);
        self.collisions.clear();
    }

    pub(crate) fn push_collision(&mut self, collision: Collision) {
        self.collisions.push(collision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_step_applies_cache_and_clears_contacts() {
        let mut collider = ColliderComponent::new(Shape::circle(Vec2::zeros(), 1.0));
        collider.push_collision(Collision {
            other: Entity::NULL,
            shape_a: collider.shape,
            shape_b: collider.shape,
            normal_a: Vec2::x(),
            normal_b: -Vec2::x(),
        });
        collider.cached_position = Vec2::new(4.0, 0.0);
        collider.cached_scale = Vec2::new(2.0, 1.0);

        collider.begin_step();

        assert!(!collider.is_colliding());
        assert_eq!(collider.world_shape(), &Shape::circle(Vec2::new(4.0, 0.0), 2.0));
    }
}
