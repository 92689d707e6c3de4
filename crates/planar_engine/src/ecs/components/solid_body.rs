//! Solid body component
//!
//! A solid body moves with a constant velocity and bounces off whatever its
//! collider touches. There is no mass, restitution or penetration correction.

use crate::foundation::math::Vec2;

/// Velocity of a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolidBodyComponent {
    /// Velocity in world units per second
    pub velocity: Vec2,
}

impl SolidBodyComponent {
    /// Create a body with the given velocity
    pub const fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }

    /// Create a body at rest
    pub fn at_rest() -> Self {
        Self::default()
    }

    /// Speed in world units per second
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}
