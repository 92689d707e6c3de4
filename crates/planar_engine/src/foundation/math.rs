//! Math utilities and types
//!
//! Provides the 2D math types shared by transforms, shapes and the integrator.

pub use nalgebra::{Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Squared length below which a vector is treated as zero
    pub const NORMAL_EPSILON: f32 = 1.0e-12;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Rotation2, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Rotate a vector counter-clockwise by `angle` radians
    pub fn rotate(vector: Vec2, angle: f32) -> Vec2 {
        Rotation2::new(angle) * vector
    }

    /// Normalize `vector`, or `None` when it is (nearly) zero
    pub fn try_normalize(vector: Vec2) -> Option<Vec2> {
        if vector.magnitude_squared() <= constants::NORMAL_EPSILON {
            None
        } else {
            Some(vector.normalize())
        }
    }

    /// Per-axis sign: -1, 0 or 1
    pub fn axis_sign(value: f32) -> f32 {
        if value > 0.0 {
            1.0
        } else if value < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    /// Mirror `velocity` across the plane with unit normal `normal`
    ///
    /// `v' = v - 2 (v . n) n`
    pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
        velocity - normal * (2.0 * velocity.dot(&normal))
    }
}
