//! Physics module
//!
//! Geometry primitives and narrow-phase collision for the 2D core. There is
//! no mass or rotational dynamics here; the only response is the velocity
//! reflection performed by the solid body integrator.

pub mod collision;

pub use collision::{Circle, Contact, Rect, Shape, ShapeKind};
