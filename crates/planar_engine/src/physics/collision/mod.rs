//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Circles and axis-aligned rectangles with overlap tests
//! - [`shape`] - The [`Shape`] sum type attached to collider components
//! - [`contact`] - Shape-pair dispatch producing contact normals
//!
//! # Normal Convention
//!
//! A [`Contact`] carries one normal per participant. `normal_a` leaves the
//! surface of shape A and points toward shape B; `normal_b` leaves shape B
//! and points toward shape A.

pub mod primitives;
pub mod shape;
pub mod contact;

pub use primitives::{Circle, Rect};
pub use shape::{Shape, ShapeKind};
pub use contact::{collide, Contact};
