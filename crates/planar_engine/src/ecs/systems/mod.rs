//! ECS Systems module
//!
//! Per-step logic operating on the world's stores

pub mod collision_system;
pub mod solid_body_system;
pub mod draw_list;

pub use collision_system::{ColliderStore, CollisionStats};
pub use solid_body_system::{integrate, resolve_velocity};
pub use draw_list::{DrawItem, DrawKind, DrawList};
