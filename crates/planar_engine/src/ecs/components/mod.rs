//! ECS Components module
//!
//! Pure data components held by the world's stores

pub mod transform;
pub mod collision;
pub mod solid_body;
pub mod sprite;

pub use transform::{TransformComponent, TransformStore};
pub use collision::{ColliderComponent, Collision};
pub use solid_body::SolidBodyComponent;
pub use sprite::SpriteComponent;
