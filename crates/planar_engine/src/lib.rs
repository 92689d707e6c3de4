//! # Planar Engine
//!
//! The entity-component core of a 2D real-time simulation engine.
//!
//! ## Features
//!
//! - **Entities**: Generation-checked handles with delayed index reuse
//! - **Component Storage**: Dense per-type stores with swap-remove
//! - **Spatial Partitioning**: Quadtree broad phase rebuilt every step
//! - **Collision**: Circle and rectangle narrow phase with contact normals
//! - **Integration**: Velocity reflection against blocking surfaces
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use planar_engine::prelude::*;
//!
//! let mut world = World::new(EngineConfig::default()).expect("default config is valid");
//!
//! let ball = world.create_entity();
//! world.add_transform(ball, TransformComponent::from_position(Vec2::new(0.0, 0.0)));
//! world.add_collider(ball, Shape::circle(Vec2::zeros(), 1.0));
//! world.add_solid_body(ball, SolidBodyComponent::new(Vec2::new(5.0, 0.0)));
//!
//! let wall = world.create_entity();
//! world.add_collider(wall, Shape::rect(Vec2::new(10.0, -5.0), Vec2::new(20.0, 5.0)));
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 30.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod core;
pub mod foundation;
pub mod config;
pub mod ecs;
pub mod physics;
pub mod spatial;
pub mod assets;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetProvider, InMemoryAssets, TextureHandle, TextureInfo},
        config::{Config, ConfigError},
        core::{ChangeTracking, EngineConfig, EngineError},
        ecs::{
            components::{
                ColliderComponent, Collision, SolidBodyComponent, SpriteComponent,
                TransformComponent,
            },
            systems::{DrawItem, DrawKind, DrawList},
            Entity, World,
        },
        foundation::{
            fatal::{FatalReport, FatalReporter, LogReporter},
            math::Vec2,
        },
        physics::collision::{Circle, Rect, Shape, ShapeKind},
    };
}
