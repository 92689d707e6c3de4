//! # Core Engine Module
//!
//! Shared abstractions every subsystem depends on.
//!
//! ## Organization
//!
//! - **Config**: Engine configuration structures
//! - **Error**: Contract-violation error type

pub mod config;
pub mod error;

pub use config::{
    ChangeTracking,
    CollisionConfig,
    EngineConfig,
    EntityConfig,
    SpatialConfig,
    TransformConfig,
};
pub use error::{EngineError, EngineResult};
