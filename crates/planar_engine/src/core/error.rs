//! Engine error types
//!
//! Every variant is a caller contract violation. Stores hand these back as
//! `Err`; the [`World`](crate::ecs::World) routes them to the fatal reporter.

use crate::ecs::{Entity, StoreId};
use thiserror::Error;

/// Contract violations detected by the entity/component core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Handle is null, out of range or from an older generation
    #[error("entity {0} is not alive")]
    InvalidEntity(Entity),

    /// Operation needs a component the entity does not have
    #[error("entity {entity} has no {store} component")]
    MissingComponent {
        /// Entity that was queried
        entity: Entity,
        /// Store that was expected to hold the component
        store: StoreId,
    },

    /// Component already attached; remove it before setting a new one
    #[error("entity {entity} already has a {store} component")]
    DuplicateComponent {
        /// Entity that was targeted
        entity: Entity,
        /// Store that already holds a component for it
        store: StoreId,
    },

    /// Store slot still holds a component of another generation
    #[error("entity {entity} cannot take the {store} slot still held by {occupant}")]
    StaleComponent {
        /// Entity that was targeted
        entity: Entity,
        /// Handle that still owns the slot
        occupant: Entity,
        /// Store holding the leftover component
        store: StoreId,
    },

    /// Shape arguments violate their geometric preconditions
    #[error("malformed shape: {0}")]
    MalformedShape(String),

    /// Registry cannot hand out another index
    #[error("entity capacity of {max} exceeded")]
    CapacityExceeded {
        /// Configured maximum number of entity slots
        max: usize,
    },

    /// A collider's world shape missed every quadtree node
    #[error("collider of entity {entity} lies outside the world bounds")]
    OutsideWorldBounds {
        /// Owner of the offending collider
        entity: Entity,
    },
}

/// Result alias for core operations
pub type EngineResult<T> = Result<T, EngineError>;
