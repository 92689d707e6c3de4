//! Entity-Component-System implementation
//!
//! Entities are generation-checked handles, components live in dense
//! per-type stores and the [`World`] ties them together with the per-step
//! collision and integration pipeline.

pub mod entity;
pub mod component;
pub mod storage;
pub mod world;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityRegistry, StoreId, StoreMask};
pub use component::Component;
pub use storage::{ComponentIndex, ComponentStore};
pub use world::World;
