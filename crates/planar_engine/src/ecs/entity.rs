//! Entity handles and the registry that hands them out
//!
//! An [`Entity`] is a 1-based slot index plus the slot's generation at the
//! time of creation. Destroying an entity bumps its slot generation, so every
//! outstanding copy of the handle stops being alive at once. Freed indices
//! are queued and only reused once enough of them have accumulated, which
//! delays aliasing of recently destroyed handles.

use crate::core::{EngineError, EngineResult, EntityConfig};
use bitflags::bitflags;
use std::collections::VecDeque;
use std::fmt;

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// The reserved handle that is never alive
    pub const NULL: Entity = Entity {
        index: 0,
        generation: 0,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// 1-based slot index; 0 is the null slot
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was created
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether this is [`Entity::NULL`]
    pub const fn is_null(&self) -> bool {
        self.index == 0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Component stores that can hold data for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreId {
    /// Position, scale and orientation
    Transform,
    /// Collision shape
    Collider,
    /// Velocity
    SolidBody,
    /// Texture reference
    Sprite,
}

impl StoreId {
    /// Every store, in removal order
    pub const ALL: [StoreId; 4] = [
        StoreId::Sprite,
        StoreId::SolidBody,
        StoreId::Collider,
        StoreId::Transform,
    ];

    /// Flag for this store
    pub const fn mask(self) -> StoreMask {
        match self {
            StoreId::Transform => StoreMask::TRANSFORM,
            StoreId::Collider => StoreMask::COLLIDER,
            StoreId::SolidBody => StoreMask::SOLID_BODY,
            StoreId::Sprite => StoreMask::SPRITE,
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreId::Transform => "transform",
            StoreId::Collider => "collider",
            StoreId::SolidBody => "solid body",
            StoreId::Sprite => "sprite",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of stores holding a component for one entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StoreMask: u8 {
        /// [`StoreId::Transform`]
        const TRANSFORM = 1;
        /// [`StoreId::Collider`]
        const COLLIDER = 1 << 1;
        /// [`StoreId::SolidBody`]
        const SOLID_BODY = 1 << 2;
        /// [`StoreId::Sprite`]
        const SPRITE = 1 << 3;
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    alive: bool,
    stores: StoreMask,
}

/// Allocates and recycles entity handles
///
/// The registry also keeps, per entity, the set of stores that attached a
/// component, so destruction can dispatch removal to each of them without
/// knowing component types.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    free_indices: VecDeque<u32>,
    live_count: usize,
    max_entities: usize,
    min_free_indices: usize,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new(config: &EntityConfig) -> Self {
        Self {
            slots: Vec::new(),
            free_indices: VecDeque::new(),
            live_count: 0,
            max_entities: config.max_entities,
            min_free_indices: config.min_free_indices,
        }
    }

    /// Allocate a handle
    ///
    /// Reuses the oldest freed index once at least `min_free_indices` are
    /// queued (or when no fresh slot is left), otherwise appends a slot.
    pub fn create(&mut self) -> EngineResult<Entity> {
        if self.live_count >= self.max_entities {
            return Err(EngineError::CapacityExceeded {
                max: self.max_entities,
            });
        }

        let reuse = self.free_indices.len() >= self.min_free_indices
            || self.slots.len() >= self.max_entities;
        let recycled = if reuse {
            self.free_indices.pop_front()
        } else {
            None
        };

        let index = match recycled {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                u32::try_from(self.slots.len()).map_err(|_| EngineError::CapacityExceeded {
                    max: self.max_entities,
                })?
            }
        };

        let slot = &mut self.slots[index as usize - 1];
        slot.alive = true;
        slot.stores = StoreMask::empty();
        self.live_count += 1;
        Ok(Entity::new(index, slot.generation))
    }

    /// Index in range and generation current
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Fail unless `entity` is alive
    pub fn require_alive(&self, entity: Entity) -> EngineResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EngineError::InvalidEntity(entity))
        }
    }

    /// Destroy a live entity
    ///
    /// `remove` is called once for every store that holds a component of the
    /// entity, before the generation bump. The index then joins the free list.
    pub fn destroy<F>(&mut self, entity: Entity, mut remove: F) -> EngineResult<()>
    where
        F: FnMut(StoreId, Entity) -> EngineResult<()>,
    {
        let stores = self
            .slot(entity)
            .map(|slot| slot.stores)
            .ok_or(EngineError::InvalidEntity(entity))?;

        for store in StoreId::ALL {
            if stores.contains(store.mask()) {
                remove(store, entity)?;
            }
        }

        let slot = &mut self.slots[entity.index as usize - 1];
        slot.generation = slot.generation.wrapping_add(1);
        slot.alive = false;
        slot.stores = StoreMask::empty();
        self.free_indices.push_back(entity.index);
        self.live_count -= 1;
        Ok(())
    }

    /// Record that `store` now holds a component for `entity`
    pub fn attach(&mut self, entity: Entity, store: StoreId) -> EngineResult<()> {
        let slot = self.slot_mut(entity)?;
        slot.stores.insert(store.mask());
        Ok(())
    }

    /// Record that `store` no longer holds a component for `entity`
    pub fn detach(&mut self, entity: Entity, store: StoreId) -> EngineResult<()> {
        let slot = self.slot_mut(entity)?;
        slot.stores.remove(store.mask());
        Ok(())
    }

    /// Stores currently holding a component of `entity`
    pub fn stores_of(&self, entity: Entity) -> Option<StoreMask> {
        self.slot(entity).map(|slot| slot.stores)
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Maximum number of simultaneously live entities
    pub fn capacity(&self) -> usize {
        self.max_entities
    }

    /// Number of freed indices waiting for reuse
    pub fn free_count(&self) -> usize {
        self.free_indices.len()
    }

    /// Iterate over live handles in index order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().enumerate().filter(|(_, slot)| slot.alive).map(|(i, slot)| {
            // Slot count never exceeds u32::MAX, see `create`
            Entity::new(i as u32 + 1, slot.generation)
        })
    }

    fn slot(&self, entity: Entity) -> Option<&Slot> {
        if entity.is_null() {
            return None;
        }
        self.slots
            .get(entity.index as usize - 1)
            .filter(|slot| slot.alive && slot.generation == entity.generation)
    }

    fn slot_mut(&mut self, entity: Entity) -> EngineResult<&mut Slot> {
        if entity.is_null() {
            return Err(EngineError::InvalidEntity(entity));
        }
        self.slots
            .get_mut(entity.index as usize - 1)
            .filter(|slot| slot.alive && slot.generation == entity.generation)
            .ok_or(EngineError::InvalidEntity(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(max_entities: usize, min_free_indices: usize) -> EntityRegistry {
        EntityRegistry::new(&EntityConfig {
            max_entities,
            min_free_indices,
        })
    }

    fn no_stores(_: StoreId, _: Entity) -> EngineResult<()> {
        Ok(())
    }

    #[test]
    fn test_created_handles_are_alive_until_destroyed() {
        let mut registry = registry(16, 0);
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();

        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
        assert!(registry.is_alive(a) && registry.is_alive(b));

        registry.destroy(a, no_stores).unwrap();
        assert!(!registry.is_alive(a));
        assert!(registry.is_alive(b));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_null_and_out_of_range_are_not_alive() {
        let registry = registry(16, 0);
        assert!(!registry.is_alive(Entity::NULL));
        assert!(!registry.is_alive(Entity::new(7, 0)));
    }

    #[test]
    fn test_reused_index_has_newer_generation() {
        let mut registry = registry(16, 0);
        let old = registry.create().unwrap();
        registry.destroy(old, no_stores).unwrap();

        let new = registry.create().unwrap();
        assert_eq!(new.index(), old.index());
        assert!(new.generation() > old.generation());
        assert!(!registry.is_alive(old));
        assert!(registry.is_alive(new));
    }

    #[test]
    fn test_reuse_waits_for_free_list_threshold() {
        let mut registry = registry(16, 2);
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();

        registry.destroy(a, no_stores).unwrap();
        let c = registry.create().unwrap();
        assert_eq!(c.index(), 3, "one free index is below the threshold");

        registry.destroy(b, no_stores).unwrap();
        let d = registry.create().unwrap();
        assert_eq!(d.index(), a.index(), "oldest freed index comes back first");
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut registry = registry(2, 1);
        let a = registry.create().unwrap();
        registry.create().unwrap();
        assert_eq!(
            registry.create(),
            Err(EngineError::CapacityExceeded { max: 2 })
        );

        registry.destroy(a, no_stores).unwrap();
        assert!(registry.create().is_ok());
    }

    #[test]
    fn test_destroy_dispatches_to_attached_stores() {
        let mut registry = registry(16, 0);
        let entity = registry.create().unwrap();
        registry.attach(entity, StoreId::Transform).unwrap();
        registry.attach(entity, StoreId::Collider).unwrap();
        registry.attach(entity, StoreId::Sprite).unwrap();
        registry.detach(entity, StoreId::Sprite).unwrap();

        let mut removed = Vec::new();
        registry
            .destroy(entity, |store, e| {
                assert_eq!(e, entity);
                removed.push(store);
                Ok(())
            })
            .unwrap();

        removed.sort_by_key(|store| store.mask().bits());
        assert_eq!(removed, vec![StoreId::Transform, StoreId::Collider]);
    }

    #[test]
    fn test_destroying_twice_is_rejected() {
        let mut registry = registry(16, 0);
        let entity = registry.create().unwrap();
        registry.destroy(entity, no_stores).unwrap();
        assert_eq!(
            registry.destroy(entity, no_stores),
            Err(EngineError::InvalidEntity(entity))
        );
    }

    #[test]
    fn test_iter_yields_live_handles() {
        let mut registry = registry(16, 0);
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();
        let c = registry.create().unwrap();
        registry.destroy(b, no_stores).unwrap();

        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![a, c]);
    }
}
