//! Dense component storage
//!
//! Every store keeps its components packed in one contiguous array, an
//! owner array running parallel to it, and a sparse table from entity index
//! to dense position. Removal swaps the last component into the hole, so a
//! [`ComponentIndex`] is only meaningful until the next removal.

use super::component::Component;
use super::entity::{Entity, StoreId};
use crate::core::{EngineError, EngineResult};

/// Dense position inside one store, invalidated by any removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIndex(pub usize);

/// Entity to component mapping over a dense array
#[derive(Debug, Clone)]
pub struct ComponentStore<T: Component> {
    dense: Vec<T>,
    owners: Vec<Entity>,
    sparse: Vec<Option<usize>>,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Identity of this store in errors and removal dispatch
    pub const fn id(&self) -> StoreId {
        T::STORE
    }

    /// Attach `value` to `entity`
    ///
    /// An entity holds at most one component per store; setting again
    /// without removing first is an error.
    pub fn set(&mut self, entity: Entity, value: T) -> EngineResult<ComponentIndex> {
        let slot = entity.index() as usize;
        if let Some(index) = self.sparse.get(slot).copied().flatten() {
            let occupant = self.owners[index];
            return Err(if occupant == entity {
                EngineError::DuplicateComponent {
                    entity,
                    store: T::STORE,
                }
            } else {
                EngineError::StaleComponent {
                    entity,
                    occupant,
                    store: T::STORE,
                }
            });
        }

        if self.sparse.len() <= slot {
            self.sparse.resize(slot + 1, None);
        }
        let index = self.dense.len();
        self.dense.push(value);
        self.owners.push(entity);
        self.sparse[slot] = Some(index);
        Ok(ComponentIndex(index))
    }

    /// Detach and return the component of `entity`
    pub fn remove(&mut self, entity: Entity) -> EngineResult<T> {
        let ComponentIndex(index) = self.lookup(entity)?;
        self.sparse[entity.index() as usize] = None;

        let value = self.dense.swap_remove(index);
        self.owners.swap_remove(index);
        if let Some(moved) = self.owners.get(index) {
            self.sparse[moved.index() as usize] = Some(index);
        }
        Ok(value)
    }

    /// Dense position of the component of `entity`
    pub fn lookup(&self, entity: Entity) -> EngineResult<ComponentIndex> {
        self.position(entity)
            .map(ComponentIndex)
            .ok_or(EngineError::MissingComponent {
                entity,
                store: T::STORE,
            })
    }

    /// The given entities that have a component here, in their original order
    pub fn filter_alive(&self, entities: &[Entity]) -> Vec<Entity> {
        entities
            .iter()
            .copied()
            .filter(|&entity| self.contains(entity))
            .collect()
    }

    /// Whether `entity` has a component here
    pub fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    /// Component of `entity`, if any
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.position(entity).map(|index| &self.dense[index])
    }

    /// Mutable component of `entity`, if any
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.position(entity).map(|index| &mut self.dense[index])
    }

    /// Component at a dense position
    pub fn at(&self, index: ComponentIndex) -> Option<&T> {
        self.dense.get(index.0)
    }

    /// Mutable component at a dense position
    pub fn at_mut(&mut self, index: ComponentIndex) -> Option<&mut T> {
        self.dense.get_mut(index.0)
    }

    /// Owner of the component at a dense position
    pub fn owner(&self, index: ComponentIndex) -> Option<Entity> {
        self.owners.get(index.0).copied()
    }

    /// Owners in dense order
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// Components in dense order
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// Iterate over `(owner, component)` in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterate mutably over `(owner, component)` in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn position(&self, entity: Entity) -> Option<usize> {
        self.sparse
            .get(entity.index() as usize)
            .copied()
            .flatten()
            .filter(|&index| self.owners[index] == entity)
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
