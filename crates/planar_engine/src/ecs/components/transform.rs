//! Transform component and store
//!
//! Transforms are local only: position, per-axis scale and an orientation in
//! radians. The store wraps a [`ComponentStore`] and records which entities
//! were written since the last step so the collider cache can refresh lazily.

use crate::core::{ChangeTracking, EngineError, EngineResult};
use crate::ecs::{ComponentStore, Entity, StoreId};
use crate::foundation::math::{utils, Vec2};
use std::collections::HashSet;

/// ECS Transform component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComponent {
    /// Position in world units
    pub position: Vec2,
    /// Per-axis scale factors
    pub scale: Vec2,
    /// Counter-clockwise rotation in radians
    pub orientation: f32,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            orientation: 0.0,
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::new(scale, scale);
        self
    }

    /// Builder pattern: Set orientation in radians
    pub fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }

    /// Rotate by `delta` radians around `pivot`
    ///
    /// `orientation += delta; position = rotate(position - pivot, delta) + pivot`
    pub fn rotate_around(&mut self, pivot: Vec2, delta: f32) {
        self.orientation += delta;
        self.position = utils::rotate(self.position - pivot, delta) + pivot;
    }
}

/// Transform storage with change tracking
#[derive(Debug, Clone)]
pub struct TransformStore {
    store: ComponentStore<TransformComponent>,
    tracking: ChangeTracking,
    changed: Vec<Entity>,
    changed_set: HashSet<Entity>,
}

impl TransformStore {
    /// Create an empty store
    pub fn new(tracking: ChangeTracking) -> Self {
        Self {
            store: ComponentStore::new(),
            tracking,
            changed: Vec::new(),
            changed_set: HashSet::new(),
        }
    }

    /// Change tracking strategy in use
    pub fn tracking(&self) -> ChangeTracking {
        self.tracking
    }

    /// Attach a transform; counts as a change
    pub fn set(&mut self, entity: Entity, transform: TransformComponent) -> EngineResult<()> {
        self.store.set(entity, transform)?;
        self.mark_changed(entity);
        Ok(())
    }

    /// Detach and return the transform of `entity`
    pub fn remove(&mut self, entity: Entity) -> EngineResult<TransformComponent> {
        let transform = self.store.remove(entity)?;
        if self.changed_set.remove(&entity) {
            self.changed.retain(|&e| e != entity);
        }
        Ok(transform)
    }

    /// Transform of `entity`, if any
    pub fn get(&self, entity: Entity) -> Option<&TransformComponent> {
        self.store.get(entity)
    }

    /// Transform of `entity`, which must exist
    pub fn transform(&self, entity: Entity) -> EngineResult<&TransformComponent> {
        self.store.get(entity).ok_or(EngineError::MissingComponent {
            entity,
            store: StoreId::Transform,
        })
    }

    /// Whether `entity` has a transform
    pub fn contains(&self, entity: Entity) -> bool {
        self.store.contains(entity)
    }

    /// Replace the whole transform
    pub fn replace(&mut self, entity: Entity, transform: TransformComponent) -> EngineResult<()> {
        self.modify(entity, |t| *t = transform)
    }

    /// Move by `offset`
    pub fn translate(&mut self, entity: Entity, offset: Vec2) -> EngineResult<()> {
        self.modify(entity, |t| t.position += offset)
    }

    /// Rotate in place by `delta` radians
    pub fn rotate(&mut self, entity: Entity, delta: f32) -> EngineResult<()> {
        self.modify(entity, |t| t.orientation += delta)
    }

    /// Rotate by `delta` radians around `pivot`, moving the position too
    pub fn rotate_around(&mut self, entity: Entity, pivot: Vec2, delta: f32) -> EngineResult<()> {
        self.modify(entity, |t| t.rotate_around(pivot, delta))
    }

    /// Multiply the scale componentwise by `factors`
    pub fn scale_by(&mut self, entity: Entity, factors: Vec2) -> EngineResult<()> {
        self.modify(entity, |t| t.scale.component_mul_assign(&factors))
    }

    /// Current position of `entity`
    pub fn position(&self, entity: Entity) -> EngineResult<Vec2> {
        self.transform(entity).map(|t| t.position)
    }

    /// Set the position
    pub fn set_position(&mut self, entity: Entity, position: Vec2) -> EngineResult<()> {
        self.modify(entity, |t| t.position = position)
    }

    /// Set the scale
    pub fn set_scale(&mut self, entity: Entity, scale: Vec2) -> EngineResult<()> {
        self.modify(entity, |t| t.scale = scale)
    }

    /// Set the orientation in radians
    pub fn set_orientation(&mut self, entity: Entity, orientation: f32) -> EngineResult<()> {
        self.modify(entity, |t| t.orientation = orientation)
    }

    /// Entities whose transform must be treated as changed since the last step
    ///
    /// With [`ChangeTracking::All`] this is every entity holding a transform.
    pub fn changed_since_last_step(&self) -> Vec<Entity> {
        match self.tracking {
            ChangeTracking::All => self.store.entities().to_vec(),
            ChangeTracking::Dirty => self.changed.clone(),
        }
    }

    /// Forget recorded changes; called once per step after they were consumed
    pub fn clear_changed(&mut self) {
        self.changed.clear();
        self.changed_set.clear();
    }

    /// Iterate over `(entity, transform)`
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &TransformComponent)> {
        self.store.iter()
    }

    /// Number of transforms
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn modify<F>(&mut self, entity: Entity, f: F) -> EngineResult<()>
    where
        F: FnOnce(&mut TransformComponent),
    {
        let transform = self.store.get_mut(entity).ok_or(EngineError::MissingComponent {
            entity,
            store: StoreId::Transform,
        })?;
        f(transform);
        self.mark_changed(entity);
        Ok(())
    }

    fn mark_changed(&mut self, entity: Entity) {
        if self.tracking == ChangeTracking::Dirty && self.changed_set.insert(entity) {
            self.changed.push(entity);
        }
    }
}

impl Default for TransformStore {
    fn default() -> Self {
        Self::new(ChangeTracking::default())
    }
}
