//! ECS World implementation
//!
//! The world is the single context object of the core. It owns the entity
//! registry, one instance of every component store, the configuration and
//! the fatal reporter, and drives the per-step pipeline.
//!
//! Stores report contract violations as `Err`. The world never hands those
//! back to the caller: it writes them to the fatal reporter and panics, with
//! the caller's location attached.

use super::components::{
    ColliderComponent, Collision, SolidBodyComponent, SpriteComponent, TransformComponent,
    TransformStore,
};
use super::systems::{integrate, ColliderStore, CollisionStats, DrawList};
use super::{ComponentStore, Entity, EntityRegistry, StoreId};
use crate::config::ConfigError;
use crate::core::{EngineConfig, EngineResult};
use crate::foundation::fatal::{self, FatalReporter, LogReporter};
use crate::foundation::math::Vec2;
use crate::physics::collision::Shape;
use crate::spatial::QuadTree;

/// ECS World containing all entities and components
pub struct World {
    config: EngineConfig,
    registry: EntityRegistry,
    transforms: TransformStore,
    colliders: ColliderStore,
    solid_bodies: ComponentStore<SolidBodyComponent>,
    sprites: ComponentStore<SpriteComponent>,
    reporter: Box<dyn FatalReporter>,
    steps: u64,
}

impl World {
    /// Create a world from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Creating world: {} entity slots, bounds {:?}..{:?}, node capacity {}, {:?} change tracking",
            config.entities.max_entities,
            config.spatial.world_bounds.min,
            config.spatial.world_bounds.max,
            config.spatial.node_capacity,
            config.transforms.change_tracking,
        );

        Ok(Self {
            registry: EntityRegistry::new(&config.entities),
            transforms: TransformStore::new(config.transforms.change_tracking),
            colliders: ColliderStore::new(&config.spatial, &config.collision),
            solid_bodies: ComponentStore::new(),
            sprites: ComponentStore::new(),
            reporter: Box::new(LogReporter),
            steps: 0,
            config,
        })
    }

    /// Builder pattern: Replace the fatal reporter
    pub fn with_reporter(mut self, reporter: impl FatalReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    // --- Entities ---

    /// Create a new entity
    #[track_caller]
    pub fn create_entity(&mut self) -> Entity {
        let result = self.registry.create();
        self.check(result)
    }

    /// Whether `entity` is a current handle
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity)
    }

    /// Destroy an entity and every component attached to it
    #[track_caller]
    pub fn destroy_entity(&mut self, entity: Entity) {
        let Self {
            registry,
            transforms,
            colliders,
            solid_bodies,
            sprites,
            ..
        } = self;
        let result = registry.destroy(entity, |store, entity| match store {
            StoreId::Transform => transforms.remove(entity).map(drop),
            StoreId::Collider => colliders.remove(entity).map(drop),
            StoreId::SolidBody => solid_bodies.remove(entity).map(drop),
            StoreId::Sprite => sprites.remove(entity).map(drop),
        });
        self.check(result);
    }

    /// Iterate over live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.iter()
    }

    /// Number of live entities
    pub fn live_entities(&self) -> usize {
        self.registry.live_count()
    }

    // --- Transforms ---

    /// Attach a transform
    #[track_caller]
    pub fn add_transform(&mut self, entity: Entity, transform: TransformComponent) {
        let result = self.try_attach(entity, StoreId::Transform, |world| {
            world.transforms.set(entity, transform)
        });
        self.check(result);
    }

    /// Detach the transform
    #[track_caller]
    pub fn remove_transform(&mut self, entity: Entity) -> TransformComponent {
        let result = self.try_detach(entity, StoreId::Transform, |world| {
            world.transforms.remove(entity)
        });
        self.check(result)
    }

    /// Whether `entity` has a transform
    pub fn has_transform(&self, entity: Entity) -> bool {
        self.transforms.contains(entity)
    }

    /// Transform of `entity`, which must exist
    #[track_caller]
    pub fn transform(&self, entity: Entity) -> &TransformComponent {
        let result = self
            .registry
            .require_alive(entity)
            .and_then(|()| self.transforms.transform(entity));
        self.check(result)
    }

    /// Position of `entity`
    #[track_caller]
    pub fn position(&self, entity: Entity) -> Vec2 {
        self.transform(entity).position
    }

    /// Replace the whole transform
    #[track_caller]
    pub fn replace_transform(&mut self, entity: Entity, transform: TransformComponent) {
        let result = self.on_transforms(entity, |t| t.replace(entity, transform));
        self.check(result);
    }

    /// Move by `offset`
    #[track_caller]
    pub fn translate(&mut self, entity: Entity, offset: Vec2) {
        let result = self.on_transforms(entity, |t| t.translate(entity, offset));
        self.check(result);
    }

    /// Rotate in place by `delta` radians
    #[track_caller]
    pub fn rotate(&mut self, entity: Entity, delta: f32) {
        let result = self.on_transforms(entity, |t| t.rotate(entity, delta));
        self.check(result);
    }

    /// Rotate by `delta` radians around `pivot`
    #[track_caller]
    pub fn rotate_around(&mut self, entity: Entity, pivot: Vec2, delta: f32) {
        let result = self.on_transforms(entity, |t| t.rotate_around(entity, pivot, delta));
        self.check(result);
    }

    /// Multiply the scale componentwise
    #[track_caller]
    pub fn scale_by(&mut self, entity: Entity, factors: Vec2) {
        let result = self.on_transforms(entity, |t| t.scale_by(entity, factors));
        self.check(result);
    }

    /// Set the position
    #[track_caller]
    pub fn set_position(&mut self, entity: Entity, position: Vec2) {
        let result = self.on_transforms(entity, |t| t.set_position(entity, position));
        self.check(result);
    }

    /// Set the scale
    #[track_caller]
    pub fn set_scale(&mut self, entity: Entity, scale: Vec2) {
        let result = self.on_transforms(entity, |t| t.set_scale(entity, scale));
        self.check(result);
    }

    /// Set the orientation in radians
    #[track_caller]
    pub fn set_orientation(&mut self, entity: Entity, orientation: f32) {
        let result = self.on_transforms(entity, |t| t.set_orientation(entity, orientation));
        self.check(result);
    }

    // --- Colliders ---

    /// Attach a collider with a local-space shape
    ///
    /// The transform cache is seeded from the entity's transform if it has
    /// one, so the collider is placed correctly on the next step.
    #[track_caller]
    pub fn add_collider(&mut self, entity: Entity, shape: Shape) {
        let result = self.try_attach(entity, StoreId::Collider, |world| {
            let collider = match world.transforms.get(entity) {
                Some(t) => ColliderComponent::new(shape).with_cache(t.position, t.scale),
                None => ColliderComponent::new(shape),
            };
            world.colliders.add(entity, collider)
        });
        self.check(result);
    }

    /// Detach the collider
    #[track_caller]
    pub fn remove_collider(&mut self, entity: Entity) -> ColliderComponent {
        let result = self.try_detach(entity, StoreId::Collider, |world| {
            world.colliders.remove(entity)
        });
        self.check(result)
    }

    /// Whether `entity` has a collider
    pub fn has_collider(&self, entity: Entity) -> bool {
        self.colliders.has_collider(entity)
    }

    /// Collider of `entity`, if any
    pub fn collider(&self, entity: Entity) -> Option<&ColliderComponent> {
        self.colliders.get(entity)
    }

    /// Contacts found for `entity` by the last step; it must have a collider
    #[track_caller]
    pub fn collisions(&self, entity: Entity) -> &[Collision] {
        let result = self
            .registry
            .require_alive(entity)
            .and_then(|()| self.colliders.collisions(entity));
        self.check(result)
    }

    /// Contact lists for several entities, all of which must have a collider
    #[track_caller]
    pub fn collisions_for(&self, entities: &[Entity]) -> Vec<&[Collision]> {
        let result = entities
            .iter()
            .try_for_each(|&entity| self.registry.require_alive(entity))
            .and_then(|()| self.colliders.collisions_for(entities));
        self.check(result)
    }

    // --- Solid bodies ---

    /// Attach a solid body
    #[track_caller]
    pub fn add_solid_body(&mut self, entity: Entity, body: SolidBodyComponent) {
        let result = self.try_attach(entity, StoreId::SolidBody, |world| {
            world.solid_bodies.set(entity, body).map(drop)
        });
        self.check(result);
    }

    /// Detach the solid body
    #[track_caller]
    pub fn remove_solid_body(&mut self, entity: Entity) -> SolidBodyComponent {
        let result = self.try_detach(entity, StoreId::SolidBody, |world| {
            world.solid_bodies.remove(entity)
        });
        self.check(result)
    }

    /// Solid body of `entity`, if any
    pub fn solid_body(&self, entity: Entity) -> Option<&SolidBodyComponent> {
        self.solid_bodies.get(entity)
    }

    /// Velocity of `entity`, which must have a solid body
    #[track_caller]
    pub fn velocity(&self, entity: Entity) -> Vec2 {
        let result = self
            .registry
            .require_alive(entity)
            .and_then(|()| self.solid_bodies.lookup(entity));
        let index = self.check(result);
        self.solid_bodies.components()[index.0].velocity
    }

    /// Set the velocity of `entity`, which must have a solid body
    #[track_caller]
    pub fn set_velocity(&mut self, entity: Entity, velocity: Vec2) {
        let result = self
            .registry
            .require_alive(entity)
            .and_then(|()| self.solid_bodies.lookup(entity));
        let index = self.check(result);
        if let Some(body) = self.solid_bodies.at_mut(index) {
            body.velocity = velocity;
        }
    }

    // --- Sprites ---

    /// Attach a sprite
    #[track_caller]
    pub fn add_sprite(&mut self, entity: Entity, sprite: SpriteComponent) {
        let result = self.try_attach(entity, StoreId::Sprite, |world| {
            world.sprites.set(entity, sprite).map(drop)
        });
        self.check(result);
    }

    /// Detach the sprite
    #[track_caller]
    pub fn remove_sprite(&mut self, entity: Entity) -> SpriteComponent {
        let result = self.try_detach(entity, StoreId::Sprite, |world| world.sprites.remove(entity));
        self.check(result)
    }

    /// Sprite of `entity`, if any
    pub fn sprite(&self, entity: Entity) -> Option<&SpriteComponent> {
        self.sprites.get(entity)
    }

    // --- Simulation ---

    /// Advance the simulation by `delta_time` seconds
    ///
    /// Refreshes collider caches from changed transforms, rebuilds the
    /// quadtree, collects contacts and integrates solid bodies. Transform
    /// changes made by the integrator or by the caller between steps are
    /// picked up by the next call.
    #[track_caller]
    pub fn step(&mut self, delta_time: f32) {
        let result = self.try_step(delta_time);
        let stats = self.check(result);
        log::debug!(
            "Step {}: {} colliders ({} refreshed), {} leaves, {} collisions",
            self.steps,
            stats.colliders,
            stats.refreshed,
            stats.leaves,
            stats.collisions,
        );
    }

    fn try_step(&mut self, delta_time: f32) -> EngineResult<CollisionStats> {
        let stats = self.colliders.update_and_collide(&self.transforms)?;
        self.transforms.clear_changed();
        integrate(
            &mut self.solid_bodies,
            &self.colliders,
            &mut self.transforms,
            delta_time,
        )?;
        self.steps += 1;
        Ok(stats)
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Fill `list` with what a renderer should draw for the current state
    pub fn collect_draw_list(&self, list: &mut DrawList) {
        list.collect(&self.transforms, &self.sprites, &self.colliders);
    }

    // --- Read access ---

    /// Configuration the world was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Entity registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Transform store
    pub fn transforms(&self) -> &TransformStore {
        &self.transforms
    }

    /// Collider store
    pub fn colliders(&self) -> &ColliderStore {
        &self.colliders
    }

    /// Solid body store
    pub fn solid_bodies(&self) -> &ComponentStore<SolidBodyComponent> {
        &self.solid_bodies
    }

    /// Sprite store
    pub fn sprites(&self) -> &ComponentStore<SpriteComponent> {
        &self.sprites
    }

    /// Quadtree built by the last step
    pub fn quadtree(&self) -> &QuadTree {
        self.colliders.quadtree()
    }

    // --- Internals ---

    fn try_attach<F>(&mut self, entity: Entity, store: StoreId, attach: F) -> EngineResult<()>
    where
        F: FnOnce(&mut Self) -> EngineResult<()>,
    {
        self.registry.require_alive(entity)?;
        attach(self)?;
        self.registry.attach(entity, store)
    }

    fn try_detach<T, F>(&mut self, entity: Entity, store: StoreId, detach: F) -> EngineResult<T>
    where
        F: FnOnce(&mut Self) -> EngineResult<T>,
    {
        self.registry.require_alive(entity)?;
        let component = detach(self)?;
        self.registry.detach(entity, store)?;
        Ok(component)
    }

    fn on_transforms<F>(&mut self, entity: Entity, f: F) -> EngineResult<()>
    where
        F: FnOnce(&mut TransformStore) -> EngineResult<()>,
    {
        self.registry.require_alive(entity)?;
        f(&mut self.transforms)
    }

    #[track_caller]
    fn check<T>(&self, result: EngineResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => fatal::fail(self.reporter.as_ref(), &error, self.registry.live_count()),
        }
    }
}
