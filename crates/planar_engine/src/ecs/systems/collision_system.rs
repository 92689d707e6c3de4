//! Collider storage and the collision pipeline
//!
//! Colliders are stored per shape kind so quadtree buckets and the dense
//! arrays they index stay type-homogeneous. One call to
//! [`ColliderStore::update_and_collide`] runs the whole per-step pipeline:
//!
//! 1. Refresh the transform cache of colliders whose owner moved
//! 2. Recompute every world-space shape and drop last step's contacts
//! 3. Rebuild the quadtree from scratch
//! 4. Run the narrow phase over every pair sharing a leaf

use crate::core::{CollisionConfig, EngineError, EngineResult, SpatialConfig};
use crate::ecs::components::{ColliderComponent, Collision, TransformStore};
use crate::ecs::{ComponentIndex, ComponentStore, Entity, StoreId};
use crate::physics::collision::{collide, Shape, ShapeKind};
use crate::spatial::{QuadEntry, QuadTree};
use std::collections::HashSet;

/// Counters from one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Colliders processed
    pub colliders: usize,
    /// Entities whose cache was refreshed
    pub refreshed: usize,
    /// Leaves in the rebuilt quadtree
    pub leaves: usize,
    /// Colliding pairs found, counting repeats across shared leaves
    pub collisions: usize,
}

type PairKey = ((ShapeKind, ComponentIndex), (ShapeKind, ComponentIndex));

/// Per-kind collider stores plus the spatial index
#[derive(Debug, Clone)]
pub struct ColliderStore {
    stores: [ComponentStore<ColliderComponent>; ShapeKind::COUNT],
    quadtree: QuadTree,
    deduplicate_pairs: bool,
}

impl ColliderStore {
    /// Create an empty store
    pub fn new(spatial: &SpatialConfig, collision: &CollisionConfig) -> Self {
        Self {
            stores: Default::default(),
            quadtree: QuadTree::new(spatial),
            deduplicate_pairs: collision.deduplicate_pairs,
        }
    }

    /// Attach a collider
    ///
    /// The shape must be valid and the entity must not have a collider of
    /// any kind yet.
    pub fn add(&mut self, entity: Entity, collider: ColliderComponent) -> EngineResult<()> {
        if !collider.shape.is_valid() {
            return Err(EngineError::MalformedShape(format!("{:?}", collider.shape)));
        }
        if self.has_collider(entity) {
            return Err(EngineError::DuplicateComponent {
                entity,
                store: StoreId::Collider,
            });
        }
        self.stores[collider.shape.kind().slot()].set(entity, collider)?;
        Ok(())
    }

    /// Detach and return the collider of `entity`
    pub fn remove(&mut self, entity: Entity) -> EngineResult<ColliderComponent> {
        let kind = self.kind_of(entity).ok_or(EngineError::MissingComponent {
            entity,
            store: StoreId::Collider,
        })?;
        self.stores[kind.slot()].remove(entity)
    }

    /// Whether `entity` has a collider
    pub fn has_collider(&self, entity: Entity) -> bool {
        self.kind_of(entity).is_some()
    }

    /// Shape kind of the collider of `entity`
    pub fn kind_of(&self, entity: Entity) -> Option<ShapeKind> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| self.stores[kind.slot()].contains(entity))
    }

    /// Collider of `entity`, if any
    pub fn get(&self, entity: Entity) -> Option<&ColliderComponent> {
        let kind = self.kind_of(entity)?;
        self.stores[kind.slot()].get(entity)
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut ColliderComponent> {
        let kind = self.kind_of(entity)?;
        self.stores[kind.slot()].get_mut(entity)
    }

    /// World-space shape of `entity` as of the last step
    pub fn world_shape(&self, entity: Entity) -> Option<Shape> {
        self.get(entity).map(|collider| *collider.world_shape())
    }

    /// Contacts of `entity` from the last step; the collider must exist
    pub fn collisions(&self, entity: Entity) -> EngineResult<&[Collision]> {
        self.get(entity)
            .map(ColliderComponent::collisions)
            .ok_or(EngineError::MissingComponent {
                entity,
                store: StoreId::Collider,
            })
    }

    /// Contact lists for several entities, in the same order
    pub fn collisions_for(&self, entities: &[Entity]) -> EngineResult<Vec<&[Collision]>> {
        entities.iter().map(|&entity| self.collisions(entity)).collect()
    }

    /// Store holding colliders of one kind
    pub fn store(&self, kind: ShapeKind) -> &ComponentStore<ColliderComponent> {
        &self.stores[kind.slot()]
    }

    /// Iterate over every `(entity, collider)`, circles first
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &ColliderComponent)> {
        self.stores.iter().flat_map(ComponentStore::iter)
    }

    /// Total number of colliders
    pub fn len(&self) -> usize {
        self.stores.iter().map(ComponentStore::len).sum()
    }

    /// Whether there are no colliders
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spatial index as built by the last step
    pub fn quadtree(&self) -> &QuadTree {
        &self.quadtree
    }

    /// Number of quadtree leaves from the last step
    pub fn leaf_count(&self) -> usize {
        self.quadtree.leaf_count()
    }

    /// Run the full refresh, partition and narrow-phase pipeline
    pub fn update_and_collide(&mut self, transforms: &TransformStore) -> EngineResult<CollisionStats> {
        let refreshed = self.refresh(transforms);

        for store in &mut self.stores {
            for (_, collider) in store.iter_mut() {
                collider.begin_step();
            }
        }

        self.partition()?;
        let collisions = self.narrow_phase();

        Ok(CollisionStats {
            colliders: self.len(),
            refreshed,
            leaves: self.quadtree.leaf_count(),
            collisions,
        })
    }

    fn refresh(&mut self, transforms: &TransformStore) -> usize {
        let mut refreshed = 0;
        for entity in transforms.changed_since_last_step() {
            if let (Some(transform), Some(collider)) = (transforms.get(entity), self.get_mut(entity)) {
                collider.cached_position = transform.position;
                collider.cached_scale = transform.scale;
                refreshed += 1;
            }
        }
        refreshed
    }

    fn partition(&mut self) -> EngineResult<()> {
        self.quadtree.clear();
        for store in &self.stores {
            for (i, (entity, collider)) in store.iter().enumerate() {
                if self.quadtree.insert(ComponentIndex(i), *collider.world_shape()) == 0 {
                    return Err(EngineError::OutsideWorldBounds { entity });
                }
            }
        }
        Ok(())
    }

    fn narrow_phase(&mut self) -> usize {
        let mut contacts: Vec<(ShapeKind, ComponentIndex, Collision)> = Vec::new();
        let mut seen: HashSet<PairKey> = HashSet::new();
        let mut found = 0;

        for leaf in self.quadtree.leaves() {
            let entries: Vec<(ShapeKind, &QuadEntry)> = leaf.entries().collect();
            for (i, &(kind_a, a)) in entries.iter().enumerate() {
                for &(kind_b, b) in &entries[i + 1..] {
                    let key_a = (kind_a, a.index);
                    let key_b = (kind_b, b.index);
                    if self.deduplicate_pairs && !seen.insert((key_a.min(key_b), key_a.max(key_b))) {
                        continue;
                    }

                    let Some(contact) = collide(&a.shape, &b.shape) else {
                        continue;
                    };
                    let (Some(owner_a), Some(owner_b)) = (
                        self.stores[kind_a.slot()].owner(a.index),
                        self.stores[kind_b.slot()].owner(b.index),
                    ) else {
                        continue;
                    };

                    found += 1;
                    contacts.push((
                        kind_a,
                        a.index,
                        Collision {
                            other: owner_b,
                            shape_a: a.shape,
                            shape_b: b.shape,
                            normal_a: contact.normal_a,
                            normal_b: contact.normal_b,
                        },
                    ));
                    contacts.push((
                        kind_b,
                        b.index,
                        Collision {
                            other: owner_a,
                            shape_a: b.shape,
                            shape_b: a.shape,
                            normal_a: contact.normal_b,
                            normal_b: contact.normal_a,
                        },
                    ));
                }
            }
        }

        for (kind, index, collision) in contacts {
            if let Some(collider) = self.stores[kind.slot()].at_mut(index) {
                collider.push_collision(collision);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineConfig;
    use crate::ecs::components::TransformComponent;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    struct Fixture {
        transforms: TransformStore,
        colliders: ColliderStore,
        next: u32,
    }

    impl Fixture {
        fn new(config: &EngineConfig) -> Self {
            Self {
                transforms: TransformStore::new(config.transforms.change_tracking),
                colliders: ColliderStore::new(&config.spatial, &config.collision),
                next: 1,
            }
        }

        fn spawn(&mut self, position: Vec2, shape: Shape) -> Entity {
            let entity = Entity::new(self.next, 0);
            self.next += 1;
            self.transforms
                .set(entity, TransformComponent::from_position(position))
                .unwrap();
            self.colliders.add(entity, ColliderComponent::new(shape)).unwrap();
            entity
        }

        fn step(&mut self) -> CollisionStats {
            let stats = self.colliders.update_and_collide(&self.transforms).unwrap();
            self.transforms.clear_changed();
            stats
        }
    }

    #[test]
    fn test_touching_circles_get_symmetric_records() {
        let mut fixture = Fixture::new(&EngineConfig::default());
        let a = fixture.spawn(Vec2::new(0.0, 0.0), Shape::circle(Vec2::zeros(), 1.0));
        let b = fixture.spawn(Vec2::new(2.0, 0.0), Shape::circle(Vec2::zeros(), 1.0));

        let stats = fixture.step();
        assert_eq!(stats.collisions, 1);
        assert_eq!(stats.refreshed, 2);

        let of_a = fixture.colliders.collisions(a).unwrap();
        let of_b = fixture.colliders.collisions(b).unwrap();
        assert_eq!(of_a.len(), 1);
        assert_eq!(of_a[0].other, b);
        assert_relative_eq!(of_a[0].normal_a, Vec2::new(1.0, 0.0));
        assert_relative_eq!(of_b[0].normal_a, Vec2::new(-1.0, 0.0));
        assert_eq!(of_b[0].other, a);
    }

    #[test]
    fn test_contacts_are_replaced_each_step() {
        let mut fixture = Fixture::new(&EngineConfig::default());
        let a = fixture.spawn(Vec2::new(0.0, 0.0), Shape::circle(Vec2::zeros(), 1.0));
        fixture.spawn(Vec2::new(1.0, 0.0), Shape::circle(Vec2::zeros(), 1.0));
        fixture.step();
        assert!(fixture.colliders.get(a).unwrap().is_colliding());

        fixture.transforms.set_position(a, Vec2::new(-10.0, 0.0)).unwrap();
        fixture.step();
        assert!(fixture.colliders.collisions(a).unwrap().is_empty());
    }

    #[test]
    fn test_unchanged_entities_keep_stale_cache_under_dirty_tracking() {
        let mut fixture = Fixture::new(&EngineConfig::default());
        let a = fixture.spawn(Vec2::new(5.0, 5.0), Shape::circle(Vec2::zeros(), 1.0));
        fixture.step();
        assert_eq!(
            fixture.colliders.world_shape(a),
            Some(Shape::circle(Vec2::new(5.0, 5.0), 1.0))
        );

        let stats = fixture.step();
        assert_eq!(stats.refreshed, 0);
        assert_eq!(
            fixture.colliders.world_shape(a),
            Some(Shape::circle(Vec2::new(5.0, 5.0), 1.0))
        );
    }

    #[test]
    fn test_pair_sharing_leaves_repeats_unless_deduplicated() {
        let config = EngineConfig::default().with_node_capacity(1);
        let spread = |fixture: &mut Fixture| {
            let wall = Shape::rect(Vec2::new(-20.0, -20.0), Vec2::new(20.0, 20.0));
            let a = fixture.spawn(Vec2::zeros(), wall);
            let b = fixture.spawn(Vec2::zeros(), wall);
            (a, b)
        };

        let mut fixture = Fixture::new(&config);
        let (a, _) = spread(&mut fixture);
        fixture.step();
        let repeated = fixture.colliders.collisions(a).unwrap().len();
        assert!(repeated > 1);

        let mut fixture = Fixture::new(&config.with_deduplicated_pairs(true));
        let (a, _) = spread(&mut fixture);
        fixture.step();
        assert_eq!(fixture.colliders.collisions(a).unwrap().len(), 1);
    }

    #[test]
    fn test_rect_and_circle_collide_across_kinds() {
        let mut fixture = Fixture::new(&EngineConfig::default());
        let wall = fixture.spawn(
            Vec2::zeros(),
            Shape::rect(Vec2::new(10.0, -5.0), Vec2::new(20.0, 5.0)),
        );
        let ball = fixture.spawn(Vec2::new(9.5, 0.0), Shape::circle(Vec2::zeros(), 1.0));
        fixture.step();

        let hits = fixture.colliders.collisions(ball).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, wall);
        assert_relative_eq!(hits[0].surface_normal(), Vec2::new(-1.0, 0.0));
        assert_relative_eq!(hits[0].normal_a, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_rejects_malformed_and_duplicate_colliders() {
        let mut colliders = ColliderStore::new(&SpatialConfig::default(), &CollisionConfig::default());
        let entity = Entity::new(1, 0);

        assert!(matches!(
            colliders.add(entity, ColliderComponent::new(Shape::circle(Vec2::zeros(), -1.0))),
            Err(EngineError::MalformedShape(_))
        ));

        colliders
            .add(entity, ColliderComponent::new(Shape::circle(Vec2::zeros(), 1.0)))
            .unwrap();
        assert_eq!(
            colliders.add(
                entity,
                ColliderComponent::new(Shape::rect(Vec2::zeros(), Vec2::new(1.0, 1.0)))
            ),
            Err(EngineError::DuplicateComponent {
                entity,
                store: StoreId::Collider,
            })
        );
        assert_eq!(colliders.kind_of(entity), Some(ShapeKind::Circle));
    }

    #[test]
    fn test_collider_outside_world_is_reported() {
        let mut fixture = Fixture::new(&EngineConfig::default());
        let lost = fixture.spawn(Vec2::new(5000.0, 0.0), Shape::circle(Vec2::zeros(), 1.0));

        assert_eq!(
            fixture.colliders.update_and_collide(&fixture.transforms),
            Err(EngineError::OutsideWorldBounds { entity: lost })
        );
    }

    #[test]
    fn test_collisions_for_requires_every_collider() {
        let mut fixture = Fixture::new(&EngineConfig::default());
        let a = fixture.spawn(Vec2::zeros(), Shape::circle(Vec2::zeros(), 1.0));
        fixture.step();

        assert_eq!(fixture.colliders.collisions_for(&[a]).unwrap().len(), 1);
        assert!(fixture
            .colliders
            .collisions_for(&[a, Entity::new(42, 0)])
            .is_err());
    }
}
