//! # Draw List Collector
//!
//! Gathers what a renderer needs for one frame from the world's stores:
//! visible sprites at their entity transform and, optionally, collider
//! outlines in world space. The core never calls a renderer; it only fills
//! this list for one to consume read-only.

use crate::assets::TextureHandle;
use crate::ecs::components::{SpriteComponent, TransformStore};
use crate::ecs::systems::ColliderStore;
use crate::ecs::{ComponentStore, Entity};
use crate::foundation::math::Vec2;
use crate::physics::collision::Shape;

/// What to draw for one item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawKind {
    /// Textured quad of the given unscaled size
    Sprite {
        /// Texture to bind
        texture: TextureHandle,
        /// Size before the transform scale applies
        size: Vec2,
    },
    /// Collider outline in world space
    Collider(Shape),
}

/// One entry of the draw list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Entity the item belongs to
    pub entity: Entity,
    /// Position from the transform
    pub position: Vec2,
    /// Scale from the transform
    pub scale: Vec2,
    /// Orientation in radians from the transform
    pub orientation: f32,
    /// Payload
    pub kind: DrawKind,
}

/// Per-frame list of draw items
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    include_colliders: bool,
}

impl DrawList {
    /// Create an empty list that collects sprites only
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Also collect collider outlines
    pub fn with_colliders(mut self, enabled: bool) -> Self {
        self.include_colliders = enabled;
        self
    }

    /// Replace the contents with the current state of the stores
    pub fn collect(
        &mut self,
        transforms: &TransformStore,
        sprites: &ComponentStore<SpriteComponent>,
        colliders: &ColliderStore,
    ) {
        self.items.clear();

        for (entity, sprite) in sprites.iter() {
            if !sprite.visible {
                continue;
            }
            let Some(transform) = transforms.get(entity) else {
                continue;
            };
            self.items.push(DrawItem {
                entity,
                position: transform.position,
                scale: transform.scale,
                orientation: transform.orientation,
                kind: DrawKind::Sprite {
                    texture: sprite.texture,
                    size: sprite.size,
                },
            });
        }

        if self.include_colliders {
            for (entity, collider) in colliders.iter() {
                self.items.push(DrawItem {
                    entity,
                    position: collider.cached_position,
                    scale: collider.cached_scale,
                    orientation: 0.0,
                    kind: DrawKind::Collider(*collider.world_shape()),
                });
            }
        }
    }

    /// Collected items, sprites before colliders
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Sprite items only
    pub fn sprites(&self) -> impl Iterator<Item = &DrawItem> {
        self.items
            .iter()
            .filter(|item| matches!(item.kind, DrawKind::Sprite { .. }))
    }

    /// Collider items only
    pub fn colliders(&self) -> impl Iterator<Item = &DrawItem> {
        self.items
            .iter()
            .filter(|item| matches!(item.kind, DrawKind::Collider(_)))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop all items
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
