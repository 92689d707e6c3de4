//! Sprite component
//!
//! Sprites only reference a texture and carry its on-screen size; pixel data
//! stays with the asset provider.

use crate::assets::{TextureHandle, TextureInfo};
use crate::foundation::math::Vec2;

/// Texture reference drawn at the entity transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteComponent {
    /// Texture to draw
    pub texture: TextureHandle,
    /// Size in world units before the transform scale applies
    pub size: Vec2,
    /// Whether the sprite is drawn
    pub visible: bool,
}

impl SpriteComponent {
    /// Sprite sized after the texture dimensions
    pub fn from_texture(texture: &TextureInfo) -> Self {
        Self {
            texture: texture.handle,
            size: texture.size(),
            visible: true,
        }
    }

    /// Builder pattern: Set size
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Builder pattern: Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}
