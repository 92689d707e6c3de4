//! Asset provider interface
//!
//! The core never loads pixels. It asks an [`AssetProvider`] for a texture by
//! identifier and keeps only the returned handle and dimensions, which size
//! sprites and, optionally, rectangular colliders.

use crate::foundation::collections::{TypedHandle, TypedHandleMap};
use crate::foundation::math::Vec2;
use std::collections::HashMap;
use thiserror::Error;

/// Texture metadata record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Identifier the texture was registered under
    pub id: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Opaque texture handle
pub type TextureHandle = TypedHandle<Texture>;

/// What the core learns about a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Handle to pass back to the renderer
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TextureInfo {
    /// Dimensions as a world-space size, one unit per pixel
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Asset errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No texture registered under the identifier
    #[error("unknown texture: {0}")]
    UnknownTexture(String),

    /// Texture registered with a zero dimension
    #[error("texture {0} has no area")]
    EmptyTexture(String),
}

/// Source of texture handles and dimensions
pub trait AssetProvider {
    /// Resolve a texture identifier
    fn texture(&self, id: &str) -> Result<TextureInfo, AssetError>;
}

/// Provider backed by textures registered at runtime
#[derive(Default)]
pub struct InMemoryAssets {
    textures: TypedHandleMap<Texture>,
    by_id: HashMap<String, TextureHandle>,
}

impl InMemoryAssets {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture, replacing any previous one with the same id
    pub fn register(
        &mut self,
        id: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, AssetError> {
        let id = id.into();
        if width == 0 || height == 0 {
            return Err(AssetError::EmptyTexture(id));
        }

        if let Some(previous) = self.by_id.remove(&id) {
            self.textures.remove(previous);
        }
        let handle = self.textures.insert(Texture {
            id: id.clone(),
            width,
            height,
        });
        log::debug!("Registered texture {id} ({width}x{height})");
        self.by_id.insert(id, handle);
        Ok(handle)
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no texture is registered
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl AssetProvider for InMemoryAssets {
    fn texture(&self, id: &str) -> Result<TextureInfo, AssetError> {
        let handle = *self
            .by_id
            .get(id)
            .ok_or_else(|| AssetError::UnknownTexture(id.to_string()))?;
        let texture = self
            .textures
            .get(handle)
            .ok_or_else(|| AssetError::UnknownTexture(id.to_string()))?;

        Ok(TextureInfo {
            handle,
            width: texture.width,
            height: texture.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_registered_texture_resolves() {
        let mut assets = InMemoryAssets::new();
        let handle = assets.register("ball", 32, 16).unwrap();

        let info = assets.texture("ball").unwrap();
        assert_eq!(info.handle, handle);
        assert_relative_eq!(info.size(), Vec2::new(32.0, 16.0));
    }

    #[test]
    fn test_unknown_texture_is_an_error() {
        let assets = InMemoryAssets::new();
        assert_eq!(
            assets.texture("missing"),
            Err(AssetError::UnknownTexture("missing".to_string()))
        );
    }

    #[test]
    fn test_reregistering_replaces_handle() {
        let mut assets = InMemoryAssets::new();
        let first = assets.register("wall", 8, 8).unwrap();
        let second = assets.register("wall", 16, 8).unwrap();

        assert_ne!(first, second);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets.texture("wall").unwrap().width, 16);
        assert!(assets.register("empty", 0, 4).is_err());
    }
}
