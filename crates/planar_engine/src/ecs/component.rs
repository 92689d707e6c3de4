//! Component trait and implementations

use super::entity::StoreId;

/// Data that lives in a [`ComponentStore`](super::ComponentStore)
pub trait Component: 'static {
    /// Store that owns components of this type
    const STORE: StoreId;
}

impl Component for super::components::TransformComponent {
    const STORE: StoreId = StoreId::Transform;
}

impl Component for super::components::ColliderComponent {
    const STORE: StoreId = StoreId::Collider;
}

impl Component for super::components::SolidBodyComponent {
    const STORE: StoreId = StoreId::SolidBody;
}

impl Component for super::components::SpriteComponent {
    const STORE: StoreId = StoreId::Sprite;
}
