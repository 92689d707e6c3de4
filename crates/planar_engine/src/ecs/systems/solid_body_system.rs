//! Solid body integration
//!
//! Moves every solid body by its velocity after bouncing it off the surfaces
//! its collider touched during the current step. Reflection and translation
//! happen in the same update, so the body already moves with the reflected
//! velocity on the step that detects the contact.

use crate::core::EngineResult;
use crate::ecs::components::{ColliderComponent, Collision, SolidBodyComponent, TransformStore};
use crate::ecs::systems::ColliderStore;
use crate::ecs::ComponentStore;
use crate::foundation::math::{utils, Vec2};

/// Velocity after bouncing off every blocking surface in `collisions`
///
/// A contact blocks when the body moves into the touched surface, i.e. the
/// velocity has a non-positive dot product with that surface's normal. The
/// blocking normals are summed and normalized; a non-zero sum mirrors the
/// velocity: `v' = v - 2 (v . n) n`.
pub fn resolve_velocity(velocity: Vec2, collisions: &[Collision]) -> Vec2 {
    let blocking: Vec2 = collisions
        .iter()
        .map(Collision::surface_normal)
        .filter(|normal| velocity.dot(normal) <= 0.0)
        .sum();

    match utils::try_normalize(blocking) {
        Some(normal) => utils::reflect(velocity, normal),
        None => velocity,
    }
}

/// Advance every solid body by `delta_time` seconds
///
/// Bodies without a collider just drift. Every body needs a transform.
pub fn integrate(
    bodies: &mut ComponentStore<SolidBodyComponent>,
    colliders: &ColliderStore,
    transforms: &mut TransformStore,
    delta_time: f32,
) -> EngineResult<()> {
    for (entity, body) in bodies.iter_mut() {
        let collisions = colliders
            .get(entity)
            .map_or(&[][..], ColliderComponent::collisions);

        body.velocity = resolve_velocity(body.velocity, collisions);
        transforms.translate(entity, body.velocity * delta_time)?;
    }
    Ok(())
}
