//! Bouncing body scenarios
//!
//! A circle flying into a static wall, driven through the full world step

use crate::core::{ChangeTracking, EngineConfig};
use crate::ecs::components::{SolidBodyComponent, TransformComponent};
use crate::ecs::{Entity, World};
use crate::foundation::math::Vec2;
use crate::physics::collision::Shape;

const DELTA_TIME: f32 = 0.1;

struct Scene {
    world: World,
    ball: Entity,
    wall: Entity,
}

fn ball_and_wall(config: EngineConfig) -> Scene {
    let mut world = World::new(config).unwrap();

    let ball = world.create_entity();
    world.add_transform(ball, TransformComponent::from_position(Vec2::new(0.0, 0.0)));
    world.add_collider(ball, Shape::circle(Vec2::zeros(), 1.0));
    world.add_solid_body(ball, SolidBodyComponent::new(Vec2::new(5.0, 0.0)));

    let wall = world.create_entity();
    world.add_transform(wall, TransformComponent::identity());
    world.add_collider(wall, Shape::rect(Vec2::new(10.0, -5.0), Vec2::new(20.0, 5.0)));

    Scene { world, ball, wall }
}

/// Step until the ball's x velocity turns negative, returning the step count
fn step_until_bounce(scene: &mut Scene) -> Option<usize> {
    (1..=100).find(|_| {
        scene.world.step(DELTA_TIME);
        scene.world.velocity(scene.ball).x < 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ball_bounces_off_wall() {
        let mut scene = ball_and_wall(EngineConfig::default());

        let steps = step_until_bounce(&mut scene).expect("ball never reached the wall");
        assert!(steps > 1, "ball starts nine units away from the wall");

        let hits = scene.world.collisions(scene.ball);
        assert!(hits.iter().any(|hit| hit.other == scene.wall));
        assert_relative_eq!(scene.world.velocity(scene.ball), Vec2::new(-5.0, 0.0), epsilon = 1e-5);

        let mut last_x = scene.world.position(scene.ball).x;
        for _ in 0..10 {
            scene.world.step(DELTA_TIME);
            let x = scene.world.position(scene.ball).x;
            assert!(x < last_x, "ball must keep moving away from the wall");
            last_x = x;
        }
        assert!(scene.world.velocity(scene.ball).x < 0.0);
        assert!(scene.world.collisions(scene.ball).is_empty());
    }

    #[test]
    fn test_bounce_is_the_same_without_dirty_tracking() {
        let mut dirty = ball_and_wall(EngineConfig::default());
        let mut all = ball_and_wall(
            EngineConfig::default().with_change_tracking(ChangeTracking::All),
        );

        assert_eq!(step_until_bounce(&mut dirty), step_until_bounce(&mut all));
        assert_relative_eq!(
            dirty.world.position(dirty.ball),
            all.world.position(all.ball),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_wall_records_the_contact_too() {
        let mut scene = ball_and_wall(EngineConfig::default());
        step_until_bounce(&mut scene).expect("ball never reached the wall");

        let hits = scene.world.collisions_for(&[scene.ball, scene.wall]);
        let wall_hits = hits[1];
        assert_eq!(wall_hits.len(), 1);
        assert_eq!(wall_hits[0].other, scene.ball);
        assert_relative_eq!(wall_hits[0].normal_a, Vec2::new(-1.0, 0.0));
        assert_relative_eq!(wall_hits[0].normal_b, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_destroyed_wall_stops_collisions() {
        let mut scene = ball_and_wall(EngineConfig::default());
        scene.world.destroy_entity(scene.wall);

        for _ in 0..40 {
            scene.world.step(DELTA_TIME);
        }
        assert_relative_eq!(scene.world.velocity(scene.ball), Vec2::new(5.0, 0.0));
        assert_relative_eq!(scene.world.position(scene.ball).x, 20.0, epsilon = 1e-3);
    }
}
