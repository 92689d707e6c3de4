//! Bounce demo application
//!
//! Headless run of the planar engine core:
//! - Loads an engine configuration (TOML or RON), falling back to defaults
//! - Builds a walled arena inside the world bounds
//! - Spawns balls with random positions and velocities
//! - Steps the world at a fixed rate and logs what happens
//!
//! Usage: `bounce [config-path] [seed]`

use planar_engine::foundation::logging;
use planar_engine::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use thiserror::Error;

// Simulation settings
const DEFAULT_CONFIG_PATH: &str = "bounce_app/bounce.toml";
const DEFAULT_SEED: u64 = 7;
const NUM_BALLS: usize = 24;
const STEPS: u64 = 600;
const DELTA_TIME: f32 = 1.0 / 60.0;
const REPORT_EVERY: u64 = 120;

// Arena layout, as a fraction of the world bounds
const ARENA_FILL: f32 = 0.8;
const WALL_THICKNESS: f32 = 2.0;
const BALL_SPEED: f32 = 12.0;

#[derive(Error, Debug)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}

struct Ball {
    entity: Entity,
    bounces: u32,
}

struct BounceApp {
    world: World,
    assets: InMemoryAssets,
    balls: Vec<Ball>,
    draw_list: DrawList,
    rng: StdRng,
}

impl BounceApp {
    fn new(config: EngineConfig, seed: u64) -> Result<Self, AppError> {
        let mut assets = InMemoryAssets::new();
        assets.register("ball", 2, 2)?;
        assets.register("wall", 1, 1)?;

        Ok(Self {
            world: World::new(config)?,
            assets,
            balls: Vec::new(),
            draw_list: DrawList::new().with_colliders(true),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Four static walls just inside the world bounds
    fn build_arena(&mut self) -> Result<Rect, AppError> {
        let bounds = self.world.config().spatial.world_bounds;
        let arena = Rect::from_center_size(bounds.center(), bounds.size() * ARENA_FILL);
        let wall_texture = self.assets.texture("wall")?;
        let t = WALL_THICKNESS;

        let walls = [
            Rect::new(Vec2::new(arena.min.x - t, arena.max.y), Vec2::new(arena.max.x + t, arena.max.y + t)),
            Rect::new(Vec2::new(arena.min.x - t, arena.min.y - t), Vec2::new(arena.max.x + t, arena.min.y)),
            Rect::new(Vec2::new(arena.min.x - t, arena.min.y), Vec2::new(arena.min.x, arena.max.y)),
            Rect::new(Vec2::new(arena.max.x, arena.min.y), Vec2::new(arena.max.x + t, arena.max.y)),
        ];

        for wall in walls {
            let entity = self.world.create_entity();
            self.world.add_transform(entity, TransformComponent::from_position(wall.center()));
            self.world.add_collider(entity, Shape::rect_from_size(wall.size()));
            self.world.add_sprite(
                entity,
                SpriteComponent::from_texture(&wall_texture).with_size(wall.size()),
            );
        }

        log::info!("Built arena {:?}..{:?}", arena.min, arena.max);
        Ok(arena)
    }

    fn spawn_balls(&mut self, arena: &Rect) -> Result<(), AppError> {
        let texture = self.assets.texture("ball")?;
        let radius = texture.size().x.max(texture.size().y) * 0.5;

        for _ in 0..NUM_BALLS {
            let position = Vec2::new(
                self.rng.gen_range(arena.min.x + radius..arena.max.x - radius),
                self.rng.gen_range(arena.min.y + radius..arena.max.y - radius),
            );
            let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let velocity = Vec2::new(heading.cos(), heading.sin()) * BALL_SPEED;

            let entity = self.world.create_entity();
            self.world.add_transform(entity, TransformComponent::from_position(position));
            self.world.add_collider(entity, Shape::circle(Vec2::zeros(), radius));
            self.world.add_solid_body(entity, SolidBodyComponent::new(velocity));
            self.world.add_sprite(entity, SpriteComponent::from_texture(&texture));
            self.balls.push(Ball { entity, bounces: 0 });
        }

        log::info!("Spawned {} balls of radius {radius}", self.balls.len());
        Ok(())
    }

    fn run(&mut self) -> Result<(), AppError> {
        let arena = self.build_arena()?;
        self.spawn_balls(&arena)?;

        for _ in 0..STEPS {
            self.world.step(DELTA_TIME);
            self.count_bounces();

            if self.world.step_count() % REPORT_EVERY == 0 {
                self.report();
            }
        }

        let total: u32 = self.balls.iter().map(|ball| ball.bounces).sum();
        log::info!(
            "Finished {} steps: {} live entities, {} contacts with walls or balls",
            self.world.step_count(),
            self.world.live_entities(),
            total
        );
        Ok(())
    }

    fn count_bounces(&mut self) {
        for ball in &mut self.balls {
            if self.world.has_collider(ball.entity) && !self.world.collisions(ball.entity).is_empty() {
                ball.bounces += 1;
            }
        }
    }

    fn report(&mut self) {
        self.world.collect_draw_list(&mut self.draw_list);
        log::info!(
            "Step {}: {} quadtree leaves, {} sprites, {} collider outlines",
            self.world.step_count(),
            self.world.quadtree().leaf_count(),
            self.draw_list.sprites().count(),
            self.draw_list.colliders().count()
        );

        for ball in self.balls.iter().take(3) {
            let position = self.world.position(ball.entity);
            let velocity = self.world.velocity(ball.entity);
            log::debug!(
                "  ball {}: pos ({:.2}, {:.2}) vel ({:.2}, {:.2}) bounces {}",
                ball.entity,
                position.x,
                position.y,
                velocity.x,
                velocity.y,
                ball.bounces
            );
        }
    }
}

fn load_config(path: &str, loaded: Result<EngineConfig, ConfigError>) -> EngineConfig {
    match loaded {
        Ok(config) => {
            log::info!("Using configuration from {path}");
            config
        }
        Err(ConfigError::Io(e)) => {
            log::warn!("Could not read {path} ({e}), using default configuration");
            EngineConfig::default()
        }
        Err(e) => {
            log::warn!("Ignoring {path}: {e}");
            EngineConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let seed = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    // The log level lives in the config, so logging starts after the one read
    let loaded = EngineConfig::load_from_file(&config_path);
    let log_level = loaded
        .as_ref()
        .map_or_else(|_| EngineConfig::default().log_level, |config| config.log_level.clone());
    logging::init_with_level(&log_level);
    log::info!("Starting bounce demo (config {config_path}, seed {seed})");

    let config = load_config(&config_path, loaded);
    let mut app = BounceApp::new(config, seed)?;

    match app.run() {
        Ok(()) => {
            log::info!("Bounce demo finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Application error: {e}");
            Err(e.into())
        }
    }
}
