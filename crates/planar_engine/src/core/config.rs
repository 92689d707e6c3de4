//! # Engine Configuration
//!
//! Every tunable of the simulation core lives here. The structures are plain
//! serde data so they can be loaded from TOML or RON through [`Config`].
//!
//! ## Configuration Categories
//!
//! - **Entities**: registry capacity and the index reuse delay
//! - **Spatial**: world boundary and quadtree shape
//! - **Collision**: narrow-phase behaviour
//! - **Transforms**: change tracking strategy

use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec2;
use crate::physics::collision::Rect;
use serde::{Deserialize, Serialize};

/// # Entity Registry Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Maximum number of entity slots ever allocated
    pub max_entities: usize,
    /// Free indices are only reused once at least this many are queued
    pub min_free_indices: usize,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            max_entities: 1 << 16,
            min_free_indices: 1024,
        }
    }
}

/// # Spatial Partitioning Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Fixed region covered by the quadtree root
    pub world_bounds: Rect,
    /// Colliders of one shape kind a leaf holds before it subdivides
    pub node_capacity: usize,
    /// Depth at which full leaves stop subdividing and grow instead
    pub max_depth: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            world_bounds: Rect::new(Vec2::new(-1000.0, -1000.0), Vec2::new(1000.0, 1000.0)),
            node_capacity: 8,
            max_depth: 8,
        }
    }
}

/// # Collision Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Test each unordered collider pair once per step, even when the pair
    /// shares several leaves. Off by default: every shared leaf reports the
    /// pair again.
    pub deduplicate_pairs: bool,
}

/// How the transform store answers "what changed since the last step"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTracking {
    /// Every entity with a transform is reported every step
    All,
    /// Only entities whose transform was written since the last step
    #[default]
    Dirty,
}

/// # Transform Store Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Change tracking strategy
    pub change_tracking: ChangeTracking,
}

/// # Engine Configuration
///
/// Root configuration consumed by [`World::new`](crate::ecs::World::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Entity registry settings
    pub entities: EntityConfig,
    /// Quadtree settings
    pub spatial: SpatialConfig,
    /// Narrow-phase settings
    pub collision: CollisionConfig,
    /// Transform store settings
    pub transforms: TransformConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            entities: EntityConfig::default(),
            spatial: SpatialConfig::default(),
            collision: CollisionConfig::default(),
            transforms: TransformConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Builder pattern: Set world bounds
    pub fn with_world_bounds(mut self, bounds: Rect) -> Self {
        self.spatial.world_bounds = bounds;
        self
    }

    /// Builder pattern: Set quadtree leaf capacity
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.spatial.node_capacity = capacity;
        self
    }

    /// Builder pattern: Set change tracking strategy
    pub fn with_change_tracking(mut self, tracking: ChangeTracking) -> Self {
        self.transforms.change_tracking = tracking;
        self
    }

    /// Builder pattern: Set pair deduplication
    pub fn with_deduplicated_pairs(mut self, enabled: bool) -> Self {
        self.collision.deduplicate_pairs = enabled;
        self
    }

    /// Builder pattern: Set entity limits
    pub fn with_entity_limits(mut self, max_entities: usize, min_free_indices: usize) -> Self {
        self.entities.max_entities = max_entities;
        self.entities.min_free_indices = min_free_indices;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entities.max_entities == 0 {
            return Err(ConfigError::Invalid("max_entities must be at least 1".to_string()));
        }
        if self.entities.max_entities > u32::MAX as usize {
            return Err(ConfigError::Invalid("max_entities cannot exceed u32::MAX".to_string()));
        }
        if self.entities.min_free_indices >= self.entities.max_entities {
            return Err(ConfigError::Invalid(
                "min_free_indices must be smaller than max_entities".to_string(),
            ));
        }
        if self.spatial.node_capacity == 0 {
            return Err(ConfigError::Invalid("node_capacity must be at least 1".to_string()));
        }
        if !self.spatial.world_bounds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "world bounds {:?} are degenerate",
                self.spatial.world_bounds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_reserve_larger_than_capacity() {
        let config = EngineConfig::default().with_entity_limits(16, 16);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_degenerate_bounds() {
        let config = EngineConfig::default()
            .with_world_bounds(Rect::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            log_level = "debug"

            [collision]
            deduplicate_pairs = true

            [transforms]
            change_tracking = "all"
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.collision.deduplicate_pairs);
        assert_eq!(config.transforms.change_tracking, ChangeTracking::All);
        assert_eq!(config.spatial, SpatialConfig::default());
        assert_eq!(config.entities, EntityConfig::default());
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("planar_engine_cfg_{}.ron", std::process::id()));
        let config = EngineConfig::default().with_node_capacity(3);

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = EngineConfig::load_from_file("engine.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
