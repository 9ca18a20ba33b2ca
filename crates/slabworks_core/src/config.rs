//! # Store Configuration
//!
//! Pool capacities and per-entity bounds, fixed when the store is built.
//!
//! ```toml
//! entity_capacity = 1024
//! physics_capacity = 1024
//! lifetime_capacity = 256
//! max_groups_per_entity = 2
//! ```

use serde::{Deserialize, Serialize};

use crate::ecs::Group;
use crate::error::ConfigError;

/// Default capacity of every pool.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Construction-time configuration of an [`EntityStore`](crate::EntityStore).
///
/// Missing TOML keys fall back to [`StoreConfig::default`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Capacity of the entity pool.
    pub entity_capacity: usize,
    /// Capacity of the physics component pool.
    pub physics_capacity: usize,
    /// Capacity of the lifetime component pool.
    pub lifetime_capacity: usize,
    /// Number of groups one entity may be enrolled in at once.
    pub max_groups_per_entity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_CAPACITY)
    }
}

impl StoreConfig {
    /// Every pool gets `capacity` slots; entities may join every group.
    #[must_use]
    pub const fn uniform(capacity: usize) -> Self {
        Self {
            entity_capacity: capacity,
            physics_capacity: capacity,
            lifetime_capacity: capacity,
            max_groups_per_entity: Group::COUNT,
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and the
    /// [`StoreConfig::validate`] errors on out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks capacities and the group bound.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] for an empty pool and
    /// [`ConfigError::GroupBound`] if `max_groups_per_entity` is outside
    /// `1..=Group::COUNT`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("entities"));
        }
        if self.physics_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("physics"));
        }
        if self.lifetime_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("lifetime"));
        }
        if !(1..=Group::COUNT).contains(&self.max_groups_per_entity) {
            return Err(ConfigError::GroupBound {
                value: self.max_groups_per_entity,
                max: Group::COUNT,
            });
        }
        Ok(())
    }
}
