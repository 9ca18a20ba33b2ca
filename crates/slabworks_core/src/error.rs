//! # Error Types
//!
//! Exhaustion is the only hard failure of the pool layer. Routine outcomes
//! (duplicate add, missing remove, duplicate enroll, ...) are reported as
//! `bool` by the entity API and never show up here.

use thiserror::Error;

/// Errors raised by pool acquisition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot of the pool is occupied.
    #[error("{pool} pool reached max capacity ({capacity})")]
    Exhausted {
        /// Label of the pool that ran out of slots.
        pool: &'static str,
        /// Fixed capacity of that pool.
        capacity: usize,
    },
}

impl PoolError {
    /// Returns the label of the pool that raised this error.
    #[must_use]
    pub const fn pool(&self) -> &'static str {
        match self {
            Self::Exhausted { pool, .. } => *pool,
        }
    }
}

/// Errors raised while loading or validating a store configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// A pool capacity was set to zero.
    #[error("capacity of the {0} pool must be greater than zero")]
    ZeroCapacity(&'static str),

    /// The per-entity group bound is outside `1..=Group::COUNT`.
    #[error("max_groups_per_entity must be within 1..={max}, got {value}")]
    GroupBound {
        /// The configured value.
        value: usize,
        /// The largest accepted value.
        max: usize,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
