//! # SLABWORKS Core
//!
//! Fixed-capacity object pools and an entity layer built on them:
//! - O(1) acquire and release through an index free-list
//! - No heap allocations after construction
//! - Exclusive handles that return their slot exactly once
//!
//! ## Architecture Rules
//!
//! 1. **Pre-allocated storage** - A pool's slots are built once and never move
//! 2. **Handles own slots** - Dropping a handle is the only way to free a slot
//! 3. **One lock per pool** - Pools never contend with each other
//! 4. **Scans gate on validity** - Batch systems see free slots and must skip them
//!
//! ## Example
//!
//! ```rust
//! use slabworks_core::{systems, ComponentKind, EntityStore, Physics};
//!
//! let store = EntityStore::new(64);
//! let entity = store.request_entity().unwrap();
//! entity.add_component(ComponentKind::Physics).unwrap();
//! entity.with_component::<Physics, _>(|body| body.x_velocity = 2.0);
//!
//! systems::move_system(&store);
//! assert_eq!(entity.with_component::<Physics, _>(|body| body.x_pos), Some(2.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;
pub mod systems;

pub use config::StoreConfig;
pub use ecs::{
    Component, ComponentKind, ComponentSlot, Entity, EntityId, EntityRecord, EntityStore, Group,
    GroupSlots, Lifetime, Physics,
};
pub use error::{ConfigError, PoolError, PoolResult};
pub use memory::{PoolHandle, SlabPool, Slot};
