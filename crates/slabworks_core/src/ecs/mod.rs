//! # Entity Component System
//!
//! Entities composed from pooled components and group tags.
//!
//! ## Design Philosophy
//!
//! - Every component kind has its own fixed-capacity pool
//! - An entity owns at most one component per kind, through a pool handle
//! - Component kinds and groups are closed enums, looked up by `match`
//! - Destroying an entity returns every slot it owns

mod component;
mod entity;
mod group;
mod store;

pub use component::{Component, ComponentKind, ComponentSlot, Lifetime, Physics};
pub use entity::{EntityId, EntityRecord};
pub use group::{Group, GroupSlots};
pub use store::{Entity, EntityStore};
