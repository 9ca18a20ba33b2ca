//! # Entity Store
//!
//! Owns one pool per component kind plus the entity pool, and hands out
//! [`Entity`] handles that compose them.
//!
//! ```text
//!   EntityStore
//!   ├── entities:  SlabPool<EntityRecord>   ──┐
//!   ├── physics:   SlabPool<Physics>   <──────┤ component cells hold
//!   └── lifetimes: SlabPool<Lifetime>  <──────┘ PoolHandles into these
//! ```
//!
//! Every pool has its own lock, so work on the physics pool never waits on
//! the lifetime pool. Attaching components to a new entity is not atomic
//! with respect to concurrent scans: a scanner may see an entity before all
//! of its components are in place.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::component::{Component, ComponentKind, ComponentSlot, Lifetime, Physics};
use super::entity::{EntityId, EntityRecord};
use super::group::{Group, GroupSlots};
use crate::config::StoreConfig;
use crate::error::{ConfigError, PoolResult};
use crate::memory::{PoolHandle, SlabPool};

/// Container of entities, their components and group memberships.
///
/// All memory is pre-allocated at creation. Requesting entities, attaching
/// components and enrolling into groups never allocate.
///
/// # Example
///
/// ```rust
/// use slabworks_core::{ComponentKind, EntityStore, Group, Physics};
///
/// let store = EntityStore::new(16);
///
/// let entity = store.request_entity().unwrap();
/// assert!(entity.add_component(ComponentKind::Physics).unwrap());
/// entity.with_component::<Physics, _>(|body| body.x_velocity = 1.0);
/// assert!(entity.enroll_to_group(Group::Movers));
///
/// drop(entity);
/// assert_eq!(store.physics().size(), 0);
/// ```
pub struct EntityStore {
    entities: Arc<SlabPool<EntityRecord>>,
    physics: Arc<SlabPool<Physics>>,
    lifetimes: Arc<SlabPool<Lifetime>>,
    next_id: AtomicU64,
    max_groups: usize,
}

impl EntityStore {
    /// Creates a store where every pool holds `capacity` records.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        Self::build(&StoreConfig::uniform(capacity))
    }

    /// Creates a store from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreConfig::validate`] error for an invalid config.
    pub fn with_config(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(&config))
    }

    fn build(config: &StoreConfig) -> Self {
        tracing::debug!(?config, "entity store constructed");
        Self {
            entities: SlabPool::new("entities", config.entity_capacity),
            physics: SlabPool::new(ComponentKind::Physics.pool_name(), config.physics_capacity),
            lifetimes: SlabPool::new(ComponentKind::Lifetime.pool_name(), config.lifetime_capacity),
            next_id: AtomicU64::new(0),
            max_groups: config.max_groups_per_entity,
        }
    }

    /// Requests a new entity with the next id.
    ///
    /// The id is drawn only once a slot was obtained, so a failed request
    /// does not consume one. Ids are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`](crate::PoolError::Exhausted) if the
    /// entity pool is full.
    pub fn request_entity(&self) -> PoolResult<Entity<'_>> {
        let record = self.entities.acquire_with(|record| {
            record.id = EntityId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        })?;

        let entity = Entity {
            store: self,
            record,
        };
        tracing::trace!(id = %entity.id(), "entity born");
        Ok(entity)
    }

    /// Returns whether the entity pool is full.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entities.is_full()
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.entities.size()
    }

    /// Returns the entity capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Returns the id the next successful request will receive.
    #[inline]
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        EntityId::new(self.next_id.load(Ordering::Relaxed))
    }

    /// Returns the number of groups one entity may join at once.
    #[inline]
    #[must_use]
    pub const fn max_groups_per_entity(&self) -> usize {
        self.max_groups
    }

    /// Returns the entity pool, for group-filtered scans.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &SlabPool<EntityRecord> {
        &self.entities
    }

    /// Returns the physics component pool.
    #[inline]
    #[must_use]
    pub fn physics(&self) -> &SlabPool<Physics> {
        &self.physics
    }

    /// Returns the lifetime component pool.
    #[inline]
    #[must_use]
    pub fn lifetimes(&self) -> &SlabPool<Lifetime> {
        &self.lifetimes
    }

    fn acquire_component(&self, kind: ComponentKind) -> PoolResult<ComponentSlot> {
        match kind {
            ComponentKind::Physics => self.physics.acquire().map(ComponentSlot::Physics),
            ComponentKind::Lifetime => self.lifetimes.acquire().map(ComponentSlot::Lifetime),
        }
    }
}

impl fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("entities", &self.entities)
            .field("physics", &self.physics)
            .field("lifetimes", &self.lifetimes)
            .field("next_id", &self.next_id())
            .field("max_groups", &self.max_groups)
            .finish()
    }
}

/// A live entity of an [`EntityStore`].
///
/// Dropping it drops every attached component, clears its groups and then
/// returns its own slot to the entity pool.
///
/// Methods lock the entity's record for their duration. Do not call them on
/// the same entity from inside a [`group_system`](crate::systems::group_system)
/// callback visiting it, or from the closure passed to
/// [`Entity::get_component`].
pub struct Entity<'store> {
    store: &'store EntityStore,
    record: PoolHandle<EntityRecord>,
}

impl Entity<'_> {
    /// Returns the entity's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.record.lock().id
    }

    /// Returns whether a component of `kind` is attached.
    #[inline]
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.record.lock().has_component(kind)
    }

    /// Attaches a fresh component of `kind`.
    ///
    /// Returns `Ok(false)` if one is already attached.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`](crate::PoolError::Exhausted) if the
    /// component pool is full. The entity stays valid without the component.
    pub fn add_component(&self, kind: ComponentKind) -> PoolResult<bool> {
        let mut record = self.record.lock();
        if record.has_component(kind) {
            return Ok(false);
        }

        *record.component_mut(kind) = self.store.acquire_component(kind)?;
        Ok(true)
    }

    /// Detaches the component of `kind`, returning its slot to the pool.
    ///
    /// Returns `false` if none is attached.
    pub fn remove_component(&self, kind: ComponentKind) -> bool {
        let mut record = self.record.lock();
        let removed = std::mem::take(record.component_mut(kind));
        !removed.is_empty()
    }

    /// Runs `f` on the cell reserved for `kind`, empty or not.
    ///
    /// The cell itself is read-only; the component payload is reached through
    /// the handle's [`PoolHandle::lock`]. The entity's record stays locked
    /// while `f` runs.
    #[inline]
    pub fn get_component<R>(
        &self,
        kind: ComponentKind,
        f: impl FnOnce(&ComponentSlot) -> R,
    ) -> R {
        f(self.record.lock().component(kind))
    }

    /// Runs `f` on the attached component of type `C`.
    ///
    /// Returns `None` if no such component is attached.
    pub fn with_component<C, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R>
    where
        C: Component,
    {
        let record = self.record.lock();
        let handle = C::project(record.component(C::KIND))?;
        let mut value = handle.lock();
        let result = f(&mut *value);
        Some(result)
    }

    /// Returns whether the entity is enrolled in `group`.
    #[inline]
    #[must_use]
    pub fn is_member_of(&self, group: Group) -> bool {
        self.record.lock().is_member_of(group)
    }

    /// Enrolls the entity into `group`.
    ///
    /// Returns `false` if already a member or if the entity already belongs
    /// to as many groups as the store allows.
    pub fn enroll_to_group(&self, group: Group) -> bool {
        self.record.lock().groups.enroll(group, self.store.max_groups)
    }

    /// Dismisses the entity from `group`.
    ///
    /// Returns `false` if not a member.
    pub fn dismiss_from_group(&self, group: Group) -> bool {
        self.record.lock().groups.dismiss(group)
    }

    /// Returns a copy of the group membership array.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> GroupSlots {
        self.record.lock().groups
    }

    /// Returns the entity slot index in the store's entity pool.
    #[inline]
    #[must_use]
    pub fn slot_index(&self) -> usize {
        self.record.index()
    }

    /// Destroys the entity. Equivalent to dropping it.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Entity<'_> {
    fn drop(&mut self) {
        let mut record = self.record.lock();
        let id = record.id;
        record.clear();
        drop(record);

        tracing::trace!(%id, "entity died");
        // `self.record` is dropped next and returns the entity slot.
    }
}

impl fmt::Debug for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id())
            .field("slot", &self.record.index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;

    #[test]
    fn test_store_creation() {
        let store = EntityStore::new(100);
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.size(), 0);
        assert!(!store.is_full());
        assert_eq!(store.next_id(), EntityId::new(0));
    }

    #[test]
    fn test_ids_survive_drain_and_refill() {
        let store = EntityStore::new(2);

        let a = store.request_entity().unwrap();
        let b = store.request_entity().unwrap();
        assert_eq!(a.id(), EntityId::new(0));
        assert_eq!(b.id(), EntityId::new(1));
        assert!(store.is_full());
        assert!(store.request_entity().is_err());

        drop(a);
        drop(b);

        let c = store.request_entity().unwrap();
        let d = store.request_entity().unwrap();
        assert_eq!(c.id(), EntityId::new(2));
        assert_eq!(d.id(), EntityId::new(3));
        assert!(matches!(
            store.request_entity(),
            Err(PoolError::Exhausted { pool: "entities", capacity: 2 })
        ));
    }

    #[test]
    fn test_independent_stores_have_independent_ids() {
        let first = EntityStore::new(4);
        let second = EntityStore::new(4);

        let _a = first.request_entity().unwrap();
        let _b = first.request_entity().unwrap();
        let c = second.request_entity().unwrap();
        assert_eq!(c.id(), EntityId::new(0));
    }

    #[test]
    fn test_component_exhaustion_is_an_error() {
        let config = StoreConfig {
            physics_capacity: 1,
            ..StoreConfig::uniform(4)
        };
        let store = EntityStore::with_config(config).unwrap();

        let a = store.request_entity().unwrap();
        let b = store.request_entity().unwrap();
        assert_eq!(a.add_component(ComponentKind::Physics), Ok(true));
        assert_eq!(a.add_component(ComponentKind::Physics), Ok(false));

        let err = b.add_component(ComponentKind::Physics).unwrap_err();
        assert_eq!(err.pool(), "physics");
        assert!(!b.has_component(ComponentKind::Physics));

        // Entity stays usable without the component.
        assert_eq!(b.add_component(ComponentKind::Lifetime), Ok(true));
    }

    #[test]
    fn test_get_component_mutates_in_place() {
        let store = EntityStore::new(2);
        let entity = store.request_entity().unwrap();

        assert!(entity.get_component(ComponentKind::Lifetime, ComponentSlot::is_empty));
        assert!(entity.add_component(ComponentKind::Lifetime).unwrap());

        entity.get_component(ComponentKind::Lifetime, |cell| match cell {
            ComponentSlot::Lifetime(handle) => handle.lock().remaining = 17,
            other => panic!("unexpected cell {other:?}"),
        });

        let remaining = entity.with_component::<Lifetime, _>(|lifetime| lifetime.remaining);
        assert_eq!(remaining, Some(17));
        assert_eq!(entity.with_component::<Physics, _>(|body| body.x_pos), None);
    }

    #[test]
    fn test_cells_keep_their_kind() {
        let store = EntityStore::new(4);
        let entity = store.request_entity().unwrap();

        for kind in ComponentKind::ALL {
            assert_eq!(entity.add_component(kind), Ok(true));
            assert_eq!(entity.add_component(kind), Ok(false));
        }
        assert!(entity.remove_component(ComponentKind::Lifetime));
        assert_eq!(entity.add_component(ComponentKind::Lifetime), Ok(true));

        for kind in ComponentKind::ALL {
            assert_eq!(entity.get_component(kind, ComponentSlot::kind), Some(kind));
        }
        assert_eq!(store.physics().size(), 1);
        assert_eq!(store.lifetimes().size(), 1);

        // The record is unlocked again once the closure returns.
        entity.get_component(ComponentKind::Physics, |_| ());
        assert!(entity.has_component(ComponentKind::Physics));
    }

    #[test]
    fn test_drop_returns_every_slot() {
        let store = EntityStore::new(4);
        let entity = store.request_entity().unwrap();
        entity.add_component(ComponentKind::Physics).unwrap();
        entity.add_component(ComponentKind::Lifetime).unwrap();
        assert!(entity.enroll_to_group(Group::Organisms));

        let slot = entity.slot_index();
        assert_eq!(store.physics().size(), 1);
        assert_eq!(store.lifetimes().size(), 1);

        entity.release();
        assert_eq!(store.size(), 0);
        assert_eq!(store.physics().size(), 0);
        assert_eq!(store.lifetimes().size(), 0);

        let reborn = store.request_entity().unwrap();
        assert_eq!(reborn.slot_index(), slot);
        assert!(reborn.groups().is_empty());
        assert!(!reborn.has_component(ComponentKind::Physics));
    }

    #[test]
    fn test_configured_group_bound() {
        let config = StoreConfig {
            max_groups_per_entity: 1,
            ..StoreConfig::uniform(2)
        };
        let store = EntityStore::with_config(config).unwrap();
        let entity = store.request_entity().unwrap();

        assert!(entity.enroll_to_group(Group::Movers));
        assert!(!entity.enroll_to_group(Group::Dummy));
        assert!(entity.dismiss_from_group(Group::Movers));
        assert!(entity.enroll_to_group(Group::Dummy));
    }
}
