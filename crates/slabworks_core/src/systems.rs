//! # Batch Systems
//!
//! Systems scan a pool's raw slot array and mutate live records in place.
//! Free slots are part of every scan and are skipped by their validity flag.
//!
//! Systems touching different pools can run in parallel without contending:
//!
//! ```rust
//! use slabworks_core::{systems, ComponentKind, EntityStore, Group};
//!
//! let store = EntityStore::new(8);
//! let entity = store.request_entity().unwrap();
//! entity.add_component(ComponentKind::Physics).unwrap();
//! entity.enroll_to_group(Group::Dummy);
//!
//! std::thread::scope(|scope| {
//!     scope.spawn(|| systems::move_system(&store));
//!     scope.spawn(|| systems::decrease_lifetime_system(&store, |_| {}));
//!     scope.spawn(|| systems::group_system(&store, Group::Dummy, |_| {}));
//! });
//! ```

use crate::ecs::{EntityRecord, EntityStore, Group};

/// Applies one tick of velocity to every live physics record.
pub fn move_system(store: &EntityStore) {
    store.physics().for_each_valid(|_, body| body.step());
}

/// Counts every live lifetime down by one tick.
///
/// `on_expired` receives the index into [`EntityStore::lifetimes`] of each
/// countdown that reaches zero on this tick, exactly once per crossing. Match
/// it against the owner's lifetime [`PoolHandle::index`](crate::PoolHandle::index)
/// to find the entity. The hook runs after the slot lock is released, so it
/// may drop the entity owning that lifetime.
pub fn decrease_lifetime_system<F>(store: &EntityStore, mut on_expired: F)
where
    F: FnMut(usize),
{
    for (index, slot) in store.lifetimes().iter().enumerate() {
        let expired = match slot.lock_valid() {
            Some(mut lifetime) => lifetime.tick(),
            None => false,
        };
        if expired {
            tracing::trace!(index, "lifetime expired");
            on_expired(index);
        }
    }
}

/// Visits every live entity enrolled in `group`.
///
/// `f` runs under the visited entity's record lock and must not call methods
/// of that same [`Entity`](crate::Entity). Component payloads are written
/// through the handles in the record's cells.
pub fn group_system<F>(store: &EntityStore, group: Group, mut f: F)
where
    F: FnMut(&EntityRecord),
{
    store.entities().for_each_valid(|_, record| {
        if record.is_member_of(group) {
            f(&*record);
        }
    });
}
