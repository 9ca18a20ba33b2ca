//! # Entity Management
//!
//! Entities are identifiers plus a record living in the store's entity pool:
//! - One component cell per [`ComponentKind`]
//! - A fixed-size group membership array

use std::fmt;

use super::component::{ComponentKind, ComponentSlot};
use super::group::{Group, GroupSlots};

/// Unique identifier for an entity.
///
/// Ids come from a per-store counter. They only ever grow and are never
/// reused, even when entity slots are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an entity ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("entity#null")
        } else {
            write!(f, "entity#{}", self.0)
        }
    }
}

/// Entity body stored in the entity pool.
///
/// Batch processors see these records when scanning
/// [`EntityStore::entities`](super::EntityStore::entities). Component cells
/// are only written by the owning [`Entity`](super::Entity), so each kind
/// stays in the cell reserved for it:
///
/// ```compile_fail
/// use slabworks_core::{ComponentKind, ComponentSlot, EntityRecord};
///
/// let mut record = EntityRecord::default();
/// *record.component_mut(ComponentKind::Physics) = ComponentSlot::Empty;
/// ```
#[derive(Debug, Default)]
pub struct EntityRecord {
    pub(crate) id: EntityId,
    pub(crate) components: [ComponentSlot; ComponentKind::COUNT],
    pub(crate) groups: GroupSlots,
}

impl EntityRecord {
    /// Returns the id of the entity owning this record.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns whether a component of `kind` is attached.
    #[inline]
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.component(kind).holds(kind)
    }

    /// Returns the cell reserved for `kind`.
    #[inline]
    #[must_use]
    pub fn component(&self, kind: ComponentKind) -> &ComponentSlot {
        &self.components[kind.index()]
    }

    #[inline]
    pub(crate) fn component_mut(&mut self, kind: ComponentKind) -> &mut ComponentSlot {
        &mut self.components[kind.index()]
    }

    /// Returns whether the entity is enrolled in `group`.
    #[inline]
    #[must_use]
    pub fn is_member_of(&self, group: Group) -> bool {
        self.groups.contains(group)
    }

    /// Returns the group membership array.
    #[inline]
    #[must_use]
    pub const fn groups(&self) -> &GroupSlots {
        &self.groups
    }

    /// Drops every attached component and clears the group array.
    pub(crate) fn clear(&mut self) {
        for cell in &mut self.components {
            *cell = ComponentSlot::Empty;
        }
        self.groups.clear();
    }
}
