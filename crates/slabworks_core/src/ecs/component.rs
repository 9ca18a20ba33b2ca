//! # Component System
//!
//! Components are pure data containers with no behavior.
//! They must be Copy and have a fixed size so a pool can reset them in place.
//!
//! The set of kinds is closed: [`ComponentKind`] names them and
//! [`ComponentSlot`] is the tagged union an entity stores per kind.

use bytemuck::{Pod, Zeroable};

use crate::memory::PoolHandle;

/// Marker trait for pooled components.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data
/// - `Zeroable`: The default state is all zeroes
/// - `Default`: Used to reset a slot on every acquire
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {
    /// The kind this component type is stored under.
    const KIND: ComponentKind;

    /// Returns the handle held by `slot` if it holds this component type.
    fn project(slot: &ComponentSlot) -> Option<&PoolHandle<Self>>;
}

/// The closed set of component kinds an entity may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Position and velocity, see [`Physics`].
    Physics,
    /// Countdown, see [`Lifetime`].
    Lifetime,
}

impl ComponentKind {
    /// Number of component kinds.
    pub const COUNT: usize = 2;

    /// Every kind, in cell order.
    pub const ALL: [Self; Self::COUNT] = [Self::Physics, Self::Lifetime];

    /// Returns the cell this kind occupies in an entity's component array.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Physics => 0,
            Self::Lifetime => 1,
        }
    }

    /// Returns the label of the pool backing this kind.
    #[inline]
    #[must_use]
    pub const fn pool_name(self) -> &'static str {
        match self {
            Self::Physics => "physics",
            Self::Lifetime => "lifetime",
        }
    }
}

/// One cell of an entity's component array.
#[derive(Debug, Default)]
pub enum ComponentSlot {
    /// No component attached.
    #[default]
    Empty,
    /// An owned physics record.
    Physics(PoolHandle<Physics>),
    /// An owned lifetime record.
    Lifetime(PoolHandle<Lifetime>),
}

impl ComponentSlot {
    /// Returns the kind held, or `None` for an empty cell.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Option<ComponentKind> {
        match self {
            Self::Empty => None,
            Self::Physics(_) => Some(ComponentKind::Physics),
            Self::Lifetime(_) => Some(ComponentKind::Lifetime),
        }
    }

    /// Returns whether the cell is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns whether the cell holds a component of `kind`.
    #[inline]
    #[must_use]
    pub fn holds(&self, kind: ComponentKind) -> bool {
        self.kind() == Some(kind)
    }
}

/// Physics component.
///
/// Position and per-tick velocity in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Physics {
    /// X coordinate.
    pub x_pos: f32,
    /// Y coordinate.
    pub y_pos: f32,
    /// X velocity, applied once per move tick.
    pub x_velocity: f32,
    /// Y velocity, applied once per move tick.
    pub y_velocity: f32,
}

impl Component for Physics {
    const KIND: ComponentKind = ComponentKind::Physics;

    #[inline]
    fn project(slot: &ComponentSlot) -> Option<&PoolHandle<Self>> {
        match slot {
            ComponentSlot::Physics(handle) => Some(handle),
            _ => None,
        }
    }
}

impl Physics {
    /// Advances the position by one tick of velocity.
    #[inline]
    pub fn step(&mut self) {
        self.x_pos += self.x_velocity;
        self.y_pos += self.y_velocity;
    }
}

/// Lifetime component.
///
/// A countdown in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Lifetime {
    /// Ticks left before expiry.
    pub remaining: u32,
}

impl Component for Lifetime {
    const KIND: ComponentKind = ComponentKind::Lifetime;

    #[inline]
    fn project(slot: &ComponentSlot) -> Option<&PoolHandle<Self>> {
        match slot {
            ComponentSlot::Lifetime(handle) => Some(handle),
            _ => None,
        }
    }
}

impl Lifetime {
    /// Counts down one tick.
    ///
    /// Returns `true` only on the tick that reaches zero. A countdown that is
    /// already zero stays there.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}
