//! # Slab Pool
//!
//! Fixed-capacity pool for records of one type.
//!
//! ## Layout
//!
//! ```text
//!   slots:     [ S0 | S1 | S2 | S3 | ... | Sn-1 ]   allocated once, never moves
//!   free list: [ i0 | i1 | i2 | i3 | ... | in-1 ]
//!                     ^ top: next index handed out
//! ```
//!
//! Acquire pops `free[top]`, release pushes the index back below `top`.
//! Both are O(1) and never touch the heap.
//!
//! ## Scanning
//!
//! [`SlabPool::slots`] exposes every slot, free ones included. Scans take no
//! pool-level lock. Each slot carries its own lock and a validity flag that
//! is only written while that lock is held, so [`Slot::lock_valid`] either
//! yields a fully initialised live record or nothing.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::handle::PoolHandle;
use crate::error::{PoolError, PoolResult};

/// One fixed-address storage cell of a [`SlabPool`].
pub struct Slot<T> {
    /// True while a [`PoolHandle`] owns this slot. Written under `value`'s lock.
    valid: AtomicBool,
    /// The record itself.
    value: Mutex<T>,
}

impl<T> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            valid: AtomicBool::new(false),
            value: Mutex::new(value),
        }
    }

    /// Returns whether the slot currently holds a live record.
    ///
    /// Lock-free and advisory: the answer may change right after it is read.
    /// Use [`Slot::lock_valid`] before touching the payload.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Locks the slot and returns its record if it is live.
    ///
    /// Free slots are skipped without locking. For candidate slots the
    /// validity flag is re-checked under the slot lock, and it cannot flip
    /// while the returned guard is held.
    #[inline]
    pub fn lock_valid(&self) -> Option<MutexGuard<'_, T>> {
        if !self.is_valid() {
            return None;
        }

        let guard = self.value.lock();
        self.valid.load(Ordering::Acquire).then_some(guard)
    }

    /// Locks the slot regardless of its validity.
    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock()
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}

/// Stack of free slot indices.
///
/// `stack[..top]` are handed out, `stack[top..]` are free.
struct FreeList {
    stack: Box<[usize]>,
    top: usize,
}

impl FreeList {
    fn new(capacity: usize) -> Self {
        Self {
            stack: (0..capacity).collect::<Vec<_>>().into_boxed_slice(),
            top: 0,
        }
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        let index = *self.stack.get(self.top)?;
        self.top += 1;
        Some(index)
    }

    #[inline]
    fn push(&mut self, index: usize) {
        debug_assert!(self.top > 0, "free list overflow: index {index} released twice");
        self.top -= 1;
        self.stack[self.top] = index;
    }
}

/// A fixed-capacity pool for records of type `T`.
///
/// All slots are constructed up front with `T::default()` and live as long
/// as the pool. Records are handed out as [`PoolHandle`]s; dropping the
/// handle is the only way a slot goes back to the free list.
///
/// # Thread Safety
///
/// `acquire` and release are serialized by the pool's free-list lock. Two
/// pools never share a lock. Scans go through per-slot locks only.
///
/// # Example
///
/// ```rust
/// use slabworks_core::SlabPool;
///
/// let pool = SlabPool::<u32>::new("counters", 2);
///
/// let first = pool.acquire().unwrap();
/// *first.lock() = 7;
/// let _second = pool.acquire().unwrap();
/// assert!(pool.acquire().is_err());
///
/// drop(first);
/// assert_eq!(pool.size(), 1);
/// ```
pub struct SlabPool<T> {
    /// Label used in errors and log events.
    name: &'static str,
    /// The backing storage. Never reallocated.
    slots: Box<[Slot<T>]>,
    /// Indices of free slots.
    free_list: Mutex<FreeList>,
    /// Number of occupied slots. Only written under `free_list`'s lock.
    occupied: AtomicUsize,
}

impl<T: Default> SlabPool<T> {
    /// Creates a new pool with `capacity` pre-constructed slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(name: &'static str, capacity: usize) -> Arc<Self> {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let slots = (0..capacity)
            .map(|_| Slot::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        tracing::debug!(pool = name, capacity, "slab pool constructed");

        Arc::new(Self {
            name,
            slots,
            free_list: Mutex::new(FreeList::new(capacity)),
            occupied: AtomicUsize::new(0),
        })
    }

    /// Acquires a slot holding a fresh `T::default()`.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] if every slot is occupied.
    #[inline]
    pub fn acquire(self: &Arc<Self>) -> PoolResult<PoolHandle<T>> {
        self.acquire_with(|_| {})
    }

    /// Acquires a slot and runs `init` on the fresh record before the slot
    /// is marked valid.
    ///
    /// `init` runs under the slot lock, so scanners observe the record only
    /// after it returns. It is not called when the pool is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] if every slot is occupied.
    pub fn acquire_with<F>(self: &Arc<Self>, init: F) -> PoolResult<PoolHandle<T>>
    where
        F: FnOnce(&mut T),
    {
        let index = {
            let mut free_list = self.free_list.lock();
            let Some(index) = free_list.pop() else {
                tracing::warn!(pool = self.name, capacity = self.capacity(), "pool exhausted");
                return Err(PoolError::Exhausted {
                    pool: self.name,
                    capacity: self.capacity(),
                });
            };
            self.occupied.fetch_add(1, Ordering::AcqRel);
            index
        };

        // Built before the record is touched so a panicking `init` still
        // returns the slot.
        let handle = PoolHandle::new(Arc::clone(self), index);

        let slot = &self.slots[index];
        let mut value = slot.lock();
        *value = T::default();
        init(&mut *value);
        slot.valid.store(true, Ordering::Release);
        drop(value);

        tracing::trace!(pool = self.name, index, "slot acquired");
        Ok(handle)
    }
}

impl<T> SlabPool<T> {
    /// Returns the label of this pool.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fixed capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    ///
    /// Advisory under concurrent use: it may be stale as soon as it returns.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.occupied.load(Ordering::Acquire)
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.size()
    }

    /// Returns whether every slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    /// Returns whether no slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns every slot of the backing array, free ones included.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    /// Iterates over every slot, free ones included.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Slot<T>> {
        self.slots.iter()
    }

    /// Runs `f` on every live record with its slot index.
    ///
    /// Each record is visited under its own slot lock. `f` must not release
    /// or otherwise lock the slot it is given.
    pub fn for_each_valid<F>(&self, mut f: F)
    where
        F: FnMut(usize, &mut T),
    {
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(mut value) = slot.lock_valid() {
                f(index, &mut *value);
            }
        }
    }

    /// Returns the slot at `index`.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> &Slot<T> {
        &self.slots[index]
    }

    /// Returns a slot to the free list. Only called by [`PoolHandle`]'s drop.
    pub(crate) fn release(&self, index: usize) {
        let slot = &self.slots[index];
        {
            let _value = slot.lock();
            slot.valid.store(false, Ordering::Release);
        }

        let mut free_list = self.free_list.lock();
        free_list.push(index);
        self.occupied.fetch_sub(1, Ordering::AcqRel);
        drop(free_list);

        tracing::trace!(pool = self.name, index, "slot released");
    }
}

impl<'a, T> IntoIterator for &'a SlabPool<T> {
    type Item = &'a Slot<T>;
    type IntoIter = std::slice::Iter<'a, Slot<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for SlabPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlabPool")
            .field("name", &self.name)
            .field("capacity", &self.capacity())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_acquire_release() {
        let pool = SlabPool::<u32>::new("test", 10);

        let h1 = pool.acquire().unwrap();
        *h1.lock() = 42;
        assert_eq!(*h1.lock(), 42);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.free_count(), 9);

        drop(h1);
        assert_eq!(pool.size(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_full() {
        let pool = SlabPool::<u8>::new("test", 2);

        let _h1 = pool.acquire().unwrap();
        let _h2 = pool.acquire().unwrap();
        assert!(pool.is_full());
        assert_eq!(
            pool.acquire().unwrap_err(),
            PoolError::Exhausted {
                pool: "test",
                capacity: 2
            }
        );
    }

    #[test]
    fn test_pool_reuse() {
        let pool = SlabPool::<u32>::new("test", 1);

        let h1 = pool.acquire().unwrap();
        let first_index = h1.index();
        *h1.lock() = 5;
        drop(h1);

        let h2 = pool.acquire().unwrap();
        assert_eq!(h2.index(), first_index); // Same slot reused
        assert_eq!(*h2.lock(), 0); // Reset on acquire
    }

    #[test]
    fn test_first_acquire_takes_index_zero() {
        let pool = SlabPool::<u32>::new("test", 4);
        let h0 = pool.acquire().unwrap();
        let h1 = pool.acquire().unwrap();
        assert_eq!(h0.index(), 0);
        assert_eq!(h1.index(), 1);

        // Most recently released index is handed out next.
        drop(h0);
        let again = pool.acquire().unwrap();
        assert_eq!(again.index(), 0);
    }

    #[test]
    fn test_slots_expose_free_cells() {
        let pool = SlabPool::<u32>::new("test", 3);
        let held = pool.acquire().unwrap();

        assert_eq!(pool.slots().len(), 3);
        let live: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_valid())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(live, vec![held.index()]);

        drop(held);
        assert!(pool.iter().all(|slot| slot.lock_valid().is_none()));
    }

    #[test]
    fn test_acquire_with_initializes_before_publish() {
        let pool = SlabPool::<u32>::new("test", 2);
        let handle = pool.acquire_with(|value| *value = 99).unwrap();

        let mut seen = Vec::new();
        pool.for_each_valid(|index, value| seen.push((index, *value)));
        assert_eq!(seen, vec![(handle.index(), 99)]);
    }

    #[test]
    fn test_init_not_called_when_exhausted() {
        let pool = SlabPool::<u32>::new("test", 1);
        let _held = pool.acquire().unwrap();

        let mut called = false;
        assert!(pool.acquire_with(|_| called = true).is_err());
        assert!(!called);
    }
}
