//! # Pool Handle
//!
//! Exclusive ownership of one occupied slot.

use std::fmt;
use std::sync::Arc;

use parking_lot::MutexGuard;

use super::pool::SlabPool;

/// Owning handle to a record in a [`SlabPool`].
///
/// There is exactly one handle per occupied slot. It is neither `Clone` nor
/// `Copy`; moving it transfers ownership. The slot is returned to its pool
/// when the handle is dropped or passed to [`PoolHandle::release`], and
/// because both consume the handle the release happens exactly once.
///
/// The handle keeps its pool alive, so a slot can never outlive its storage.
///
/// # Example
///
/// ```rust
/// use slabworks_core::SlabPool;
///
/// let pool = SlabPool::<u64>::new("ticks", 4);
/// let handle = pool.acquire().unwrap();
/// *handle.lock() += 1;
///
/// handle.release();
/// assert_eq!(pool.size(), 0);
/// ```
pub struct PoolHandle<T> {
    pool: Arc<SlabPool<T>>,
    index: usize,
}

impl<T> PoolHandle<T> {
    #[inline]
    pub(crate) fn new(pool: Arc<SlabPool<T>>, index: usize) -> Self {
        Self { pool, index }
    }

    /// Returns the index of the owned slot in the pool's backing array.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the pool this handle draws from.
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &Arc<SlabPool<T>> {
        &self.pool
    }

    /// Locks the owned record for in-place reads and writes.
    ///
    /// Blocks only while a batch scan is visiting the same slot.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.pool.slot(self.index).lock()
    }

    /// Returns the slot to its pool.
    ///
    /// Equivalent to dropping the handle.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Drop for PoolHandle<T> {
    fn drop(&mut self) {
        self.pool.release(self.index);
    }
}

impl<T> fmt::Debug for PoolHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHandle")
            .field("pool", &self.pool.name())
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_releases_slot() {
        let pool = SlabPool::<u32>::new("test", 2);
        {
            let _handle = pool.acquire().unwrap();
            assert_eq!(pool.size(), 1);
        }
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn test_move_keeps_single_owner() {
        let pool = SlabPool::<u32>::new("test", 2);
        let handle = pool.acquire().unwrap();
        let index = handle.index();

        let moved = handle;
        assert_eq!(moved.index(), index);
        assert_eq!(pool.size(), 1);

        let mut holder = vec![moved];
        assert_eq!(pool.size(), 1);

        holder.clear();
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn test_explicit_release() {
        let pool = SlabPool::<u32>::new("test", 1);
        let handle = pool.acquire().unwrap();
        assert!(pool.slots()[handle.index()].is_valid());

        let index = handle.index();
        handle.release();
        assert_eq!(pool.size(), 0);
        assert!(!pool.slots()[index].is_valid());
    }

    #[test]
    fn test_handle_keeps_pool_alive() {
        let pool = SlabPool::<u32>::new("test", 1);
        let handle = pool.acquire().unwrap();
        drop(pool);

        *handle.lock() = 3;
        assert_eq!(handle.pool().size(), 1);
        assert_eq!(handle.pool().name(), "test");
    }
}
