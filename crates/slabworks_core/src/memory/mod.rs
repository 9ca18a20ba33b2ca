//! # Memory Management
//!
//! Pre-allocated pools and the handles that own their slots.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once, when a pool is constructed. Afterwards:
//! - No heap allocations on acquire or release
//! - No garbage collection, only handle-driven reclamation
//! - Slot addresses never move

mod handle;
mod pool;

pub use handle::PoolHandle;
pub use pool::{SlabPool, Slot};
