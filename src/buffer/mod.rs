//! Buffer pool management.
//!
//! The buffer pool keeps a bounded set of growable byte buffers that
//! request-handling code borrows and returns instead of allocating.
//!
//! # Components
//! - [`BufferPool`] - The pool itself
//! - [`PooledBuffer`] - RAII guard that releases a buffer on drop
//! - [`PoolBuffer`] - The buffer types a pool can hold
//! - [`BufferPoolStats`] - Performance statistics
//! - [`policy`] - Acquire and shrink-on-release policies

mod buffer_pool;
pub mod policy;
mod pooled;
mod reusable;
mod stats;

pub use buffer_pool::BufferPool;
pub use pooled::PooledBuffer;
pub use reusable::PoolBuffer;
pub use stats::{BufferPoolStats, StatsSnapshot};
