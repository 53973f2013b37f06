//! bytepool - A bounded pool of reusable byte buffers.
//!
//! Request-processing code that needs a scratch buffer per request can
//! borrow one from a [`BufferPool`] and hand it back afterwards, instead of
//! allocating and freeing on every request.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            bytepool                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │          Callers (many threads, short-lived tasks)       │   │
//! │  │     acquire / get  ─────────────▶  release / drop guard  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                BufferPool (buffer/)                      │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │   AcquirePolicy: Block | Overflow               │   │   │
//! │  │   │   ShrinkPolicy:  KeepCapacity | ShrinkOversized │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  │    idle stack + outstanding count + capacity (1 lock)    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │         PoolBuffer: BytesMut | Vec<u8> | your type       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (Error, config)
//! - [`buffer`] - The pool, its guard, stats and policies
//!
//! # Quick Start
//! ```
//! use bytepool::{BufferPool, PoolBuffer};
//!
//! let pool = BufferPool::new(5, 1024);
//!
//! let mut buf = pool.get();
//! buf.write_bytes(b"Hello World!");
//! assert_eq!(buf.len(), 12);
//! // guard drops: buffer reset and returned
//! ```

pub mod buffer;
pub mod common;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_BUFFER_SIZE, DEFAULT_POOL_SIZE};
pub use common::{Error, PoolConfig, Result};

pub use buffer::policy::{AcquirePolicy, KeepCapacity, ShrinkOversized, ShrinkPolicy};
pub use buffer::{BufferPool, BufferPoolStats, PoolBuffer, PooledBuffer, StatsSnapshot};
