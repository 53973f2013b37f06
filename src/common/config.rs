//! Configuration for bytepool.
//!
//! Holds the default sizing constants and [`PoolConfig`], the validated
//! set of parameters a [`BufferPool`](crate::BufferPool) is built from.

use std::fmt;
use std::sync::Arc;

use crate::buffer::policy::{AcquirePolicy, KeepCapacity, ShrinkPolicy};
use crate::common::{Error, Result};

/// Default number of buffers a pool holds.
pub const DEFAULT_POOL_SIZE: usize = 64;

/// Default byte capacity of a freshly allocated buffer (8KB).
///
/// Large enough for a typical request line plus headers, small enough that
/// a full default pool stays at half a megabyte.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Ratio of capacity to length at which a released buffer counts as oversized.
pub const SHRINK_FACTOR: usize = 2;

/// Construction parameters for a buffer pool.
///
/// # Example
/// ```
/// use bytepool::{AcquirePolicy, PoolConfig, ShrinkOversized};
///
/// let config = PoolConfig::new(16, 4096)
///     .policy(AcquirePolicy::Overflow)
///     .shrink_policy(ShrinkOversized::new());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct PoolConfig {
    /// Number of buffers the pool aims to hold.
    pub capacity: usize,

    /// Byte capacity of each freshly allocated buffer.
    pub initial_buffer_size: usize,

    /// What `acquire` does when no buffer is idle.
    pub policy: AcquirePolicy,

    /// Decides whether a released buffer is swapped for a smaller one.
    pub shrink: Arc<dyn ShrinkPolicy>,
}

impl PoolConfig {
    /// Start a configuration with the given sizes, blocking acquisition and
    /// no shrinking.
    pub fn new(capacity: usize, initial_buffer_size: usize) -> Self {
        Self {
            capacity,
            initial_buffer_size,
            policy: AcquirePolicy::default(),
            shrink: Arc::new(KeepCapacity),
        }
    }

    /// Set the acquire policy.
    pub fn policy(mut self, policy: AcquirePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the shrink-on-release policy.
    pub fn shrink_policy<P: ShrinkPolicy + 'static>(mut self, shrink: P) -> Self {
        self.shrink = Arc::new(shrink);
        self
    }

    /// Check the parameters.
    ///
    /// A capacity of 0 is accepted: such a pool hands out fresh buffers and
    /// never keeps released ones.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if `initial_buffer_size` is 0
    pub fn validate(&self) -> Result<()> {
        if self.initial_buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "initial_buffer_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_BUFFER_SIZE)
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("capacity", &self.capacity)
            .field("initial_buffer_size", &self.initial_buffer_size)
            .field("policy", &self.policy)
            .field("shrink", &self.shrink.name())
            .finish()
    }
}
