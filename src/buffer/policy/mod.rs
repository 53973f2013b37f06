//! Pool policies.
//!
//! - [`AcquirePolicy`] - What `acquire` does when no buffer is idle
//! - [`ShrinkPolicy`] - Whether a released buffer is swapped for a smaller one
//!   - [`KeepCapacity`] - Never shrink (default)
//!   - [`ShrinkOversized`] - Replace buffers much larger than their contents

mod shrink;

pub use shrink::{KeepCapacity, ShrinkOversized, ShrinkPolicy};

/// Behaviour of `acquire` when the pool has no idle buffer and no room to
/// allocate one within its capacity.
///
/// The policy is fixed when the pool is built and applies to every call on
/// that pool. `release` follows the same choice: under either policy a
/// buffer that does not fit back into the pool is dropped, and under
/// [`AcquirePolicy::Block`] that can only happen after a shrinking resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquirePolicy {
    /// Wait until another caller releases a buffer.
    ///
    /// The number of live buffers never exceeds the pool capacity.
    #[default]
    Block,

    /// Allocate a fresh buffer right away.
    ///
    /// The number of live buffers may overshoot the capacity; the extra
    /// buffers are dropped on release once the pool is full again.
    Overflow,
}

impl AcquirePolicy {
    /// True for [`AcquirePolicy::Block`].
    #[inline]
    pub fn is_blocking(self) -> bool {
        self == AcquirePolicy::Block
    }
}
