//! Shrink-on-release policies.
//!
//! A long-lived pool tends to accumulate a few buffers that once grew to
//! hold an unusually large payload. A [`ShrinkPolicy`] lets `release` swap
//! such a buffer for a freshly allocated, smaller one.

use crate::common::config::SHRINK_FACTOR;

/// Decides, at release time, whether a buffer should be replaced.
///
/// Called with the buffer's length just before it was reset, its current
/// capacity, and the pool's initial buffer size. Returning `Some(n)` makes
/// the pool drop the buffer and store a new one with capacity `n` instead.
pub trait ShrinkPolicy: Send + Sync {
    /// Capacity of the replacement buffer, or `None` to keep the buffer.
    fn shrink_to(&self, len_at_release: usize, capacity: usize, initial_size: usize)
        -> Option<usize>;

    /// Short name for logs and debug output.
    fn name(&self) -> &'static str;
}

/// Never replaces a buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepCapacity;

impl ShrinkPolicy for KeepCapacity {
    #[inline]
    fn shrink_to(&self, _len: usize, _capacity: usize, _initial_size: usize) -> Option<usize> {
        None
    }

    fn name(&self) -> &'static str {
        "keep-capacity"
    }
}

/// Replaces buffers whose capacity is at least `factor` times their length
/// at release.
///
/// The replacement is sized to the length at release, but never below the
/// pool's initial buffer size, and buffers that are not larger than the
/// initial size are always kept.
///
/// # Example
/// ```
/// use bytepool::{ShrinkOversized, ShrinkPolicy};
///
/// let policy = ShrinkOversized::new();
///
/// // 64KB buffer that only held 100 bytes: back to the initial 4KB.
/// assert_eq!(policy.shrink_to(100, 65536, 4096), Some(4096));
///
/// // 64KB buffer that held 40KB: worth keeping.
/// assert_eq!(policy.shrink_to(40_000, 65536, 4096), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ShrinkOversized {
    factor: usize,
}

impl ShrinkOversized {
    /// Shrink at the default ratio of 2.
    pub fn new() -> Self {
        Self {
            factor: SHRINK_FACTOR,
        }
    }

    /// Shrink when capacity is at least `factor` times the length.
    ///
    /// # Panics
    /// Panics if `factor` is less than 2.
    pub fn with_factor(factor: usize) -> Self {
        assert!(factor >= 2, "shrink factor must be >= 2");
        Self { factor }
    }

    /// The configured ratio.
    pub fn factor(&self) -> usize {
        self.factor
    }
}

impl Default for ShrinkOversized {
    fn default() -> Self {
        Self::new()
    }
}

impl ShrinkPolicy for ShrinkOversized {
    fn shrink_to(&self, len: usize, capacity: usize, initial_size: usize) -> Option<usize> {
        if capacity <= initial_size {
            return None;
        }
        match len.checked_mul(self.factor) {
            Some(threshold) if capacity >= threshold => Some(len.max(initial_size)),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "shrink-oversized"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_capacity_never_shrinks() {
        let policy = KeepCapacity;
        assert_eq!(policy.shrink_to(0, 1 << 20, 1024), None);
        assert_eq!(policy.shrink_to(10, 20, 1024), None);
    }

    #[test]
    fn test_shrink_oversized_basic() {
        let policy = ShrinkOversized::new();

        // Exactly twice the length qualifies
        assert_eq!(policy.shrink_to(5000, 10_000, 1024), Some(5000));

        // Just under twice does not
        assert_eq!(policy.shrink_to(5001, 10_000, 1024), None);
    }

    #[test]
    fn test_shrink_oversized_respects_initial_size() {
        let policy = ShrinkOversized::new();

        // Never shrinks a buffer that is at or below the initial size
        assert_eq!(policy.shrink_to(0, 1024, 1024), None);
        assert_eq!(policy.shrink_to(0, 512, 1024), None);

        // Replacement is never smaller than the initial size
        assert_eq!(policy.shrink_to(10, 8192, 1024), Some(1024));
        assert_eq!(policy.shrink_to(0, 8192, 1024), Some(1024));
    }

    #[test]
    fn test_shrink_oversized_custom_factor() {
        let policy = ShrinkOversized::with_factor(4);
        assert_eq!(policy.factor(), 4);

        assert_eq!(policy.shrink_to(3000, 10_000, 1024), None);
        assert_eq!(policy.shrink_to(2500, 10_000, 1024), Some(2500));
    }

    #[test]
    #[should_panic(expected = "shrink factor must be >= 2")]
    fn test_shrink_factor_too_small() {
        ShrinkOversized::with_factor(1);
    }

    #[test]
    fn test_len_overflow_does_not_panic() {
        let policy = ShrinkOversized::new();
        assert_eq!(policy.shrink_to(usize::MAX, usize::MAX, 1), None);
    }
}
