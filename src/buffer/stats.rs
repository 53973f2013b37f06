//! Buffer pool statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by the buffer pool.
///
/// All fields are atomic for lock-free, thread-safe updates. Counters are
/// bumped after the pool lock is released, so a snapshot taken while other
/// threads are working can be slightly behind the pool's real state.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations because:
/// - We only need atomicity (no partial updates)
/// - We don't need synchronization between different counters
/// - Statistics are "eventually consistent" - exact ordering doesn't matter
///
/// # Example
/// ```
/// use bytepool::BufferPoolStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = BufferPoolStats::new();
/// stats.hits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.hits.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct BufferPoolStats {
    /// Acquires served by an idle buffer.
    pub hits: AtomicU64,

    /// Acquires served by a fresh allocation within capacity.
    pub misses: AtomicU64,

    /// Acquires served by a fresh allocation beyond capacity.
    pub overflows: AtomicU64,

    /// Buffers released back into the idle set.
    pub returns: AtomicU64,

    /// Buffers released but dropped because the pool was full.
    pub drops: AtomicU64,

    /// Released buffers replaced by a smaller allocation.
    pub shrinks: AtomicU64,

    /// Acquires that had to wait for a release.
    pub waits: AtomicU64,

    /// Waiting acquires that gave up at their deadline.
    pub timeouts: AtomicU64,
}

impl BufferPoolStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            overflows: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
            shrinks: AtomicU64::new(0),
            waits: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Fraction of acquires served without allocating (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        self.snapshot().hit_rate()
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            overflows: self.overflows.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
            shrinks: self.shrinks.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.overflows.store(0, Ordering::Relaxed);
        self.returns.store(0, Ordering::Relaxed);
        self.drops.store(0, Ordering::Relaxed);
        self.shrinks.store(0, Ordering::Relaxed);
        self.waits.store(0, Ordering::Relaxed);
        self.timeouts.store(0, Ordering::Relaxed);
    }
}

impl Default for BufferPoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of buffer pool statistics.
///
/// Unlike `BufferPoolStats`, this is not atomic and can be safely
/// printed, compared, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub overflows: u64,
    pub returns: u64,
    pub drops: u64,
    pub shrinks: u64,
    pub waits: u64,
    pub timeouts: u64,
}

impl StatsSnapshot {
    /// Total buffers handed out.
    pub fn acquires(&self) -> u64 {
        self.hits + self.misses + self.overflows
    }

    /// Total buffers handed back, kept or not.
    pub fn releases(&self) -> u64 {
        self.returns + self.drops
    }

    /// Fraction of acquires served without allocating (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.acquires();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ hits: {}, misses: {}, overflows: {}, drops: {}, waits: {}, hit_rate: {:.2}% }}",
            self.hits,
            self.misses,
            self.overflows,
            self.drops,
            self.waits,
            self.hit_rate() * 100.0
        )
    }
}
