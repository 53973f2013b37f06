//! Buffer Pool - bounded reuse of growable byte buffers.
//!
//! The [`BufferPool`] provides:
//! - Checkout and return of owned buffers (`acquire` / `release`)
//! - A fixed acquire policy: wait for a release, or overflow and allocate
//! - Pluggable shrink-on-release
//! - Runtime resizing of the target capacity

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::buffer::policy::{AcquirePolicy, ShrinkPolicy};
use crate::buffer::{BufferPoolStats, PoolBuffer, PooledBuffer};
use crate::common::{Error, PoolConfig, Result};

/// Everything that must change together, behind one lock.
struct PoolState<B> {
    /// Idle buffers, used as a stack (LIFO for cache locality).
    idle: Vec<B>,

    /// Buffers currently checked out by callers.
    outstanding: usize,

    /// Target number of live buffers.
    capacity: usize,
}

impl<B> PoolState<B> {
    /// True if one more live buffer fits within the capacity.
    #[inline]
    fn has_room(&self) -> bool {
        self.outstanding + self.idle.len() < self.capacity
    }
}

/// Where an acquired buffer comes from.
enum Slot<B> {
    Idle(B),
    Fresh,
    Overflow,
}

/// A bounded pool of reusable byte buffers.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                       BufferPool                         │
/// │  ┌────────────────────────────────────────────────────┐  │
/// │  │ state: Mutex<PoolState>                            │  │
/// │  │   idle: Vec<B>   outstanding: usize   capacity     │  │
/// │  └────────────────────────────────────────────────────┘  │
/// │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐    │
/// │  │  available   │  │    shrink    │  │    stats     │    │
/// │  │   Condvar    │  │ ShrinkPolicy │  │   atomics    │    │
/// │  └──────────────┘  └──────────────┘  └──────────────┘    │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `state`: `Mutex`. Idle set, outstanding count and capacity are read
///   and written together, so `outstanding + idle <= capacity` holds at
///   every point where the lock is free (blocking policy)
/// - `available`: `Condvar`. Blocking acquires wait here; each release
///   that stores a buffer wakes one waiter, a resize wakes all
/// - `stats`: No lock, all atomic counters
///
/// Buffers are allocated and dropped outside the lock.
///
/// # Usage contract
/// A buffer passed to [`release`](Self::release) must have come from
/// [`acquire`](Self::acquire) (or one of its variants) on the same pool, and
/// must be released once. Breaking this is not detected in release builds;
/// debug builds assert when more buffers are released than were acquired.
///
/// # Usage
/// ```
/// use bytepool::{BufferPool, PoolBuffer};
///
/// let pool = BufferPool::new(4, 1024);
///
/// let mut buf = pool.acquire();
/// buf.write_bytes(b"Hello World!");
/// pool.release(buf);
///
/// // Released buffers come back empty
/// let buf = pool.get();
/// assert!(buf.is_empty());
/// ```
pub struct BufferPool<B: PoolBuffer = BytesMut> {
    state: Mutex<PoolState<B>>,

    /// Signalled when a buffer is stored or the capacity changes.
    available: Condvar,

    /// Byte capacity of freshly allocated buffers.
    initial_buffer_size: usize,

    /// Fixed for the lifetime of the pool.
    policy: AcquirePolicy,

    shrink: Arc<dyn ShrinkPolicy>,

    stats: BufferPoolStats,
}

impl BufferPool<BytesMut> {
    /// Create a blocking pool of `capacity` pre-allocated `BytesMut` buffers.
    ///
    /// A `capacity` of 0 is valid: every acquire allocates, every release
    /// drops.
    ///
    /// # Panics
    /// Panics if `initial_buffer_size` is 0.
    pub fn new(capacity: usize, initial_buffer_size: usize) -> Self {
        assert!(initial_buffer_size > 0, "initial_buffer_size must be > 0");

        Self::build(PoolConfig::new(capacity, initial_buffer_size))
    }
}

impl Default for BufferPool<BytesMut> {
    fn default() -> Self {
        Self::build(PoolConfig::default())
    }
}

impl<B: PoolBuffer> BufferPool<B> {
    /// Create a pool from a configuration.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the configuration does not validate
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PoolConfig) -> Self {
        let PoolConfig {
            capacity,
            initial_buffer_size,
            policy,
            shrink,
        } = config;

        // Fill the pool upfront
        let idle: Vec<B> = (0..capacity)
            .map(|_| B::with_capacity(initial_buffer_size))
            .collect();

        debug!(
            capacity,
            initial_buffer_size,
            ?policy,
            shrink = shrink.name(),
            "buffer pool created"
        );

        Self {
            state: Mutex::new(PoolState {
                idle,
                outstanding: 0,
                capacity,
            }),
            available: Condvar::new(),
            initial_buffer_size,
            policy,
            shrink,
            stats: BufferPoolStats::new(),
        }
    }

    // ========================================================================
    // Public API: Acquire
    // ========================================================================

    /// Take a buffer out of the pool.
    ///
    /// Returns an idle buffer if there is one. Otherwise allocates if the
    /// pool is below capacity or uses [`AcquirePolicy::Overflow`]; under
    /// [`AcquirePolicy::Block`] waits for a release.
    ///
    /// The returned buffer is empty.
    pub fn acquire(&self) -> B {
        let mut state = self.state.lock();

        let slot = match self.take_slot(&mut state) {
            Some(slot) => slot,
            None => {
                BufferPoolStats::bump(&self.stats.waits);
                loop {
                    self.available.wait(&mut state);
                    if let Some(slot) = self.take_slot(&mut state) {
                        break slot;
                    }
                }
            }
        };

        drop(state);
        self.materialize(slot)
    }

    /// Take a buffer without waiting.
    ///
    /// Returns `None` where [`acquire`](Self::acquire) would block. Never
    /// returns `None` under [`AcquirePolicy::Overflow`].
    pub fn try_acquire(&self) -> Option<B> {
        let slot = self.take_slot(&mut self.state.lock())?;
        Some(self.materialize(slot))
    }

    /// Take a buffer, waiting at most `timeout`.
    ///
    /// # Errors
    /// - `Error::Timeout` if no buffer became available in time; the pool
    ///   is unchanged
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<B> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.acquire_until(deadline, timeout),
            // Too far in the future to represent: same as no deadline
            None => Ok(self.acquire()),
        }
    }

    /// Take a buffer, waiting until `deadline` at the latest.
    ///
    /// # Errors
    /// - `Error::Timeout` if no buffer became available in time; the pool
    ///   is unchanged
    pub fn acquire_deadline(&self, deadline: Instant) -> Result<B> {
        let waited = deadline.saturating_duration_since(Instant::now());
        self.acquire_until(deadline, waited)
    }

    /// Like [`acquire`](Self::acquire), returning a guard that releases the
    /// buffer when dropped.
    pub fn get(&self) -> PooledBuffer<'_, B> {
        PooledBuffer::new(self, self.acquire())
    }

    /// Like [`try_acquire`](Self::try_acquire), returning a guard.
    pub fn try_get(&self) -> Option<PooledBuffer<'_, B>> {
        self.try_acquire().map(|buf| PooledBuffer::new(self, buf))
    }

    /// Like [`acquire_timeout`](Self::acquire_timeout), returning a guard.
    ///
    /// # Errors
    /// - `Error::Timeout` if no buffer became available in time
    pub fn get_timeout(&self, timeout: Duration) -> Result<PooledBuffer<'_, B>> {
        let buf = self.acquire_timeout(timeout)?;
        Ok(PooledBuffer::new(self, buf))
    }

    // ========================================================================
    // Public API: Release and resize
    // ========================================================================

    /// Return a buffer to the pool.
    ///
    /// The buffer is emptied (or swapped for a smaller one if the shrink
    /// policy says so) and stored if the pool has room for it; otherwise it
    /// is dropped. Never blocks.
    pub fn release(&self, mut buf: B) {
        let len = buf.len();
        let capacity = buf.capacity();

        match self
            .shrink
            .shrink_to(len, capacity, self.initial_buffer_size)
        {
            Some(new_capacity) => {
                trace!(len, capacity, new_capacity, "shrinking released buffer");
                buf = B::with_capacity(new_capacity);
                BufferPoolStats::bump(&self.stats.shrinks);
            }
            None => buf.reset(),
        }

        let mut state = self.state.lock();
        debug_assert!(
            state.outstanding > 0,
            "released more buffers than were acquired"
        );
        state.outstanding = state.outstanding.saturating_sub(1);

        if state.has_room() {
            state.idle.push(buf);
            drop(state);

            self.available.notify_one();
            BufferPoolStats::bump(&self.stats.returns);
        } else {
            drop(state);

            trace!(buffer_capacity = capacity, "pool full, dropping released buffer");
            BufferPoolStats::bump(&self.stats.drops);
            drop(buf);
        }
    }

    /// Change the target number of buffers.
    ///
    /// Growing makes room for buffers that are allocated lazily by later
    /// acquires. Shrinking drops idle buffers that no longer fit right away;
    /// buffers that are checked out stay valid and are dropped when they
    /// are released into a full pool.
    pub fn resize(&self, new_capacity: usize) {
        let mut state = self.state.lock();
        let old_capacity = state.capacity;
        state.capacity = new_capacity;

        let room = new_capacity.saturating_sub(state.outstanding);
        let shed = if state.idle.len() > room {
            state.idle.split_off(room)
        } else {
            Vec::new()
        };
        let outstanding = state.outstanding;
        drop(state);

        // Waiters re-check: growth gives them room, capacity 0 lets them allocate
        self.available.notify_all();

        debug!(
            old_capacity,
            new_capacity,
            outstanding,
            shed = shed.len(),
            "buffer pool resized"
        );
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Number of idle buffers.
    pub fn len(&self) -> usize {
        self.state.lock().idle.len()
    }

    /// True if no buffer is idle.
    pub fn is_empty(&self) -> bool {
        self.state.lock().idle.is_empty()
    }

    /// Configured target number of buffers.
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Number of buffers currently checked out.
    pub fn outstanding(&self) -> usize {
        self.state.lock().outstanding
    }

    /// Byte capacity of freshly allocated buffers.
    pub fn initial_buffer_size(&self) -> usize {
        self.initial_buffer_size
    }

    /// The acquire policy chosen at construction.
    pub fn policy(&self) -> AcquirePolicy {
        self.policy
    }

    /// Get buffer pool statistics.
    pub fn stats(&self) -> &BufferPoolStats {
        &self.stats
    }

    // ========================================================================
    // Internal: Called by PooledBuffer
    // ========================================================================

    /// Give up the slot of a buffer that is not coming back.
    pub(crate) fn forget_outstanding(&self) {
        let mut state = self.state.lock();
        debug_assert!(
            state.outstanding > 0,
            "released more buffers than were acquired"
        );
        state.outstanding = state.outstanding.saturating_sub(1);
        let room = state.has_room();
        drop(state);

        // A blocked acquire can now allocate in the freed slot
        if room {
            self.available.notify_one();
        }
    }

    // ========================================================================
    // Internal: Slot accounting
    // ========================================================================

    /// Claim a slot for one buffer, or `None` if the caller has to wait.
    ///
    /// Must be called with the state lock held; the outstanding count is
    /// updated before the lock is released.
    fn take_slot(&self, state: &mut PoolState<B>) -> Option<Slot<B>> {
        let slot = if let Some(buf) = state.idle.pop() {
            Slot::Idle(buf)
        } else if state.has_room() {
            Slot::Fresh
        } else if state.capacity == 0 || self.policy == AcquirePolicy::Overflow {
            Slot::Overflow
        } else {
            return None;
        };

        state.outstanding += 1;
        Some(slot)
    }

    /// Turn a claimed slot into a buffer. Called without the lock.
    fn materialize(&self, slot: Slot<B>) -> B {
        match slot {
            Slot::Idle(buf) => {
                BufferPoolStats::bump(&self.stats.hits);
                buf
            }
            Slot::Fresh => {
                BufferPoolStats::bump(&self.stats.misses);
                B::with_capacity(self.initial_buffer_size)
            }
            Slot::Overflow => {
                BufferPoolStats::bump(&self.stats.overflows);
                B::with_capacity(self.initial_buffer_size)
            }
        }
    }

    /// Blocking acquire with a deadline. `waited` is reported on timeout.
    fn acquire_until(&self, deadline: Instant, waited: Duration) -> Result<B> {
        let mut state = self.state.lock();

        let slot = match self.take_slot(&mut state) {
            Some(slot) => slot,
            None => {
                BufferPoolStats::bump(&self.stats.waits);
                loop {
                    let timed_out = self.available.wait_until(&mut state, deadline).timed_out();

                    // A buffer stored while the deadline expired is still ours
                    if let Some(slot) = self.take_slot(&mut state) {
                        break slot;
                    }
                    if timed_out {
                        drop(state);
                        BufferPoolStats::bump(&self.stats.timeouts);
                        debug!(?waited, "timed out waiting for a pooled buffer");
                        return Err(Error::Timeout { waited });
                    }
                }
            }
        };

        drop(state);
        Ok(self.materialize(slot))
    }
}

impl<B: PoolBuffer> fmt::Debug for BufferPool<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BufferPool")
            .field("capacity", &state.capacity)
            .field("idle", &state.idle.len())
            .field("outstanding", &state.outstanding)
            .field("initial_buffer_size", &self.initial_buffer_size)
            .field("policy", &self.policy)
            .field("shrink", &self.shrink.name())
            .finish()
    }
}
