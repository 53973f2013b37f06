//! Buffer Pool Tests
//!
//! End-to-end checks of the acquire/release/resize contract through the
//! public API.

use bytepool::{AcquirePolicy, BufferPool, PoolBuffer, PoolConfig};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const POOL_SIZE: usize = 5;
const BUFFER_CAP: usize = 1024;

// ============================================================================
// Blocking policy
// ============================================================================

/// Five buffers go out at once, the sixth caller waits for a release.
#[test]
fn test_sixth_acquire_waits_for_release() {
    let pool = Arc::new(BufferPool::new(POOL_SIZE, BUFFER_CAP));

    let mut held: Vec<_> = (0..POOL_SIZE).map(|_| pool.acquire()).collect();
    for buf in &held {
        assert!(buf.capacity() >= BUFFER_CAP);
    }
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.outstanding(), POOL_SIZE);

    let (tx, rx) = mpsc::channel();
    let waiter = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let buf = pool.acquire();
            tx.send(()).unwrap();
            buf
        })
    };

    // Still blocked while all five are out
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    pool.release(held.pop().unwrap());
    rx.recv_timeout(Duration::from_secs(10))
        .expect("releasing a buffer should unblock the waiter");

    held.push(waiter.join().unwrap());
    for buf in held {
        pool.release(buf);
    }

    assert_eq!(pool.len(), POOL_SIZE);
    assert_eq!(pool.outstanding(), 0);
}

/// With nothing released, never more than `capacity` buffers are out.
#[test]
fn test_capacity_bound_without_release() {
    let pool = Arc::new(BufferPool::new(POOL_SIZE, BUFFER_CAP));

    let handles: Vec<_> = (0..POOL_SIZE * 3)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.acquire_timeout(Duration::from_millis(200)).ok())
        })
        .collect();

    let got: Vec<_> = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(got.len(), POOL_SIZE);
    assert_eq!(pool.outstanding(), POOL_SIZE);
    assert_eq!(pool.stats().snapshot().timeouts, (POOL_SIZE * 2) as u64);

    for buf in got {
        pool.release(buf);
    }
    assert_eq!(pool.len(), POOL_SIZE);
}

/// Write, release, acquire: the buffer comes back empty.
#[test]
fn test_reset_guarantee() {
    let pool = BufferPool::new(1, BUFFER_CAP);

    let mut buf = pool.acquire();
    buf.write_bytes(b"Hello World!");
    assert_eq!(buf.len(), 12);
    pool.release(buf);

    let buf = pool.acquire();
    assert_eq!(buf.len(), 0);
    pool.release(buf);
}

/// A timed-out acquire leaves the pool as it found it.
#[test]
fn test_timeout_leaves_state_unchanged() {
    let pool = BufferPool::new(2, BUFFER_CAP);
    let a = pool.acquire();
    let b = pool.acquire();

    let before = (pool.len(), pool.outstanding(), pool.capacity());
    assert!(pool.acquire_timeout(Duration::from_millis(10)).is_err());
    assert_eq!((pool.len(), pool.outstanding(), pool.capacity()), before);

    pool.release(a);
    pool.release(b);
    assert_eq!(pool.len(), 2);
}

// ============================================================================
// Overflow policy
// ============================================================================

/// Overflow buffers are handed out immediately and can be reused afterwards.
#[test]
fn test_overflow_buffers_are_reusable() {
    let config = PoolConfig::new(2, BUFFER_CAP).policy(AcquirePolicy::Overflow);
    let pool: BufferPool = BufferPool::with_config(config).unwrap();

    let bufs: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
    assert_eq!(pool.outstanding(), 4);

    // The first two releases find the pool full and are dropped; the
    // overflow buffers released last are kept
    for mut buf in bufs {
        buf.write_bytes(b"payload");
        pool.release(buf);
    }
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.stats().snapshot().drops, 2);

    let again = pool.acquire();
    assert!(again.is_empty());
    assert!(again.capacity() >= BUFFER_CAP);
    pool.release(again);
}

// ============================================================================
// Resize
// ============================================================================

/// Growing changes capacity without allocating up front.
#[test]
fn test_resize_grow() {
    let pool = BufferPool::new(POOL_SIZE, BUFFER_CAP);
    pool.resize(10);

    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.len(), POOL_SIZE);

    let bufs: Vec<_> = (0..10).map(|_| pool.try_acquire().unwrap()).collect();
    assert!(pool.try_acquire().is_none());
    for buf in bufs {
        pool.release(buf);
    }
    assert_eq!(pool.len(), 10);
}

/// Shrinking never touches buffers that are checked out.
#[test]
fn test_resize_shrink_keeps_outstanding_valid() {
    let pool = BufferPool::new(POOL_SIZE, BUFFER_CAP);

    let mut held: Vec<_> = (0..3).map(|_| pool.acquire()).collect();
    for buf in held.iter_mut() {
        buf.write_bytes(b"in flight");
    }

    pool.resize(1);
    assert_eq!(pool.capacity(), 1);
    assert_eq!(pool.len(), 0);

    for buf in &held {
        assert_eq!(&buf[..], b"in flight");
    }

    for buf in held {
        pool.release(buf);
    }
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.outstanding(), 0);
}

/// Shrinking to zero releases waiters into fresh allocations.
#[test]
fn test_resize_to_zero_unblocks_waiters() {
    let pool = Arc::new(BufferPool::new(1, BUFFER_CAP));
    let held = pool.acquire();

    let waiter = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || pool.acquire_timeout(Duration::from_secs(10)))
    };

    thread::sleep(Duration::from_millis(20));
    pool.resize(0);

    let buf = waiter.join().unwrap().unwrap();
    pool.release(buf);
    pool.release(held);

    assert_eq!(pool.len(), 0);
    assert_eq!(pool.outstanding(), 0);
}
