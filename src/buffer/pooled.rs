//! RAII guard for pooled buffers.
//!
//! [`PooledBuffer`] owns a buffer checked out of a [`BufferPool`] and gives
//! it back when dropped, so the release cannot be forgotten or repeated.

use std::fmt;
use std::ops::{Deref, DerefMut};

use super::buffer_pool::BufferPool;
use super::reusable::PoolBuffer;

/// Guard for a buffer borrowed from a pool.
///
/// Derefs to the buffer. The buffer is released to the pool when the guard
/// is dropped.
///
/// # Example
/// ```
/// use bytepool::{BufferPool, PoolBuffer};
///
/// let pool = BufferPool::new(2, 256);
/// {
///     let mut buf = pool.get();
///     buf.write_bytes(b"GET / HTTP/1.1\r\n");
///     assert_eq!(pool.outstanding(), 1);
///     // guard drops here, buffer released
/// }
/// assert_eq!(pool.outstanding(), 0);
/// assert_eq!(pool.len(), 2);
/// ```
pub struct PooledBuffer<'a, B: PoolBuffer> {
    /// Reference back to the pool for release on drop.
    pool: &'a BufferPool<B>,
    /// `None` only after `detach`.
    buf: Option<B>,
}

impl<'a, B: PoolBuffer> PooledBuffer<'a, B> {
    /// Wrap a buffer just acquired from `pool`.
    ///
    /// Called by `BufferPool::get()` and friends.
    pub(crate) fn new(pool: &'a BufferPool<B>, buf: B) -> Self {
        Self {
            pool,
            buf: Some(buf),
        }
    }

    /// Take the buffer out, keeping it for good.
    ///
    /// The pool stops counting it as checked out, so a blocked acquire may
    /// allocate a replacement.
    pub fn detach(mut self) -> B {
        let buf = self.take();
        self.pool.forget_outstanding();
        buf
    }

    /// Release the buffer now. Same as dropping the guard.
    pub fn release(self) {
        drop(self);
    }

    /// The pool this buffer belongs to.
    pub fn pool(&self) -> &'a BufferPool<B> {
        self.pool
    }

    fn take(&mut self) -> B {
        match self.buf.take() {
            Some(buf) => buf,
            None => unreachable!("pooled buffer used after detach"),
        }
    }
}

impl<B: PoolBuffer> Deref for PooledBuffer<'_, B> {
    type Target = B;

    #[inline]
    fn deref(&self) -> &B {
        match &self.buf {
            Some(buf) => buf,
            None => unreachable!("pooled buffer used after detach"),
        }
    }
}

impl<B: PoolBuffer> DerefMut for PooledBuffer<'_, B> {
    #[inline]
    fn deref_mut(&mut self) -> &mut B {
        match &mut self.buf {
            Some(buf) => buf,
            None => unreachable!("pooled buffer used after detach"),
        }
    }
}

impl<B: PoolBuffer + fmt::Debug> fmt::Debug for PooledBuffer<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledBuffer").field(&self.buf).finish()
    }
}

impl<B: PoolBuffer> Drop for PooledBuffer<'_, B> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
