//! The buffer contract the pool relies on.
//!
//! The pool never looks inside a buffer. It only needs to create one with a
//! given capacity, ask for its length and capacity, and empty it before it
//! is handed out again.

use bytes::BytesMut;

/// A growable byte container that can live in a [`BufferPool`](crate::BufferPool).
///
/// `reset` must make the buffer logically empty (`len() == 0`) while keeping
/// its allocation, so that reuse avoids a new allocation.
///
/// # Example
/// ```
/// use bytepool::PoolBuffer;
/// use bytes::BytesMut;
///
/// let mut buf = <BytesMut as PoolBuffer>::with_capacity(64);
/// buf.write_bytes(b"hello");
/// assert_eq!(PoolBuffer::len(&buf), 5);
///
/// buf.reset();
/// assert_eq!(PoolBuffer::len(&buf), 0);
/// assert!(PoolBuffer::capacity(&buf) >= 64);
/// ```
pub trait PoolBuffer: Send + 'static {
    /// Allocate an empty buffer able to hold at least `capacity` bytes.
    fn with_capacity(capacity: usize) -> Self;

    /// Number of bytes currently written.
    fn len(&self) -> usize;

    /// Number of bytes the buffer can hold without reallocating.
    fn capacity(&self) -> usize;

    /// Drop the contents, keep the allocation.
    fn reset(&mut self);

    /// Append bytes, growing the allocation if needed.
    fn write_bytes(&mut self, data: &[u8]);

    /// True if nothing has been written.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PoolBuffer for BytesMut {
    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        BytesMut::with_capacity(capacity)
    }

    #[inline]
    fn len(&self) -> usize {
        BytesMut::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        BytesMut::capacity(self)
    }

    #[inline]
    fn reset(&mut self) {
        self.clear();
    }

    #[inline]
    fn write_bytes(&mut self, data: &[u8]) {
        self.extend_from_slice(data);
    }
}

impl PoolBuffer for Vec<u8> {
    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    #[inline]
    fn reset(&mut self) {
        self.clear();
    }

    #[inline]
    fn write_bytes(&mut self, data: &[u8]) {
        self.extend_from_slice(data);
    }
}
