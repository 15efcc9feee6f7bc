//! A single fixed-capacity byte buffer.

/// A fixed-capacity byte container with a mutable fill length.
///
/// Buffers are only created by a [`BufferPool`](super::BufferPool). The
/// backing storage never grows or shrinks; `clear` just forgets the
/// contents.
pub struct Buffer {
    pool: usize,
    index: usize,
    data: Box<[u8]>,
    used: usize,
}

impl Buffer {
    pub(super) fn new(pool: usize, index: usize, capacity: usize) -> Self {
        Self {
            pool,
            index,
            data: vec![0u8; capacity].into_boxed_slice(),
            used: 0,
        }
    }

    /// Slot number of this buffer inside its pool.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the pool that allocated this buffer.
    pub(super) fn pool_id(&self) -> usize {
        self.pool
    }

    /// Fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of filled bytes.
    pub fn len(&self) -> usize {
        self.used
    }

    /// Returns `true` if no bytes are filled.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.used
    }

    /// The filled bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Resets the fill length without touching the storage.
    pub fn clear(&mut self) {
        self.used = 0;
    }

    /// Appends `bytes` at the current fill length.
    ///
    /// The caller must keep the total within capacity.
    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.remaining(), "buffer overrun");
        let end = self.used + bytes.len();
        self.data[self.used..end].copy_from_slice(bytes);
        self.used = end;
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("pool", &self.pool)
            .field("index", &self.index)
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_and_clear() {
        let mut buf = Buffer::new(0, 0, 16);
        buf.extend_from_slice(b"hello world");
        assert_eq!(buf.len(), 11);
        assert_eq!(buf.as_slice(), b"hello world");
        assert_eq!(buf.remaining(), 5);

        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.as_slice().is_empty());
        // Capacity should be preserved
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn test_fill_to_capacity() {
        let mut buf = Buffer::new(0, 3, 4);
        buf.extend_from_slice(b"ab");
        buf.extend_from_slice(b"cd");
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.as_slice(), b"abcd");
        assert_eq!(buf.index(), 3);
    }

    #[test]
    fn test_clear_does_not_reallocate() {
        let mut buf = Buffer::new(0, 0, 8);
        let before = buf.data.as_ptr();
        buf.extend_from_slice(b"12345678");
        buf.clear();
        buf.extend_from_slice(b"xy");
        assert_eq!(buf.data.as_ptr(), before);
        assert_eq!(buf.as_slice(), b"xy");
    }
}
