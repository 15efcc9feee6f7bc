//! The ChunkRecord type - what a finalization leaves behind.

use std::fmt;
use std::ops::Range;

use super::ChunkId;

/// Metadata of one finalized chunk.
///
/// The bytes themselves live in the [`ChunkStore`](crate::ChunkStore) under
/// [`ChunkRecord::id`]; the buffer that held them has already gone back to
/// the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Output identifier derived from the digest.
    pub id: ChunkId,

    /// Offset of the first byte in the original stream.
    pub offset: u64,

    /// Chunk length in bytes.
    pub len: usize,

    /// Whether the write to the store succeeded.
    pub persisted: bool,
}

impl ChunkRecord {
    /// Returns the chunk length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for records produced by a splitter.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }

    /// Returns the chunk as a range of the original stream.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }
}

impl fmt::Display for ChunkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes @ {}, {}", self.len, self.offset, self.id)?;
        if !self.persisted {
            write!(f, ", not persisted")?;
        }
        write!(f, ")")
    }
}
