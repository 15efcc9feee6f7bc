//! In-memory chunk store.

use std::collections::HashMap;
use std::io;

use bytes::Bytes;
use parking_lot::Mutex;

use super::ChunkStore;
use crate::chunk::ChunkId;

/// Keeps chunks in a map keyed by file name.
///
/// Chunk bytes are held as [`Bytes`], so handing them out is cheap.
#[derive(Debug, Default)]
pub struct MemoryStore {
    chunks: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct chunk names stored.
    pub fn len(&self) -> usize {
        self.chunks.lock().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.lock().is_empty()
    }

    /// Returns the bytes under `id`, if any.
    pub fn bytes(&self, id: &ChunkId) -> Option<Bytes> {
        self.chunks.lock().get(&id.file_name()).cloned()
    }
}

impl ChunkStore for MemoryStore {
    fn put(&self, id: &ChunkId, data: &[u8]) -> io::Result<()> {
        self.chunks
            .lock()
            .insert(id.file_name(), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn get(&self, id: &ChunkId) -> io::Result<Vec<u8>> {
        self.bytes(id).map(|b| b.to_vec()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no chunk {id}"))
        })
    }
}
