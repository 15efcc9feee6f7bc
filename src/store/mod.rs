//! Output locations for finalized chunks.
//!
//! - [`ChunkStore`] - Where the finalizer writes chunk bytes
//! - [`DirStore`] - One file per chunk in a directory
//! - [`MemoryStore`] - In-process map, for tests and embedding

mod dir;
mod memory;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::chunk::ChunkId;

pub use dir::DirStore;
pub use memory::MemoryStore;

/// A destination for chunk bytes.
///
/// Methods take `&self` so one store can be shared by every splitter in a
/// run.
pub trait ChunkStore {
    /// Writes `data` under `id` as a single, all-or-nothing operation.
    fn put(&self, id: &ChunkId, data: &[u8]) -> io::Result<()>;

    /// Reads back the bytes stored under `id`.
    fn get(&self, id: &ChunkId) -> io::Result<Vec<u8>>;

    /// Human-readable location of `id`, used in logs and errors.
    fn locate(&self, id: &ChunkId) -> PathBuf {
        PathBuf::from(id.file_name())
    }
}

impl<S: ChunkStore + ?Sized> ChunkStore for &S {
    fn put(&self, id: &ChunkId, data: &[u8]) -> io::Result<()> {
        (**self).put(id, data)
    }

    fn get(&self, id: &ChunkId) -> io::Result<Vec<u8>> {
        (**self).get(id)
    }

    fn locate(&self, id: &ChunkId) -> PathBuf {
        (**self).locate(id)
    }
}

impl<S: ChunkStore + ?Sized> ChunkStore for Arc<S> {
    fn put(&self, id: &ChunkId, data: &[u8]) -> io::Result<()> {
        (**self).put(id, data)
    }

    fn get(&self, id: &ChunkId) -> io::Result<Vec<u8>> {
        (**self).get(id)
    }

    fn locate(&self, id: &ChunkId) -> PathBuf {
        (**self).locate(id)
    }
}
