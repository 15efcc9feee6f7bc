//! Chunk types.
//!
//! - [`ChunkDigest`] - Content digest (SHA-512 or BLAKE3)
//! - [`ChunkId`] - Output identifier `<digest>_<stamp>.<ext>`
//! - [`ChunkRecord`] - Identifier, stream offset, length, persist status

mod data;
mod hash;
mod id;

pub use data::ChunkRecord;
pub use hash::ChunkDigest;
pub use id::ChunkId;
