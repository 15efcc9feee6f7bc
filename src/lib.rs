//! chunkstream
//!
//! Memory-bounded, content-addressed stream splitting for Rust.
//!
//! `chunkstream` cuts an arbitrary-length byte stream into fixed-size chunks
//! and writes each one to storage the moment it fills, named after a digest
//! of its contents. Typical uses:
//!
//! - feeding large extracted documents to downstream indexers
//! - content-addressed archival of text dumps
//! - bounded-memory ingestion of streams of unknown length
//!
//! The crate intentionally:
//! - allocates all buffer memory up front, in a fixed [`BufferPool`]
//! - places boundaries by byte count only, never by content
//! - does NOT deduplicate, compress or resume
//! - does NOT process streams concurrently (the pool can be shared, though)
//!
//! It does one thing: **push bytes → persisted chunks out**
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use chunkstream::{ingest, BufferPool, ChunkSplitter, DirStore, PoolConfig, SplitterConfig};
//!
//! fn main() -> Result<(), chunkstream::ChunkError> {
//!     let pool = BufferPool::new(PoolConfig::default())?;
//!     let store = DirStore::create("/tmp/chunked/out")?;
//!
//!     let mut splitter = ChunkSplitter::new(&pool, &store, SplitterConfig::default())?;
//!     ingest::stream_reader(File::open("data.bin")?, &mut splitter)?;
//!
//!     for record in &splitter.finish()? {
//!         println!("{} ({} bytes)", record.id, record.len);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod chunk;
mod chunker;
mod config;
mod error;
mod store;

mod hash; // internal sha512/blake3 dispatch

pub mod ingest;

//
// Public surface
//

pub use buffer::{Buffer, BufferPool};
pub use chunk::{ChunkDigest, ChunkId, ChunkRecord};
pub use chunker::{ChunkSplitter, Manifest};
pub use config::{
    AcquirePolicy, CHUNK_BASE_SIZE, CHUNK_MARGIN, DEFAULT_BUFFER_COUNT, DEFAULT_EXTENSION,
    DEFAULT_THRESHOLD, HashAlgorithm, NamingScheme, PoolConfig, SplitterConfig,
};
pub use error::ChunkError;
pub use store::{ChunkStore, DirStore, MemoryStore};
