//! Core splitting engine - ChunkSplitter with streaming API.
//!
//! This module implements fixed-threshold splitting over pooled buffers:
//!
//! - [`ChunkSplitter`] - Per-stream state holding one pooled buffer
//! - `push()` - Feed data in any size (1 byte, 64 KiB, 1 MiB, etc.)
//! - `finish()` - Flush the final partial chunk when the stream ends
//!
//! # Example
//!
//! ```
//! use chunkstream::{BufferPool, ChunkSplitter, MemoryStore, PoolConfig, SplitterConfig};
//!
//! let pool = BufferPool::new(PoolConfig::new(2, 10)?)?;
//! let store = MemoryStore::new();
//! let mut splitter = ChunkSplitter::new(&pool, &store, SplitterConfig::new(10)?)?;
//!
//! splitter.push(b"abc")?;
//! let flushed = splitter.push(b"defghijklmno")?;
//! assert_eq!(flushed.len(), 1);
//!
//! let manifest = splitter.finish()?;
//! assert_eq!(manifest.reassemble(&store)?, b"abcdefghijklmno");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use log::error;

use super::Manifest;
use super::finalize::Finalizer;
use crate::buffer::{Buffer, BufferPool};
use crate::chunk::ChunkRecord;
use crate::config::SplitterConfig;
use crate::error::ChunkError;
use crate::store::ChunkStore;

/// A splitter that cuts one byte stream into fixed-size chunks.
///
/// `ChunkSplitter` owns exactly one pooled buffer at a time. Bytes pushed in
/// are copied into it; as soon as it holds `threshold` bytes it is hashed,
/// written to the store and handed back to the pool, and a fresh buffer is
/// acquired.
///
/// # Determinism
///
/// Boundaries depend only on the cumulative number of bytes pushed, never on
/// how the input was sliced into `push()` calls. Every chunk except the last
/// is exactly `threshold` bytes; the last is between 1 and `threshold`.
///
/// # Drop
///
/// Dropping a splitter without calling [`ChunkSplitter::finish`] still
/// flushes any buffered bytes and returns the buffer to the pool. Errors in
/// that path can only be logged; call `finish()` to observe them.
#[derive(Debug)]
pub struct ChunkSplitter<'p, S: ChunkStore> {
    pool: &'p BufferPool,
    finalizer: Finalizer<S>,
    current: Option<Buffer>,
    threshold: usize,
    offset: u64,
    manifest: Manifest,
    finished: bool,
}

impl<'p, S: ChunkStore> ChunkSplitter<'p, S> {
    /// Creates a splitter and acquires its first buffer.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::InvalidConfig`] if the config is invalid or the
    ///   threshold exceeds the pool's buffer capacity
    /// - [`ChunkError::PoolExhausted`] if no buffer is free
    pub fn new(pool: &'p BufferPool, store: S, config: SplitterConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        if config.threshold() > pool.buffer_capacity() {
            return Err(ChunkError::InvalidConfig {
                message: "threshold exceeds pool buffer capacity",
            });
        }

        let current = pool.acquire()?;

        Ok(Self {
            pool,
            finalizer: Finalizer::new(store, &config),
            current: Some(current),
            threshold: config.threshold(),
            offset: 0,
            manifest: Manifest::default(),
            finished: false,
        })
    }

    /// Pushes data into the splitter and returns the chunks it completed.
    ///
    /// Any number of chunks, including zero, may be finalized by one call.
    /// Pushing an empty slice is a no-op.
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned: [`ChunkError::PoolExhausted`] and
    /// [`ChunkError::Hash`]. Failed writes show up as records with
    /// `persisted == false`.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<ChunkRecord>, ChunkError> {
        let mut flushed = Vec::new();
        let mut input = data;

        while !input.is_empty() {
            let threshold = self.threshold;
            let current = self.current_buffer()?;

            let space_left = threshold - current.len();
            if space_left == 0 {
                self.rotate(&mut flushed)?;
                continue;
            }

            let n = space_left.min(input.len());
            current.extend_from_slice(&input[..n]);
            input = &input[n..];

            if current.len() == threshold {
                self.rotate(&mut flushed)?;
            }
        }

        Ok(flushed)
    }

    /// Finalizes the stream and returns every chunk it produced, in order.
    ///
    /// A non-empty buffer is flushed as the last chunk; an empty one is just
    /// returned to the pool. No empty chunk is ever emitted.
    pub fn finish(mut self) -> Result<Manifest, ChunkError> {
        self.close()?;
        Ok(std::mem::take(&mut self.manifest))
    }

    /// Chunks finalized so far, in flush order.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Total bytes accepted by `push()` so far.
    pub fn bytes_pushed(&self) -> u64 {
        self.offset + self.pending_len() as u64
    }

    /// Bytes buffered but not yet finalized.
    pub fn pending_len(&self) -> usize {
        self.current.as_ref().map_or(0, Buffer::len)
    }

    /// The configured split threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The store chunks are written to.
    pub fn store(&self) -> &S {
        self.finalizer.store()
    }

    /// Returns the current buffer, acquiring one if an earlier acquire failed.
    fn current_buffer(&mut self) -> Result<&mut Buffer, ChunkError> {
        let buffer = match self.current.take() {
            Some(buffer) => buffer,
            None => self.pool.acquire()?,
        };
        Ok(self.current.insert(buffer))
    }

    /// Finalizes the current buffer and acquires the next one.
    fn rotate(&mut self, flushed: &mut Vec<ChunkRecord>) -> Result<(), ChunkError> {
        if let Some(record) = self.flush()? {
            flushed.push(record);
        }
        self.current = Some(self.pool.acquire()?);
        Ok(())
    }

    /// Finalizes the current buffer if it holds bytes.
    ///
    /// Leaves `current` empty (`None`) when a chunk was emitted.
    fn flush(&mut self) -> Result<Option<ChunkRecord>, ChunkError> {
        let Some(buffer) = self.current.take_if(|b| !b.is_empty()) else {
            return Ok(None);
        };

        let offset = self.offset;
        self.offset += buffer.len() as u64;
        let record = self.finalizer.finalize(self.pool, buffer, offset)?;
        self.manifest.push(record.clone());
        Ok(Some(record))
    }

    fn close(&mut self) -> Result<(), ChunkError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        self.flush()?;
        if let Some(empty) = self.current.take() {
            self.pool.release(empty);
        }
        Ok(())
    }
}

impl<S: ChunkStore> Drop for ChunkSplitter<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("failed to flush final chunk on drop: {e}");
        }
    }
}
