//! Chunk finalization: hash, name, persist, release.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};

use crate::buffer::{Buffer, BufferPool};
use crate::chunk::{ChunkId, ChunkRecord};
use crate::config::{HashAlgorithm, NamingScheme, SplitterConfig};
use crate::error::ChunkError;
use crate::hash;
use crate::store::ChunkStore;

/// Turns filled buffers into persisted chunks.
#[derive(Debug)]
pub(crate) struct Finalizer<S> {
    store: S,
    hash: HashAlgorithm,
    naming: NamingScheme,
    extension: String,
    sequence: u64,
}

impl<S: ChunkStore> Finalizer<S> {
    pub(crate) fn new(store: S, config: &SplitterConfig) -> Self {
        Self {
            store,
            hash: config.hash(),
            naming: config.naming(),
            extension: config.extension().to_string(),
            sequence: 0,
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Finalizes `buffer`, whose bytes start at `offset` in the stream.
    ///
    /// The buffer goes back to `pool` on every path. A failed write is logged
    /// and reported through [`ChunkRecord::persisted`]; only a hash failure
    /// is returned as an error.
    pub(crate) fn finalize(
        &mut self,
        pool: &BufferPool,
        buffer: Buffer,
        offset: u64,
    ) -> Result<ChunkRecord, ChunkError> {
        let data = buffer.as_slice();
        let len = data.len();

        let digest = match hash::digest(self.hash, data) {
            Ok(digest) => digest,
            Err(e) => {
                pool.release(buffer);
                return Err(e);
            }
        };

        let id = ChunkId::new(digest, self.next_stamp(), self.extension.as_str());

        let persisted = match self.store.put(&id, data) {
            Ok(()) => {
                debug!(
                    "flushed chunk -> {} (size: {} bytes)",
                    self.store.locate(&id).display(),
                    len
                );
                true
            }
            Err(source) => {
                let err = ChunkError::Persist {
                    path: self.store.locate(&id),
                    source,
                };
                warn!("{err}");
                false
            }
        };

        pool.release(buffer);

        Ok(ChunkRecord {
            id,
            offset,
            len,
            persisted,
        })
    }

    fn next_stamp(&mut self) -> u64 {
        let seq = self.sequence;
        self.sequence += 1;
        match self.naming {
            NamingScheme::Sequence => seq,
            NamingScheme::Timestamp => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        }
    }
}
