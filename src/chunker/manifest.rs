//! Ordered record of the chunks emitted for one stream.

use std::io;

use crate::chunk::ChunkRecord;
use crate::store::ChunkStore;

/// Chunk records of one stream, in flush order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: Vec<ChunkRecord>,
}

impl Manifest {
    pub(crate) fn push(&mut self, record: ChunkRecord) {
        self.records.push(record);
    }

    /// Records in flush order.
    pub fn records(&self) -> &[ChunkRecord] {
        &self.records
    }

    /// Number of chunks emitted.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the stream produced no chunks.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total bytes across all chunks.
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.len as u64).sum()
    }

    /// Number of chunks whose write failed.
    pub fn failed_writes(&self) -> usize {
        self.records.iter().filter(|r| !r.persisted).count()
    }

    /// Chunk file names in flush order.
    pub fn file_names(&self) -> impl Iterator<Item = String> + '_ {
        self.records.iter().map(|r| r.id.file_name())
    }

    /// Rebuilds the original stream by reading every chunk back from `store`.
    ///
    /// Fails if any chunk is missing, including chunks that were never
    /// persisted.
    pub fn reassemble<S: ChunkStore + ?Sized>(&self, store: &S) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.total_bytes() as usize);
        for record in &self.records {
            out.extend_from_slice(&store.get(&record.id)?);
        }
        Ok(out)
    }
}

impl IntoIterator for Manifest {
    type Item = ChunkRecord;
    type IntoIter = std::vec::IntoIter<ChunkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ChunkRecord;
    type IntoIter = std::slice::Iter<'a, ChunkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
