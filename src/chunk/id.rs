//! Chunk identifiers.

use std::fmt;

use super::ChunkDigest;
use crate::hash;

/// The output identifier of a persisted chunk.
///
/// Renders as `<hex_digest>_<stamp>.<extension>`, or without the dot when the
/// extension is empty. The stamp is either Unix seconds or a per-stream
/// sequence number, depending on the [`NamingScheme`](crate::NamingScheme).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId {
    digest: ChunkDigest,
    stamp: u64,
    extension: String,
}

impl ChunkId {
    /// Creates an identifier.
    pub fn new(digest: ChunkDigest, stamp: u64, extension: impl Into<String>) -> Self {
        Self {
            digest,
            stamp,
            extension: extension.into(),
        }
    }

    /// Parses a file name produced by [`ChunkId::file_name`].
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, extension) = match file_name.split_once('.') {
            Some((stem, ext)) => (stem, ext),
            None => (file_name, ""),
        };
        let (hex, stamp) = stem.split_once('_')?;
        let digest = ChunkDigest::from_hex(hex)?;
        let stamp = stamp.parse().ok()?;
        Some(Self::new(digest, stamp, extension))
    }

    /// Returns the content digest.
    pub fn digest(&self) -> &ChunkDigest {
        &self.digest
    }

    /// Returns the timestamp or sequence number.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Returns the file extension (possibly empty).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the file name under which the chunk is stored.
    pub fn file_name(&self) -> String {
        self.to_string()
    }

    /// Recomputes the digest over `data` and compares it with this identifier.
    pub fn verify(&self, data: &[u8]) -> bool {
        hash::digest(self.digest.algorithm(), data)
            .map(|d| d == self.digest)
            .unwrap_or(false)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.digest, self.stamp)?;
        if !self.extension.is_empty() {
            write!(f, ".{}", self.extension)?;
        }
        Ok(())
    }
}
