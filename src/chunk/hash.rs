//! Chunk digest types.

use std::fmt;
use std::hash::{Hash as StdHash, Hasher};

use crate::config::HashAlgorithm;

const MAX_DIGEST_LEN: usize = 64;

/// A content digest naming a chunk.
///
/// Holds up to 64 bytes, the widest supported output (SHA-512). The
/// algorithm travels with the bytes so a digest can be recomputed and
/// compared later.
#[derive(Clone, Copy)]
pub struct ChunkDigest {
    algorithm: HashAlgorithm,
    bytes: [u8; MAX_DIGEST_LEN],
}

impl ChunkDigest {
    /// Creates a digest from raw output bytes.
    ///
    /// Returns `None` if the slice length does not match the algorithm.
    pub fn from_slice(algorithm: HashAlgorithm, slice: &[u8]) -> Option<Self> {
        if slice.len() != algorithm.output_len() {
            return None;
        }
        let mut bytes = [0u8; MAX_DIGEST_LEN];
        bytes[..slice.len()].copy_from_slice(slice);
        Some(Self { algorithm, bytes })
    }

    /// Parses a lowercase or uppercase hex digest.
    ///
    /// The algorithm is inferred from the string length.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let algorithm = HashAlgorithm::from_hex_len(hex_str.len())?;
        let raw = hex::decode(hex_str).ok()?;
        Self::from_slice(algorithm, &raw)
    }

    /// Returns the algorithm that produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.algorithm.output_len()]
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl PartialEq for ChunkDigest {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ChunkDigest {}

impl StdHash for ChunkDigest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.algorithm.hash(state);
        state.write(self.as_bytes());
    }
}

impl AsRef<[u8]> for ChunkDigest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkDigest({}:{})", self.algorithm, self.to_hex())
    }
}

impl fmt::Display for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
