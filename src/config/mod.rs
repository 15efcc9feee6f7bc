//! Configuration for splitting and pooling.
//!
//! This module provides types to configure how streams are split and where
//! the memory for in-flight chunks comes from:
//!
//! - [`SplitterConfig`] - Threshold, digest algorithm, naming and extension
//! - [`PoolConfig`] - Buffer count, per-buffer capacity and acquire policy
//! - [`HashAlgorithm`] - Which digest names a chunk
//! - [`NamingScheme`] - What follows the digest in a chunk's identifier
//! - [`AcquirePolicy`] - What `acquire` does when no buffer is free
//!
//! # Example
//!
//! ```
//! use chunkstream::{HashAlgorithm, NamingScheme, PoolConfig, SplitterConfig};
//!
//! let splitter = SplitterConfig::new(1024)?
//!     .with_hash(HashAlgorithm::Sha512)
//!     .with_naming(NamingScheme::Sequence)
//!     .with_extension("bin");
//!
//! let pool = PoolConfig::new(4, 1024)?;
//! assert_eq!(pool.memory_ceiling(), 4096);
//! # Ok::<(), chunkstream::ChunkError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ChunkError;

/// Target chunk size (5 MiB).
pub const CHUNK_BASE_SIZE: usize = 5 * 1024 * 1024;

/// Fixed margin added on top of the target size (5 KiB).
pub const CHUNK_MARGIN: usize = 5 * 1024;

/// Default split threshold: target size plus margin.
pub const DEFAULT_THRESHOLD: usize = CHUNK_BASE_SIZE + CHUNK_MARGIN;

/// Default number of pooled buffers (~500 MiB ceiling at the default threshold).
pub const DEFAULT_BUFFER_COUNT: usize = 100;

/// Default file extension for persisted chunks.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Digest algorithm used to name chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-512, 128 hex characters.
    #[default]
    Sha512,
    /// BLAKE3, 64 hex characters.
    #[cfg(feature = "hash-blake3")]
    Blake3,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha512 => 64,
            #[cfg(feature = "hash-blake3")]
            HashAlgorithm::Blake3 => 32,
        }
    }

    /// Looks the algorithm up by its hex digest length.
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            128 => Some(HashAlgorithm::Sha512),
            #[cfg(feature = "hash-blake3")]
            64 => Some(HashAlgorithm::Blake3),
            _ => None,
        }
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha512 => "sha512",
            #[cfg(feature = "hash-blake3")]
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            #[cfg(feature = "hash-blake3")]
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(ChunkError::InvalidConfig {
                message: "unknown hash algorithm",
            }),
        }
    }
}

/// What follows the digest in a chunk identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingScheme {
    /// Wall-clock seconds since the Unix epoch at finalization time.
    #[default]
    Timestamp,
    /// 0-based position of the chunk within its stream.
    Sequence,
}

/// Behavior of [`BufferPool::acquire`](crate::BufferPool::acquire) when the
/// free set is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AcquirePolicy {
    /// Fail immediately with [`ChunkError::PoolExhausted`].
    #[default]
    FailFast,
    /// Wait up to the given duration for another thread to release a
    /// buffer, then fail with [`ChunkError::PoolExhausted`].
    Wait(Duration),
}

/// Configuration for a [`ChunkSplitter`](crate::ChunkSplitter).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SplitterConfig {
    threshold: usize,
    hash: HashAlgorithm,
    naming: NamingScheme,
    extension: String,
}

impl SplitterConfig {
    /// Creates a configuration with the given split threshold.
    ///
    /// Returns error if the threshold is zero.
    pub fn new(threshold: usize) -> Result<Self, ChunkError> {
        let config = Self {
            threshold,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the split threshold.
    ///
    /// Does not validate; use [`SplitterConfig::validate`].
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the digest algorithm.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Sets the naming scheme.
    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    /// Sets the file extension. An empty string means no extension.
    ///
    /// Does not validate; use [`SplitterConfig::validate`].
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the split threshold in bytes.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the digest algorithm.
    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /// Returns the naming scheme.
    pub fn naming(&self) -> NamingScheme {
        self.naming
    }

    /// Returns the file extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.threshold == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "threshold must be non-zero",
            });
        }

        if self.extension.contains(['/', '\\'])
            || self.extension.starts_with('.')
            || self.extension.ends_with('.')
        {
            return Err(ChunkError::InvalidConfig {
                message: "extension must be a bare suffix without separators",
            });
        }

        Ok(())
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            hash: HashAlgorithm::default(),
            naming: NamingScheme::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Configuration for a [`BufferPool`](crate::BufferPool).
///
/// Peak buffer memory is `buffer_count * buffer_capacity`, fixed at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    buffer_count: usize,
    buffer_capacity: usize,
    acquire: AcquirePolicy,
}

impl PoolConfig {
    /// Creates a fail-fast pool configuration.
    ///
    /// Returns error if either value is zero.
    pub fn new(buffer_count: usize, buffer_capacity: usize) -> Result<Self, ChunkError> {
        let config = Self {
            buffer_count,
            buffer_capacity,
            acquire: AcquirePolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the acquire policy.
    pub fn with_acquire_policy(mut self, acquire: AcquirePolicy) -> Self {
        self.acquire = acquire;
        self
    }

    /// Returns the number of buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffer_count
    }

    /// Returns the per-buffer capacity in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Returns the acquire policy.
    pub fn acquire_policy(&self) -> AcquirePolicy {
        self.acquire
    }

    /// Total bytes the pool may ever hold.
    pub fn memory_ceiling(&self) -> usize {
        self.buffer_count.saturating_mul(self.buffer_capacity)
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.buffer_count == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "buffer_count must be non-zero",
            });
        }
        if self.buffer_capacity == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "buffer_capacity must be non-zero",
            });
        }
        if self.buffer_count.checked_mul(self.buffer_capacity).is_none() {
            return Err(ChunkError::InvalidConfig {
                message: "pool memory ceiling overflows usize",
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buffer_count: DEFAULT_BUFFER_COUNT,
            buffer_capacity: DEFAULT_THRESHOLD,
            acquire: AcquirePolicy::default(),
        }
    }
}
