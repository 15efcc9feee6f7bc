//! Error types for chunkstream.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while splitting, naming or persisting chunks.
///
/// Two classes exist. Pool exhaustion and hash failures break an invariant
/// of the run and are fatal ([`ChunkError::is_fatal`]). Everything else is
/// local to one chunk or one input and the caller is expected to carry on.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// No free buffer was available at acquire time.
    #[error("buffer pool exhausted: all {buffers} buffers are checked out")]
    PoolExhausted {
        /// Total number of buffers owned by the pool.
        buffers: usize,
    },

    /// The content digest could not be computed.
    #[error("hash failure: {message}")]
    Hash {
        /// What went wrong.
        message: String,
    },

    /// Writing a chunk to the output location failed.
    #[error("failed to persist chunk {}: {source}", path.display())]
    Persist {
        /// Where the chunk was supposed to land.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An extraction collaborator could not deliver the input's content.
    #[error("extraction failed for {input}: {message}")]
    Extraction {
        /// The input being extracted.
        input: String,
        /// Why extraction failed.
        message: String,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// An I/O error outside of chunk persistence.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ChunkError {
    /// Returns `true` if the error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChunkError::PoolExhausted { .. } | ChunkError::Hash { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: ChunkError = io_err.into();
        assert!(matches!(err, ChunkError::Io(_)));
    }

    #[test]
    fn test_display() {
        let err = ChunkError::PoolExhausted { buffers: 4 };
        assert!(err.to_string().contains("all 4 buffers"));

        let err = ChunkError::Persist {
            path: PathBuf::from("/out/abc_1.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/out/abc_1.txt"));
    }

    #[test]
    fn test_fatality() {
        assert!(ChunkError::PoolExhausted { buffers: 1 }.is_fatal());
        assert!(
            ChunkError::Hash {
                message: "boom".into()
            }
            .is_fatal()
        );
        assert!(
            !ChunkError::Extraction {
                input: "a.pdf".into(),
                message: "missing tool".into()
            }
            .is_fatal()
        );
        assert!(!ChunkError::InvalidConfig { message: "x" }.is_fatal());
    }
}
