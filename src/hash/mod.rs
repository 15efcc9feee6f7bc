//! Content digests for chunk naming.
//!
//! - `sha512` - SHA-512 via `sha2` (always available)
//! - `blake3` - BLAKE3 (requires `hash-blake3` feature)

#[cfg(feature = "hash-blake3")]
mod blake3;
mod sha512;

use crate::chunk::ChunkDigest;
use crate::config::HashAlgorithm;
use crate::error::ChunkError;

/// Computes the digest of `data` with the given algorithm.
pub(crate) fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Result<ChunkDigest, ChunkError> {
    let raw: Vec<u8> = match algorithm {
        HashAlgorithm::Sha512 => sha512::hash(data),
        #[cfg(feature = "hash-blake3")]
        HashAlgorithm::Blake3 => blake3::hash(data),
    };

    ChunkDigest::from_slice(algorithm, &raw).ok_or_else(|| ChunkError::Hash {
        message: format!(
            "{} produced {} bytes, expected {}",
            algorithm,
            raw.len(),
            algorithm.output_len()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let a = digest(HashAlgorithm::Sha512, b"hello world").unwrap();
        let b = digest(HashAlgorithm::Sha512, b"hello world").unwrap();
        assert_eq!(a, b);

        let c = digest(HashAlgorithm::Sha512, b"hello world!").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_input() {
        let d = digest(HashAlgorithm::Sha512, b"").unwrap();
        assert!(d.to_hex().starts_with("cf83e1357eefb8bd"));
    }
}
