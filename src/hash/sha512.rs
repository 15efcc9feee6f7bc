//! SHA-512 chunk digests.

use sha2::{Digest, Sha512};

/// Hashes `data` in one shot.
pub(super) fn hash(data: &[u8]) -> Vec<u8> {
    Sha512::digest(data).to_vec()
}
