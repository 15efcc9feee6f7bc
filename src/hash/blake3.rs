//! BLAKE3 chunk digests.

/// Hashes `data` in one shot.
pub(super) fn hash(data: &[u8]) -> Vec<u8> {
    blake3::hash(data).as_bytes().to_vec()
}
