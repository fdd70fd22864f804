//! Stable identity hashing for evidence chunks.

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// 64 bits is plenty for chunk identity within a corpus of policy documents:
/// a collision would only merge two chunks in a result set, never corrupt data.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Derives a point id for a chunk from its source URL and page number.
///
/// The separator prevents `("ab", 1)` and `("a", 11)` style ambiguity.
#[inline]
pub fn hash_doc_key(url: &str, page: Option<u32>) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(url.as_bytes());
    hasher.update(b"|");
    hasher.update(&page.unwrap_or(u32::MAX).to_le_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
