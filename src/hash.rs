//! Key hashing.
//!
//! Polynomial rolling hash with multiplier 33 over at most the first
//! [`HASHED_PREFIX`] bytes of the key, in wrapping `u32` arithmetic. Keys
//! that share those bytes always land in the same bucket. Deterministic and
//! unseeded; not suitable where adversarial keys matter.

/// Number of leading key bytes that contribute to the hash.
pub const HASHED_PREFIX: usize = 32;

/// Full 32-bit hash of `key`.
///
/// Stops early at a NUL byte so a key behaves the same as its
/// NUL-terminated form.
///
/// Bytes are treated as unsigned, so non-ASCII bytes add 128..=255.
#[inline]
pub fn hash_key(key: &str) -> u32 {
    key.as_bytes()
        .iter()
        .take(HASHED_PREFIX)
        .take_while(|&&b| b != 0)
        .fold(0u32, |acc, &b| acc.wrapping_mul(33).wrapping_add(u32::from(b)))
}

/// Reduces a full hash to a bucket index in `[0, capacity)`.
#[inline]
pub fn reduce(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    hash as usize % capacity
}

/// Bucket index of `key` in a table of `capacity` buckets.
#[inline]
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    reduce(hash_key(key), capacity)
}
