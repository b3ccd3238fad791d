//! Key hashing
//!
//! 64-bit FNV-1a over the key's UTF-8 bytes. The result is identical on
//! every run and platform, unlike `std`'s randomly seeded `DefaultHasher`.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash a key with FNV-1a
pub fn fnv1a(key: &str) -> u64 {
    key.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Bucket index for `key` in a table of `bucket_count` buckets
///
/// `bucket_count` must be non-zero.
pub fn bucket_index(key: &str, bucket_count: usize) -> usize {
    (fnv1a(key) % bucket_count as u64) as usize
}
