// src/hash.rs

//! Hash and MAC engine.
//!
//! All hashing is BLAKE3:
//!
//! - [`shorthash`]: keyless 32-byte digest
//! - [`hmac`]: keyed 32-byte MAC, used to authenticate onion-layer headers
//! - [`longhash`]: 64 bytes of extendable output, used as the PRF input to
//!   scalar derivation where a wide value is needed for unbiased reduction
//!
//! Everything here is a pure function of its inputs.

use crate::types::{LongHash, SharedSecret, ShortHash};
use crate::{HMAC_SIZE, LONG_HASH_SIZE};

/// Computes the 32-byte BLAKE3 hash of `data`
///
/// # Example
/// ```
/// use onion_crypto::hash::shorthash;
///
/// let h = shorthash(b"router contact");
/// assert_eq!(h, shorthash(b"router contact"));
/// ```
pub fn shorthash(data: &[u8]) -> ShortHash {
    ShortHash::new(*blake3::hash(data).as_bytes())
}

/// Computes a keyed MAC over `data` with a shared secret as key
///
/// # Arguments
/// * `data` - Bytes to authenticate
/// * `secret` - 32-byte MAC key
///
/// # Returns
/// `HMAC_SIZE`-byte tag
pub fn hmac(data: &[u8], secret: &SharedSecret) -> [u8; HMAC_SIZE] {
    *blake3::keyed_hash(secret.as_bytes(), data).as_bytes()
}

/// Computes the 64-byte BLAKE3 extended output of `data`
pub fn longhash(data: &[u8]) -> LongHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(data);
    let mut out = [0u8; LONG_HASH_SIZE];
    hasher.finalize_xof().fill(&mut out);
    LongHash::new(out)
}

/// Keyed 32-byte hash with a raw key
pub(crate) fn keyed_shorthash(data: &[u8], key: &[u8; 32]) -> ShortHash {
    ShortHash::new(*blake3::keyed_hash(key, data).as_bytes())
}

/// Hashes multiple data chunks together
///
/// Equivalent to [`shorthash`] over the concatenation, without allocating.
pub fn hash_chunks(chunks: &[&[u8]]) -> ShortHash {
    let mut hasher = blake3::Hasher::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    ShortHash::new(*hasher.finalize().as_bytes())
}
