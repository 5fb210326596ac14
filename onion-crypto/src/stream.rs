// src/stream.rs

//! XChaCha20 keystream for onion layers.
//!
//! Layers are peeled and added with the same call: XOR is an involution, so
//! applying the keystream twice with the same key and nonce restores the
//! input. There is no authentication here; headers carry their own MAC.

use crate::errors::{CryptoError, Result};
use crate::types::{SharedSecret, SymmNonce, TunnelNonce};
use crate::SYMM_NONCE_SIZE;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::XChaCha20;

fn cipher(key: &SharedSecret, nonce: &[u8]) -> Result<XChaCha20> {
    XChaCha20::new_from_slices(key.as_bytes(), nonce)
        .map_err(|e| CryptoError::CipherError(format!("Failed to create cipher: {}", e)))
}

/// Applies the keystream to `buf` in place
///
/// Only the first 24 bytes of the tunnel nonce are used.
///
/// # Example
/// ```
/// use onion_crypto::stream::xchacha20;
/// use onion_crypto::{SharedSecret, TunnelNonce};
///
/// let key = SharedSecret::new([7u8; 32]);
/// let nonce = TunnelNonce::random();
/// let mut layer = *b"relay cell";
/// xchacha20(&mut layer, &key, &nonce).unwrap();
/// xchacha20(&mut layer, &key, &nonce).unwrap();
/// assert_eq!(&layer, b"relay cell");
/// ```
pub fn xchacha20(buf: &mut [u8], key: &SharedSecret, nonce: &TunnelNonce) -> Result<()> {
    let mut c = cipher(key, &nonce.as_bytes()[..SYMM_NONCE_SIZE])?;
    c.try_apply_keystream(buf)
        .map_err(|e| CryptoError::CipherError(format!("Keystream exhausted: {}", e)))
}

/// Writes `input` XOR keystream into the front of `out`
///
/// # Arguments
/// * `out` - Destination; must be at least as long as `input`
/// * `input` - Source bytes
/// * `key` - Layer key
/// * `nonce` - Raw 24-byte nonce
///
/// # Returns
/// `InvalidLength` if `out` is shorter than `input`; `out` is left untouched
pub fn xchacha20_alt(
    out: &mut [u8],
    input: &[u8],
    key: &SharedSecret,
    nonce: &SymmNonce,
) -> Result<()> {
    if input.len() > out.len() {
        return Err(CryptoError::invalid_length(input.len(), out.len()));
    }

    let mut c = cipher(key, nonce.as_bytes())?;
    c.apply_keystream_b2b(input, &mut out[..input.len()])
        .map_err(|e| CryptoError::CipherError(format!("Keystream failed: {}", e)))
}
