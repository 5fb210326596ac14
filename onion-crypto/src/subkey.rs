// src/subkey.rs

//! Deterministic key blinding (subkey derivation).
//!
//! Given a root identity `A = aB` and an index `i`, a blinding value `h` is
//! derived from `(i, A)` and the blinded keypair is:
//!
//! - public: `A' = hA`
//! - private: `a' = ha mod l`
//!
//! so `a'B = A'`. Anyone holding only `A` can compute `A'` for any index, but
//! two blinded keys cannot be linked to each other or to `A` without `h`.
//!
//! `h` is the encoding of a curve point obtained by mapping
//! `H(le64(i) || A)` onto the curve, then clamped. Callers that already hold
//! an `h` (e.g. for chained derivations) pass it in directly, and both the
//! public and private paths treat it identically.

use crate::errors::{CryptoError, Result};
use crate::hash::longhash;
use crate::keys::clamp_scalar;
use crate::types::{PrivateKey, PubKey, SecretKey};
use crate::PUBKEY_SIZE;
use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::IsIdentity,
};
use sha2::Sha512;
use tracing::error;
use zeroize::Zeroizing;

/// Maps `(index, root)` to the 32-byte blinding value `h`
///
/// The 64-byte hash of `le64(index) || root` is mapped onto the curve with
/// Elligator2 and cofactor clearing, giving a uniformly distributed
/// point whose encoding is used as the scalar input.
// Blinding values are pinned to this map; changing it changes every subkey.
#[allow(deprecated)]
pub fn make_scalar(root: &PubKey, index: u64) -> [u8; 32] {
    let mut buf = [0u8; 8 + PUBKEY_SIZE];
    buf[..8].copy_from_slice(&index.to_le_bytes());
    buf[8..].copy_from_slice(root.as_bytes());

    let n = longhash(&buf);
    EdwardsPoint::nonspec_map_to_curve::<Sha512>(n.as_bytes())
        .compress()
        .to_bytes()
}

fn blinding_value(root: &PubKey, index: u64, hash: Option<&[u8; 32]>) -> [u8; 32] {
    match hash {
        Some(h) => *h,
        None => make_scalar(root, index),
    }
}

/// Decompresses a root key
///
/// Only canonical encodings of points in the prime-order subgroup are
/// accepted, so each blinded key has exactly one root encoding.
fn decompress_root(root: &PubKey) -> Result<EdwardsPoint> {
    let point = CompressedEdwardsY(*root.as_bytes())
        .decompress()
        .ok_or_else(|| CryptoError::InvalidPoint("root key is not a curve point".to_string()))?;

    if point.compress().to_bytes() != *root.as_bytes() {
        return Err(CryptoError::InvalidPoint(
            "root key encoding is not canonical".to_string(),
        ));
    }
    if point.is_small_order() {
        return Err(CryptoError::InvalidPoint(
            "root key has small order".to_string(),
        ));
    }
    if !point.is_torsion_free() {
        return Err(CryptoError::InvalidPoint(
            "root key has a torsion component".to_string(),
        ));
    }
    Ok(point)
}

/// Derives the blinded public key `A' = hA`
///
/// # Arguments
/// * `root` - Root identity public key
/// * `index` - Derivation index; ignored when `hash` is given
/// * `hash` - Precomputed blinding value
///
/// # Returns
/// The blinded public key, or an error if `root` is not a usable point
///
/// # Example
/// ```
/// use onion_crypto::keys::identity_keygen;
/// use onion_crypto::subkey::derive_subkey;
///
/// let root = identity_keygen().to_public();
/// let a = derive_subkey(&root, 7, None).unwrap();
/// let b = derive_subkey(&root, 7, None).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn derive_subkey(root: &PubKey, index: u64, hash: Option<&[u8; 32]>) -> Result<PubKey> {
    let h = blinding_value(root, index, hash);
    let point = decompress_root(root).inspect_err(|e| {
        error!("cannot derive subkey: {}", e);
    })?;

    let derived = point.mul_clamped(h);
    if derived.is_identity() {
        error!("subkey derivation produced the identity");
        return Err(CryptoError::DerivationFailed(
            "derived point is the identity".to_string(),
        ));
    }
    Ok(PubKey::new(derived.compress().to_bytes()))
}

/// Derives the blinded private scalar `a' = ha mod l`
///
/// The root secret must be an identity key whose public half matches its
/// seed; `a` is recovered by expanding the seed, since the stored key holds
/// the seed rather than the scalar.
pub fn derive_subkey_private(
    root: &SecretKey,
    index: u64,
    hash: Option<&[u8; 32]>,
) -> Result<PrivateKey> {
    let root_public = root.to_public();
    let h = clamp_scalar(blinding_value(&root_public, index, hash));

    let a = root.to_private();
    if a.to_public() != root_public {
        error!("root secret key does not match its public half");
        return Err(CryptoError::DerivationFailed(
            "root secret key does not match its public half".to_string(),
        ));
    }

    let a = Zeroizing::new(a.to_scalar());
    let h = Scalar::from_bytes_mod_order(h);
    let derived = Zeroizing::new(h * *a);
    Ok(PrivateKey::new(derived.to_bytes()))
}
