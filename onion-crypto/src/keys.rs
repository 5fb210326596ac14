// src/keys.rs

//! Identity and encryption key generation.
//!
//! Two kinds of 64-byte [`SecretKey`] share one layout (32 secret bytes
//! followed by the 32-byte public key):
//!
//! - **identity keys**: an Ed25519 seed and its public key, for signing and
//!   as the root of blinded subkeys
//! - **encryption keys**: an X25519 scalar and its public key, for DH
//!
//! The Ed25519 seed is not itself a usable scalar. [`SecretKey::to_private`]
//! expands it into the clamped scalar `a` with `A = aB`.

use crate::random;
use crate::types::{IdentitySecret, PrivateKey, PubKey, SecretKey};
use curve25519_dalek::{edwards::EdwardsPoint, montgomery::MontgomeryPoint, scalar::Scalar};
use ed25519_dalek::SigningKey;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

/// Clamps 32 bytes for use as a curve scalar
///
/// Clears the low three bits, clears the top bit and sets the second-highest.
pub fn clamp_scalar(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes[0] &= 248;
    bytes[31] &= 63;
    bytes[31] |= 64;
    bytes
}

/// True if the bytes are unchanged by [`clamp_scalar`]
pub fn is_clamped(bytes: &[u8; 32]) -> bool {
    clamp_scalar(*bytes) == *bytes
}

/// Generates a fresh Ed25519 identity key
///
/// # Example
/// ```
/// use onion_crypto::keys::{identity_keygen, check_identity_privkey};
///
/// let identity = identity_keygen();
/// assert!(check_identity_privkey(&identity));
/// ```
pub fn identity_keygen() -> SecretKey {
    seed_to_secretkey(&IdentitySecret::random())
}

/// Expands a 32-byte seed into a seed-based secret key
pub fn seed_to_secretkey(seed: &IdentitySecret) -> SecretKey {
    let signing = SigningKey::from_bytes(seed.as_bytes());
    let keypair = Zeroizing::new(signing.to_keypair_bytes());
    SecretKey::new(*keypair)
}

/// Re-derives a secret key from its own seed and compares
///
/// Detects corrupted key files: both the public half and the full 64 bytes
/// must match what the seed expands to.
pub fn check_identity_privkey(secret: &SecretKey) -> bool {
    let rebuilt = seed_to_secretkey(&secret.identity_secret());
    rebuilt.to_public() == secret.to_public() && rebuilt == *secret
}

/// Generates a fresh X25519 encryption key in [`SecretKey`] layout
pub fn encryption_keygen() -> SecretKey {
    let scalar = Zeroizing::new(random::randbytes::<32>());
    let public = MontgomeryPoint::mul_base_clamped(*scalar);
    SecretKey::from_parts(&scalar, &PubKey::new(public.to_bytes()))
}

impl SecretKey {
    /// Expands the seed into the raw signing scalar `a`
    ///
    /// SHA-512 of the seed, first half, clamped. The result is not reduced.
    pub fn to_private(&self) -> PrivateKey {
        let seed = self.seed_bytes();
        let mut digest = Zeroizing::new([0u8; 64]);
        digest.copy_from_slice(&Sha512::digest(&seed[..]));

        let mut scalar = Zeroizing::new([0u8; 32]);
        scalar.copy_from_slice(&digest[..32]);
        PrivateKey::new(clamp_scalar(*scalar))
    }
}

impl PrivateKey {
    /// Public point `aB` for this scalar
    pub fn to_public(&self) -> PubKey {
        let scalar = Zeroizing::new(self.to_scalar());
        PubKey::new(EdwardsPoint::mul_base(&scalar).compress().to_bytes())
    }

    /// Scalar reduced modulo the group order
    pub(crate) fn to_scalar(&self) -> Scalar {
        Scalar::from_bytes_mod_order(*self.as_bytes())
    }
}
