// src/sign.rs

//! Ed25519 signing for seeds and for raw scalars.
//!
//! Two private-key representations exist, so there are two signers:
//!
//! - [`sign_with_secret_key`]: standard deterministic Ed25519 from the seed
//!   embedded in a [`SecretKey`]
//! - [`sign_with_private_key`]: for blinded subkeys, which exist only as a
//!   raw scalar. Standard Ed25519 derives its nonce from the seed, which a
//!   subkey does not have, so the nonce is `H(r || M)` for 32 fresh random
//!   bytes `r`. Signing the same message twice yields different (equally
//!   valid) signatures.
//!
//! Both produce ordinary Ed25519 signatures checked by the one [`verify`].

use crate::errors::{CryptoError, Result};
use crate::random;
use crate::types::{PrivateKey, PubKey, SecretKey, Signature};
use crate::SIGNATURE_SIZE;
use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

/// SHA-512 over the concatenation of `parts`
fn wide_hash(parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Signs with a seed-based secret key (deterministic Ed25519)
///
/// # Arguments
/// * `secret` - Identity key (seed || public key)
/// * `message` - Bytes to sign
///
/// # Returns
/// Signature, or `InvalidKey` if the public half does not belong to the seed
///
/// # Example
/// ```
/// use onion_crypto::keys::identity_keygen;
/// use onion_crypto::sign::{sign_with_secret_key, verify};
///
/// let sk = identity_keygen();
/// let sig = sign_with_secret_key(&sk, b"message").unwrap();
/// assert!(verify(&sk.to_public(), b"message", &sig).is_ok());
/// ```
pub fn sign_with_secret_key(secret: &SecretKey, message: &[u8]) -> Result<Signature> {
    let signing = SigningKey::from_keypair_bytes(secret.as_bytes()).map_err(|_| {
        CryptoError::InvalidKey("public half does not match seed".to_string())
    })?;
    Ok(Signature::new(signing.sign(message).to_bytes()))
}

/// Signs with a raw scalar using a randomized nonce
///
/// ```text
/// r      = 32 random bytes
/// nonce  = H(r || M) mod l
/// R      = nonce * B
/// A      = a * B
/// c      = H(R || A || M) mod l
/// S      = nonce + c * a
/// ```
///
/// `r` and `nonce` are wiped when this function returns, on every path.
pub fn sign_with_private_key(private: &PrivateKey, message: &[u8]) -> Result<Signature> {
    let a = Zeroizing::new(private.to_scalar());
    if *a == Scalar::ZERO {
        return Err(CryptoError::InvalidKey("private scalar is zero".to_string()));
    }
    let public = EdwardsPoint::mul_base(&a).compress();

    let mut r = Zeroizing::new([0u8; 32]);
    random::randomize(&mut r[..]);

    let nonce_hash = wide_hash(&[&r[..], message]);
    let nonce = Zeroizing::new(Scalar::from_bytes_mod_order_wide(&nonce_hash));
    let big_r = EdwardsPoint::mul_base(&nonce).compress();

    let hram = wide_hash(&[big_r.as_bytes(), public.as_bytes(), message]);
    let c = Scalar::from_bytes_mod_order_wide(&hram);
    let s = Zeroizing::new(&*nonce + &(&c * &*a));

    let mut sig = [0u8; SIGNATURE_SIZE];
    sig[..32].copy_from_slice(big_r.as_bytes());
    sig[32..].copy_from_slice(s.as_bytes());
    Ok(Signature::new(sig))
}

/// Verifies a signature from either signer
///
/// Uses strict Ed25519 verification: small-order keys and non-canonical
/// encodings are rejected. Safe to call concurrently.
pub fn verify(public: &PubKey, message: &[u8], signature: &Signature) -> Result<()> {
    let key = VerifyingKey::from_bytes(public.as_bytes())
        .map_err(|e| CryptoError::InvalidKey(format!("Invalid public key: {}", e)))?;
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());

    key.verify_strict(message, &sig)
        .map_err(|_| CryptoError::SignatureError("verification failed".to_string()))
}

/// Boolean form of [`verify`]
pub fn verify_signature(public: &PubKey, message: &[u8], signature: &Signature) -> bool {
    verify(public, message, signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::identity_keygen;
    use crate::subkey::{derive_subkey, derive_subkey_private};

    #[test]
    fn test_sign_and_verify() {
        let sk = identity_keygen();
        let sig = sign_with_secret_key(&sk, b"test message").unwrap();
        assert!(verify(&sk.to_public(), b"test message", &sig).is_ok());
    }

    #[test]
    fn test_seed_signature_deterministic() {
        let sk = identity_keygen();
        let sig1 = sign_with_secret_key(&sk, b"deterministic").unwrap();
        let sig2 = sign_with_secret_key(&sk, b"deterministic").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_verify_wrong_data() {
        let sk = identity_keygen();
        let sig = sign_with_secret_key(&sk, b"original message").unwrap();
        assert!(matches!(
            verify(&sk.to_public(), b"wrong message", &sig),
            Err(CryptoError::SignatureError(_))
        ));
    }

    #[test]
    fn test_verify_wrong_key() {
        let sk1 = identity_keygen();
        let sk2 = identity_keygen();
        let sig = sign_with_secret_key(&sk1, b"message").unwrap();
        assert!(!verify_signature(&sk2.to_public(), b"message", &sig));
    }

    #[test]
    fn test_sign_rejects_inconsistent_secret() {
        let sk = identity_keygen();
        let mut bytes = *sk.as_bytes();
        bytes[40] ^= 0xff;
        assert!(sign_with_secret_key(&SecretKey::new(bytes), b"msg").is_err());
    }

    #[test]
    fn test_private_key_signature_verifies() {
        let root = identity_keygen();
        let private = derive_subkey_private(&root, 1, None).unwrap();
        let public = derive_subkey(&root.to_public(), 1, None).unwrap();

        let message = b"Jeff loves one-letter variable names.";
        let sig = sign_with_private_key(&private, message).unwrap();
        assert!(verify(&public, message, &sig).is_ok());
        assert!(verify(&root.to_public(), message, &sig).is_err());
    }

    #[test]
    fn test_private_key_signature_randomized() {
        let private = identity_keygen().to_private();
        let sig1 = sign_with_private_key(&private, b"same").unwrap();
        let sig2 = sign_with_private_key(&private, b"same").unwrap();

        assert_ne!(sig1, sig2);
        assert!(verify_signature(&private.to_public(), b"same", &sig1));
        assert!(verify_signature(&private.to_public(), b"same", &sig2));
    }

    #[test]
    fn test_root_scalar_signature_verifies_under_root() {
        let sk = identity_keygen();
        let sig = sign_with_private_key(&sk.to_private(), b"root").unwrap();
        assert!(verify(&sk.to_public(), b"root", &sig).is_ok());
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(sign_with_private_key(&PrivateKey::new([0u8; 32]), b"msg").is_err());
    }

    #[test]
    fn test_verify_invalid_public_key() {
        let sk = identity_keygen();
        let sig = sign_with_secret_key(&sk, b"msg").unwrap();

        // Identity point is a weak key
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(verify(&PubKey::new(identity), b"msg", &sig).is_err());
    }
}
