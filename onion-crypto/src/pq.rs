// src/pq.rs

//! Post-quantum KEM hook (ML-KEM-768).
//!
//! The sender encapsulates against a recipient's public half and gets a
//! ciphertext plus a 32-byte shared secret; the recipient decapsulates the
//! ciphertext with the secret half and recovers the same secret. Callers mix
//! it with the classical DH output themselves.

use crate::errors::{CryptoError, Result};
use crate::types::{PqCipherBlock, PqKeyPair, PqPubKey, PqSecretKey, SharedSecret};
use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{EncodedSizeUser, KemCore, MlKem768};
use rand::rngs::OsRng;
use tracing::warn;

type EncapsulationKey = <MlKem768 as KemCore>::EncapsulationKey;
type DecapsulationKey = <MlKem768 as KemCore>::DecapsulationKey;

fn shared_secret(bytes: &[u8]) -> Result<SharedSecret> {
    SharedSecret::from_slice(bytes)
}

/// Generates a fresh KEM keypair
///
/// # Example
/// ```
/// use onion_crypto::pq::{pqe_decrypt, pqe_encrypt, pqe_keygen};
///
/// let keypair = pqe_keygen().unwrap();
/// let (block, sent) = pqe_encrypt(keypair.public()).unwrap();
/// let received = pqe_decrypt(&block, keypair.secret()).unwrap();
/// assert_eq!(sent, received);
/// ```
pub fn pqe_keygen() -> Result<PqKeyPair> {
    let (dk, ek) = MlKem768::generate(&mut OsRng);

    let secret = PqSecretKey::from_slice(dk.as_bytes().as_ref())?;
    let public = PqPubKey::from_slice(ek.as_bytes().as_ref())?;
    Ok(PqKeyPair::new(secret, public))
}

/// Encapsulates a fresh shared secret to `public`
///
/// # Returns
/// The ciphertext to send and the locally kept shared secret
pub fn pqe_encrypt(public: &PqPubKey) -> Result<(PqCipherBlock, SharedSecret)> {
    let encoded: ml_kem::Encoded<EncapsulationKey> = public
        .as_bytes()
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::KemError("malformed encapsulation key".to_string()))?;
    let ek = EncapsulationKey::from_bytes(&encoded);

    let (ct, ss) = ek.encapsulate(&mut OsRng).map_err(|_| {
        warn!("ML-KEM encapsulation failed");
        CryptoError::KemError("encapsulation failed".to_string())
    })?;

    Ok((PqCipherBlock::from_slice(ct.as_ref())?, shared_secret(ss.as_ref())?))
}

/// Recovers the shared secret from a ciphertext
///
/// A tampered ciphertext does not fail: ML-KEM rejects implicitly and
/// returns an unrelated secret, so the mismatch surfaces when the caller
/// uses the key.
pub fn pqe_decrypt(block: &PqCipherBlock, secret: &PqSecretKey) -> Result<SharedSecret> {
    let encoded: ml_kem::Encoded<DecapsulationKey> = secret
        .as_bytes()
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::KemError("malformed decapsulation key".to_string()))?;
    let dk = DecapsulationKey::from_bytes(&encoded);

    let ct: ml_kem::Ciphertext<MlKem768> = block
        .as_bytes()
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::KemError("malformed ciphertext".to_string()))?;

    let ss = dk.decapsulate(&ct).map_err(|_| {
        warn!("ML-KEM decapsulation failed");
        CryptoError::KemError("decapsulation failed".to_string())
    })?;
    shared_secret(ss.as_ref())
}
