// src/lib.rs

//! # Onion Crypto
//!
//! Cryptographic primitives for an onion-routing overlay network.
//!
//! This crate is the primitive layer underneath path building, router
//! identity signing and service-address blinding:
//!
//! - **Hashing**: BLAKE3 short, long (64-byte) and keyed hashes
//! - **Key Agreement**: X25519 bound to both parties' public keys and a nonce
//! - **Key Blinding**: deterministic Ed25519 subkeys from a root key and index
//! - **Signatures**: Ed25519 from seeds, plus a randomized-nonce signer for
//!   derived scalars that have no seed
//! - **Onion Layers**: XChaCha20 keystream application
//! - **Hybrid Hook**: ML-KEM-768 encapsulation for post-quantum secrecy
//!
//! ## Security Properties
//!
//! - **Identity Binding**: DH secrets hash both public keys, so mismatched
//!   pairings never agree
//! - **Unlinkability**: blinded subkeys cannot be linked to their root without
//!   the per-index hash
//! - **Hygiene**: secret types and ephemeral nonces are wiped on drop
//!
//! ## Example Usage
//!
//! ```rust
//! use onion_crypto::{dh, keys, sign, subkey, TunnelNonce};
//!
//! // Sign with a long-term identity
//! let identity = keys::identity_keygen();
//! let sig = sign::sign_with_secret_key(&identity, b"router contact").unwrap();
//! assert!(sign::verify(&identity.to_public(), b"router contact", &sig).is_ok());
//!
//! // Agree on a per-path key
//! let client = keys::encryption_keygen();
//! let relay = keys::encryption_keygen();
//! let nonce = TunnelNonce::random();
//! let a = dh::dh_client(&relay.to_public(), &client, &nonce).unwrap();
//! let b = dh::dh_server(&client.to_public(), &relay, &nonce).unwrap();
//! assert_eq!(a, b);
//!
//! // Blind the identity and sign with the blinded key
//! let blinded = subkey::derive_subkey_private(&identity, 1, None).unwrap();
//! let blinded_pub = subkey::derive_subkey(&identity.to_public(), 1, None).unwrap();
//! let sig = sign::sign_with_private_key(&blinded, b"intro set").unwrap();
//! assert!(sign::verify(&blinded_pub, b"intro set", &sig).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod dh;
pub mod engine;
pub mod errors;
pub mod hash;
pub mod keys;
pub mod pq;
pub mod random;
pub mod sign;
pub mod stream;
pub mod subkey;
pub mod types;

// Re-export commonly used types
pub use crate::config::EngineConfig;
pub use crate::engine::{Crypto, CryptoEngine};
pub use crate::errors::{CryptoError, Result};
pub use crate::types::{
    IdentitySecret, LongHash, PqCipherBlock, PqKeyPair, PqPubKey, PqSecretKey, PrivateKey,
    PubKey, SecretKey, SharedSecret, ShortHash, Signature, SymmNonce, TunnelNonce,
};

/// Public key size (compressed Edwards or Montgomery point)
pub const PUBKEY_SIZE: usize = 32;

/// Secret key size (seed || public key)
pub const SECKEY_SIZE: usize = 64;

/// Raw private scalar size
pub const PRIVKEY_SIZE: usize = 32;

/// Identity seed size
pub const IDENTITY_SECRET_SIZE: usize = 32;

/// Shared secret size
pub const SHARED_SECRET_SIZE: usize = 32;

/// Signature size (R || S)
pub const SIGNATURE_SIZE: usize = 64;

/// Short hash output size
pub const SHORT_HASH_SIZE: usize = 32;

/// Long hash output size
pub const LONG_HASH_SIZE: usize = 64;

/// Keyed MAC output size
pub const HMAC_SIZE: usize = 32;

/// Keyed MAC key size
pub const HMAC_SECRET_SIZE: usize = SHARED_SECRET_SIZE;

/// Tunnel nonce size; the first [`SYMM_NONCE_SIZE`] bytes feed XChaCha20
pub const TUNNEL_NONCE_SIZE: usize = 32;

/// XChaCha20 nonce size
pub const SYMM_NONCE_SIZE: usize = 24;

/// ML-KEM-768 encapsulation key size
pub const PQ_PUBLIC_KEY_SIZE: usize = 1184;

/// ML-KEM-768 decapsulation key size, also the offset of the public half
/// inside a flat [`PqKeyPair`] encoding
pub const PQ_SECRET_KEY_SIZE: usize = 2400;

/// ML-KEM-768 ciphertext size
pub const PQ_CIPHERTEXT_SIZE: usize = 1088;

/// Flat PQ keypair size (secret half || public half)
pub const PQ_KEYPAIR_SIZE: usize = PQ_SECRET_KEY_SIZE + PQ_PUBLIC_KEY_SIZE;
