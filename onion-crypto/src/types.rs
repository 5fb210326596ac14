// src/types.rs

//! Fixed-size key and digest types.
//!
//! Each type is a thin newtype over a byte array with a `SIZE` constant,
//! size-checked construction and serde support as a byte string. Types that
//! hold secret material redact their `Debug` output and are wiped on drop.

use crate::errors::{CryptoError, Result};
use crate::random;
use crate::{
    IDENTITY_SECRET_SIZE, LONG_HASH_SIZE, PQ_CIPHERTEXT_SIZE,
    PQ_PUBLIC_KEY_SIZE, PQ_SECRET_KEY_SIZE, PRIVKEY_SIZE, PUBKEY_SIZE, SECKEY_SIZE,
    SHARED_SECRET_SIZE, SHORT_HASH_SIZE, SIGNATURE_SIZE, SYMM_NONCE_SIZE, TUNNEL_NONCE_SIZE,
};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Visitor accepting exactly `N` bytes, either as a byte string or a sequence
struct FixedBytesVisitor<const N: usize>(PhantomData<[u8; N]>);

impl<'de, const N: usize> Visitor<'de> for FixedBytesVisitor<N> {
    type Value = [u8; N];

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", N)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Self::Value, E> {
        v.try_into().map_err(|_| E::invalid_length(v.len(), &self))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut out = [0u8; N];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
        }
        Ok(out)
    }
}

macro_rules! impl_serde_bytes {
    ($name:ident, $size:expr) => {
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_bytes(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                deserializer
                    .deserialize_bytes(FixedBytesVisitor::<{ $size }>(PhantomData))
                    .map(Self)
            }
        }
    };
}

macro_rules! impl_common {
    ($name:ident, $size:expr) => {
        impl $name {
            /// Size in bytes
            pub const SIZE: usize = $size;

            /// Wraps raw bytes
            pub const fn new(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// Copies bytes from a slice of exactly `SIZE` bytes
            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                let arr: [u8; $size] = bytes
                    .try_into()
                    .map_err(|_| CryptoError::invalid_length($size, bytes.len()))?;
                Ok(Self(arr))
            }

            /// Borrows the underlying bytes
            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// True when every byte is zero; runs in constant time
            pub fn is_zero(&self) -> bool {
                bool::from(self.0[..].ct_eq(&[0u8; $size][..]))
            }
        }
    };
}

/// Declares a public (non-secret) byte array type
macro_rules! public_bytes {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name([u8; $size]);

        impl_common!($name, $size);
        impl_serde_bytes!($name, $size);

        impl $name {
            /// Copies the bytes into a vector
            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = CryptoError;

            fn from_str(s: &str) -> Result<Self> {
                let bytes = hex::decode(s)
                    .map_err(|e| CryptoError::InvalidKey(format!("Hex decode failed: {}", e)))?;
                Self::from_slice(&bytes)
            }
        }
    };
}

/// Declares a secret byte array type, wiped on drop
macro_rules! secret_bytes {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct $name([u8; $size]);

        impl_common!($name, $size);

        impl ConstantTimeEq for $name {
            fn ct_eq(&self, other: &Self) -> Choice {
                self.0[..].ct_eq(&other.0[..])
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                bool::from(self.ct_eq(other))
            }
        }

        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}([REDACTED])", stringify!($name))
            }
        }
    };
}

public_bytes!(
    /// Curve point encoding (Ed25519 or X25519 depending on use)
    PubKey,
    PUBKEY_SIZE
);

public_bytes!(
    /// Ed25519 signature: `R || S`
    Signature,
    SIGNATURE_SIZE
);

public_bytes!(
    /// 32-byte digest
    ShortHash,
    SHORT_HASH_SIZE
);

public_bytes!(
    /// 64-byte digest, wide enough to reduce modulo the group order
    LongHash,
    LONG_HASH_SIZE
);

public_bytes!(
    /// Per-handshake nonce mixed into DH session keys
    TunnelNonce,
    TUNNEL_NONCE_SIZE
);

public_bytes!(
    /// Raw XChaCha20 nonce
    SymmNonce,
    SYMM_NONCE_SIZE
);

public_bytes!(
    /// ML-KEM encapsulation key (public half of a [`PqKeyPair`])
    PqPubKey,
    PQ_PUBLIC_KEY_SIZE
);

public_bytes!(
    /// ML-KEM ciphertext
    PqCipherBlock,
    PQ_CIPHERTEXT_SIZE
);

secret_bytes!(
    /// Seed-based secret key: 32-byte seed followed by its 32-byte public key
    SecretKey,
    SECKEY_SIZE
);

secret_bytes!(
    /// Raw clamped scalar with no recoverable seed
    ///
    /// Produced by [`SecretKey::to_private`] or by subkey derivation, never
    /// drawn directly from the RNG.
    PrivateKey,
    PRIVKEY_SIZE
);

secret_bytes!(
    /// Symmetric key material from DH or KEM decapsulation
    SharedSecret,
    SHARED_SECRET_SIZE
);

secret_bytes!(
    /// 32-byte identity seed; only meaningful as input to `seed_to_secretkey`
    IdentitySecret,
    IDENTITY_SECRET_SIZE
);

secret_bytes!(
    /// ML-KEM decapsulation key (secret half of a [`PqKeyPair`])
    PqSecretKey,
    PQ_SECRET_KEY_SIZE
);

impl_serde_bytes!(SecretKey, SECKEY_SIZE);
impl_serde_bytes!(PrivateKey, PRIVKEY_SIZE);
impl_serde_bytes!(IdentitySecret, IDENTITY_SECRET_SIZE);

impl TunnelNonce {
    /// Fresh random nonce
    pub fn random() -> Self {
        Self(random::randbytes())
    }
}

impl SymmNonce {
    /// Fresh random nonce
    pub fn random() -> Self {
        Self(random::randbytes())
    }
}

impl IdentitySecret {
    /// Fresh random seed
    pub fn random() -> Self {
        Self(random::randbytes())
    }
}

impl SecretKey {
    /// Assembles a secret key from a seed and the public key it expands to
    pub fn from_parts(seed: &[u8; 32], public: &PubKey) -> Self {
        let mut bytes = [0u8; SECKEY_SIZE];
        bytes[..32].copy_from_slice(seed);
        bytes[32..].copy_from_slice(public.as_bytes());
        let key = Self(bytes);
        bytes.zeroize();
        key
    }

    /// Public half: the last 32 bytes
    pub fn to_public(&self) -> PubKey {
        let mut public = [0u8; PUBKEY_SIZE];
        public.copy_from_slice(&self.0[32..]);
        PubKey(public)
    }

    /// Extracts the seed half as an [`IdentitySecret`]
    pub fn identity_secret(&self) -> IdentitySecret {
        IdentitySecret(*self.seed_bytes())
    }

    pub(crate) fn seed_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(&self.0[..32]);
        seed
    }
}

/// Post-quantum keypair with named halves
///
/// The wire layout produced by [`PqKeyPair::to_bytes`] is the secret half
/// followed by the public half, so the public half starts at offset
/// [`PQ_SECRET_KEY_SIZE`].
#[derive(Clone, PartialEq, Eq)]
pub struct PqKeyPair {
    secret: PqSecretKey,
    public: PqPubKey,
}

impl PqKeyPair {
    /// Size of the flat wire encoding
    pub const SIZE: usize = PQ_SECRET_KEY_SIZE + PQ_PUBLIC_KEY_SIZE;

    /// Pairs a decapsulation key with its encapsulation key
    pub fn new(secret: PqSecretKey, public: PqPubKey) -> Self {
        Self { secret, public }
    }

    /// Secret (decapsulation) half
    pub fn secret(&self) -> &PqSecretKey {
        &self.secret
    }

    /// Public (encapsulation) half
    pub fn public(&self) -> &PqPubKey {
        &self.public
    }

    /// Flat encoding: secret half then public half
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::with_capacity(Self::SIZE));
        out.extend_from_slice(self.secret.as_bytes());
        out.extend_from_slice(self.public.as_bytes());
        out
    }

    /// Parses the flat encoding produced by [`PqKeyPair::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(CryptoError::invalid_length(Self::SIZE, bytes.len()));
        }
        let (secret, public) = bytes.split_at(PQ_SECRET_KEY_SIZE);
        Ok(Self {
            secret: PqSecretKey::from_slice(secret)?,
            public: PqPubKey::from_slice(public)?,
        })
    }
}

impl fmt::Debug for PqKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PqKeyPair")
            .field("secret", &self.secret)
            .field("public", &hex::encode(&self.public.as_bytes()[..8]))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_checks_length() {
        assert!(PubKey::from_slice(&[1u8; 32]).is_ok());
        assert_eq!(
            PubKey::from_slice(&[1u8; 31]),
            Err(CryptoError::invalid_length(32, 31))
        );
        assert!(Signature::from_slice(&[0u8; 65]).is_err());
    }

    #[test]
    fn test_hex_display_and_parse() {
        let key = PubKey::new([0xab; 32]);
        let text = key.to_string();
        assert_eq!(text, "ab".repeat(32));
        assert_eq!(text.parse::<PubKey>().unwrap(), key);
        assert!("zz".parse::<PubKey>().is_err());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let sk = SecretKey::new([7u8; 64]);
        assert_eq!(format!("{:?}", sk), "SecretKey([REDACTED])");
        let shared = SharedSecret::new([1u8; 32]);
        assert!(!format!("{:?}", shared).contains("01"));
    }

    #[test]
    fn test_secret_key_layout() {
        let seed = [3u8; 32];
        let public = PubKey::new([9u8; 32]);
        let sk = SecretKey::from_parts(&seed, &public);

        assert_eq!(sk.to_public(), public);
        assert_eq!(sk.identity_secret().as_bytes(), &seed);
        assert_eq!(&sk.as_bytes()[..32], &seed);
    }

    #[test]
    fn test_pq_keypair_layout() {
        let pair = PqKeyPair::new(
            PqSecretKey::new([1u8; PQ_SECRET_KEY_SIZE]),
            PqPubKey::new([2u8; PQ_PUBLIC_KEY_SIZE]),
        );
        let flat = pair.to_bytes();

        assert_eq!(flat.len(), PqKeyPair::SIZE);
        assert!(flat[..PQ_SECRET_KEY_SIZE].iter().all(|&b| b == 1));
        assert!(flat[PQ_SECRET_KEY_SIZE..].iter().all(|&b| b == 2));
        assert_eq!(PqKeyPair::from_bytes(&flat).unwrap(), pair);
        assert!(PqKeyPair::from_bytes(&flat[1..]).is_err());
    }

    #[test]
    fn test_random_nonces_differ() {
        assert_ne!(TunnelNonce::random(), TunnelNonce::random());
        assert_ne!(SymmNonce::random(), SymmNonce::random());
    }

    #[test]
    fn test_is_zero() {
        assert!(PubKey::new([0u8; 32]).is_zero());
        assert!(!PubKey::new([1u8; 32]).is_zero());
        assert!(SharedSecret::new([0u8; 32]).is_zero());

        let mut last = [0u8; 32];
        last[31] = 1;
        assert!(!SharedSecret::new(last).is_zero());
    }

    #[test]
    fn test_secret_equality_constant_time() {
        let a = SharedSecret::new([7u8; 32]);
        let b = SharedSecret::new([7u8; 32]);
        let mut tail = [7u8; 32];
        tail[31] = 8;
        let c = SharedSecret::new(tail);

        assert!(bool::from(a.ct_eq(&b)));
        assert!(!bool::from(a.ct_eq(&c)));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let sk = SecretKey::new([3u8; 64]);
        let mut other = [3u8; 64];
        other[63] = 4;
        assert_ne!(sk, SecretKey::new(other));
    }
}
