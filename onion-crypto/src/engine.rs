// src/engine.rs

//! Engine handle and the boundary trait.
//!
//! [`CryptoEngine::new`] is the one-time start: it validates the config,
//! probes the OS entropy source and optionally runs a self-test. Holding a
//! `CryptoEngine` means those checks passed; there is no global "ready" flag.
//!
//! Higher layers depend on [`Crypto`] rather than the concrete engine so they
//! can swap in a test double.

use crate::config::EngineConfig;
use crate::errors::{CryptoError, Result};
use crate::types::{
    IdentitySecret, PqCipherBlock, PqKeyPair, PqPubKey, PqSecretKey, PrivateKey, PubKey,
    SecretKey, SharedSecret, ShortHash, Signature, SymmNonce, TunnelNonce,
};
use crate::{dh, hash, keys, pq, random, sign, stream, subkey, HMAC_SIZE};
use tracing::{debug, error, info};

/// Every cryptographic operation offered to the router
pub trait Crypto: Send + Sync {
    /// 32-byte hash
    fn shorthash(&self, data: &[u8]) -> ShortHash;

    /// Keyed MAC
    fn hmac(&self, data: &[u8], secret: &SharedSecret) -> [u8; HMAC_SIZE];

    /// Path key agreement, client side
    fn dh_client(
        &self,
        server_public: &PubKey,
        client_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret>;

    /// Path key agreement, relay side
    fn dh_server(
        &self,
        client_public: &PubKey,
        server_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret>;

    /// Link key agreement, initiator side
    fn transport_dh_client(
        &self,
        server_public: &PubKey,
        client_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret>;

    /// Link key agreement, responder side
    fn transport_dh_server(
        &self,
        client_public: &PubKey,
        server_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret>;

    /// Blinded public key
    fn derive_subkey(&self, root: &PubKey, index: u64, hash: Option<&[u8; 32]>)
        -> Result<PubKey>;

    /// Blinded private scalar
    fn derive_subkey_private(
        &self,
        root: &SecretKey,
        index: u64,
        hash: Option<&[u8; 32]>,
    ) -> Result<PrivateKey>;

    /// Deterministic Ed25519 signature from a seed-based key
    fn sign_with_secret_key(&self, secret: &SecretKey, message: &[u8]) -> Result<Signature>;

    /// Randomized-nonce signature from a raw scalar
    fn sign_with_private_key(&self, private: &PrivateKey, message: &[u8]) -> Result<Signature>;

    /// True if `signature` is valid for `message` under `public`
    fn verify(&self, public: &PubKey, message: &[u8], signature: &Signature) -> bool;

    /// Fresh identity key
    fn identity_keygen(&self) -> SecretKey;

    /// Fresh encryption key
    fn encryption_keygen(&self) -> SecretKey;

    /// Expands a seed
    fn seed_to_secretkey(&self, seed: &IdentitySecret) -> SecretKey;

    /// Checks a stored identity key against its own seed
    fn check_identity_privkey(&self, secret: &SecretKey) -> bool;

    /// In-place keystream
    fn xchacha20(&self, buf: &mut [u8], key: &SharedSecret, nonce: &TunnelNonce) -> Result<()>;

    /// Out-of-place keystream
    fn xchacha20_alt(
        &self,
        out: &mut [u8],
        input: &[u8],
        key: &SharedSecret,
        nonce: &SymmNonce,
    ) -> Result<()>;

    /// Fills `buf` from the OS CSPRNG
    fn randomize(&self, buf: &mut [u8]);

    /// Random 64-bit integer
    fn randint(&self) -> u64;

    /// Fresh KEM keypair
    fn pqe_keygen(&self) -> Result<PqKeyPair>;

    /// KEM encapsulation
    fn pqe_encrypt(&self, public: &PqPubKey) -> Result<(PqCipherBlock, SharedSecret)>;

    /// KEM decapsulation
    fn pqe_decrypt(&self, block: &PqCipherBlock, secret: &PqSecretKey) -> Result<SharedSecret>;
}

// Blinding vector from Tor's test suite
const KAT_SEED: [u8; 32] = [
    0x11, 0x68, 0xae, 0xa6, 0x62, 0x26, 0x6c, 0x53, 0x69, 0x9f, 0xe7, 0xd9, 0xbb, 0xff, 0xf6, 0x8e,
    0x58, 0x22, 0xde, 0x90, 0x4b, 0x91, 0x28, 0x5a, 0x7c, 0x41, 0xcc, 0x7c, 0x36, 0xb4, 0xf5, 0xa0,
];
const KAT_HASH: [u8; 32] = [
    0x22, 0x41, 0xca, 0x66, 0x21, 0x4c, 0x75, 0x40, 0x65, 0x57, 0x9e, 0x81, 0x8c, 0x70, 0x15, 0x2a,
    0x71, 0xb6, 0xc1, 0x67, 0x3f, 0x3b, 0x4b, 0x22, 0x31, 0xed, 0x22, 0x30, 0x2e, 0x2a, 0x23, 0x8e,
];
const KAT_DERIVED_PUB: [u8; 32] = [
    0xa0, 0x72, 0x62, 0x22, 0xd7, 0xc0, 0x91, 0x49, 0xe5, 0xe7, 0x86, 0x0d, 0xc1, 0x53, 0x14, 0x02,
    0xe9, 0x96, 0xb8, 0xd8, 0x93, 0xb9, 0x2f, 0xe9, 0xc8, 0xf6, 0xf0, 0x5d, 0xe2, 0x30, 0x06, 0x48,
];

fn check(ok: bool, what: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(CryptoError::SelfTestFailed(what.to_string()))
    }
}

fn known_answer_test() -> Result<()> {
    let root = keys::seed_to_secretkey(&IdentitySecret::new(KAT_SEED));
    let derived = subkey::derive_subkey(&root.to_public(), 0, Some(&KAT_HASH))?;
    check(
        derived == PubKey::new(KAT_DERIVED_PUB),
        "blinded public key does not match known answer",
    )?;

    let private = subkey::derive_subkey_private(&root, 0, Some(&KAT_HASH))?;
    check(
        private.to_public() == derived,
        "blinded private key does not match known answer",
    )
}

fn consistency_round(pq_enabled: bool) -> Result<()> {
    let identity = keys::identity_keygen();
    check(
        keys::check_identity_privkey(&identity),
        "fresh identity key fails its own check",
    )?;

    let client = keys::encryption_keygen();
    let server = keys::encryption_keygen();
    let nonce = TunnelNonce::random();
    let a = dh::dh_client(&server.to_public(), &client, &nonce)?;
    let b = dh::dh_server(&client.to_public(), &server, &nonce)?;
    check(a == b, "path DH sides disagree")?;

    let a = dh::transport_dh_client(&server.to_public(), &client, &nonce)?;
    let b = dh::transport_dh_server(&client.to_public(), &server, &nonce)?;
    check(a == b, "transport DH sides disagree")?;

    let index = random::randint();
    let blinded_pub = subkey::derive_subkey(&identity.to_public(), index, None)?;
    let blinded = subkey::derive_subkey_private(&identity, index, None)?;
    check(
        blinded.to_public() == blinded_pub,
        "blinded public and private keys disagree",
    )?;

    let message = random::randbytes::<32>();
    let sig = sign::sign_with_secret_key(&identity, &message)?;
    sign::verify(&identity.to_public(), &message, &sig)?;
    let sig = sign::sign_with_private_key(&blinded, &message)?;
    sign::verify(&blinded_pub, &message, &sig)?;

    if pq_enabled {
        let keypair = pq::pqe_keygen()?;
        let (block, sent) = pq::pqe_encrypt(keypair.public())?;
        let received = pq::pqe_decrypt(&block, keypair.secret())?;
        check(sent == received, "KEM round trip disagrees")?;
    }
    Ok(())
}

/// Ready-to-use crypto handle
///
/// Stateless apart from its configuration, so it can be shared across
/// threads behind an `Arc`.
#[derive(Clone, Debug)]
pub struct CryptoEngine {
    config: EngineConfig,
}

impl CryptoEngine {
    /// Starts the engine
    ///
    /// # Arguments
    /// * `config` - Engine options
    ///
    /// # Returns
    /// A handle, or the first failure among config validation, the entropy
    /// probe and the self-test
    ///
    /// # Example
    /// ```
    /// use onion_crypto::{Crypto, CryptoEngine, EngineConfig};
    ///
    /// let engine = CryptoEngine::new(EngineConfig::default()).unwrap();
    /// let identity = engine.identity_keygen();
    /// assert!(engine.check_identity_privkey(&identity));
    /// ```
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        random::check_rng().inspect_err(|e| error!("entropy probe failed: {}", e))?;

        let engine = Self { config };
        if engine.config.self_test_on_start {
            engine.self_test()?;
        }

        info!(
            "Crypto engine ready (pq_enabled={}, self_test={})",
            engine.config.pq_enabled, engine.config.self_test_on_start
        );
        Ok(engine)
    }

    /// Runs the known-answer test and `self_test_rounds` consistency rounds
    pub fn self_test(&self) -> Result<()> {
        let run = || -> Result<()> {
            known_answer_test()?;
            for round in 0..self.config.self_test_rounds {
                debug!("self-test round {}", round);
                consistency_round(self.config.pq_enabled)?;
            }
            Ok(())
        };

        run().map_err(|e| {
            error!("crypto self-test failed: {}", e);
            match e {
                CryptoError::SelfTestFailed(_) => e,
                other => CryptoError::SelfTestFailed(other.to_string()),
            }
        })
    }

    /// Configuration the engine was started with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn require_pq(&self) -> Result<()> {
        if self.config.pq_enabled {
            Ok(())
        } else {
            Err(CryptoError::PqDisabled)
        }
    }
}

impl Crypto for CryptoEngine {
    fn shorthash(&self, data: &[u8]) -> ShortHash {
        hash::shorthash(data)
    }

    fn hmac(&self, data: &[u8], secret: &SharedSecret) -> [u8; HMAC_SIZE] {
        hash::hmac(data, secret)
    }

    fn dh_client(
        &self,
        server_public: &PubKey,
        client_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret> {
        dh::dh_client(server_public, client_secret, nonce)
    }

    fn dh_server(
        &self,
        client_public: &PubKey,
        server_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret> {
        dh::dh_server(client_public, server_secret, nonce)
    }

    fn transport_dh_client(
        &self,
        server_public: &PubKey,
        client_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret> {
        dh::transport_dh_client(server_public, client_secret, nonce)
    }

    fn transport_dh_server(
        &self,
        client_public: &PubKey,
        server_secret: &SecretKey,
        nonce: &TunnelNonce,
    ) -> Result<SharedSecret> {
        dh::transport_dh_server(client_public, server_secret, nonce)
    }

    fn derive_subkey(
        &self,
        root: &PubKey,
        index: u64,
        hash: Option<&[u8; 32]>,
    ) -> Result<PubKey> {
        subkey::derive_subkey(root, index, hash)
    }

    fn derive_subkey_private(
        &self,
        root: &SecretKey,
        index: u64,
        hash: Option<&[u8; 32]>,
    ) -> Result<PrivateKey> {
        subkey::derive_subkey_private(root, index, hash)
    }

    fn sign_with_secret_key(&self, secret: &SecretKey, message: &[u8]) -> Result<Signature> {
        sign::sign_with_secret_key(secret, message)
    }

    fn sign_with_private_key(&self, private: &PrivateKey, message: &[u8]) -> Result<Signature> {
        sign::sign_with_private_key(private, message)
    }

    fn verify(&self, public: &PubKey, message: &[u8], signature: &Signature) -> bool {
        sign::verify_signature(public, message, signature)
    }

    fn identity_keygen(&self) -> SecretKey {
        keys::identity_keygen()
    }

    fn encryption_keygen(&self) -> SecretKey {
        keys::encryption_keygen()
    }

    fn seed_to_secretkey(&self, seed: &IdentitySecret) -> SecretKey {
        keys::seed_to_secretkey(seed)
    }

    fn check_identity_privkey(&self, secret: &SecretKey) -> bool {
        keys::check_identity_privkey(secret)
    }

    fn xchacha20(&self, buf: &mut [u8], key: &SharedSecret, nonce: &TunnelNonce) -> Result<()> {
        stream::xchacha20(buf, key, nonce)
    }

    fn xchacha20_alt(
        &self,
        out: &mut [u8],
        input: &[u8],
        key: &SharedSecret,
        nonce: &SymmNonce,
    ) -> Result<()> {
        stream::xchacha20_alt(out, input, key, nonce)
    }

    fn randomize(&self, buf: &mut [u8]) {
        random::randomize(buf)
    }

    fn randint(&self) -> u64 {
        random::randint()
    }

    fn pqe_keygen(&self) -> Result<PqKeyPair> {
        self.require_pq()?;
        pq::pqe_keygen()
    }

    fn pqe_encrypt(&self, public: &PqPubKey) -> Result<(PqCipherBlock, SharedSecret)> {
        self.require_pq()?;
        pq::pqe_encrypt(public)
    }

    fn pqe_decrypt(&self, block: &PqCipherBlock, secret: &PqSecretKey) -> Result<SharedSecret> {
        self.require_pq()?;
        pq::pqe_decrypt(block, secret)
    }
}
