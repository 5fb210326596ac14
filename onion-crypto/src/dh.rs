// src/dh.rs

//! Diffie-Hellman key agreement bound to both identities.
//!
//! A session key is derived in three steps:
//!
//! 1. `raw = X25519(our_secret, their_public)`, rejecting an all-zero result
//! 2. `shared = H(client_pk || server_pk || raw)`
//! 3. `session = H_keyed(key = shared, nonce)`
//!
//! The client/server binding order is fixed, so the client-role and
//! server-role calls agree when each side passes the other's public key.
//! Path keys and transport link keys go through separate entry points even
//! though the math is currently identical.

use crate::errors::{CryptoError, Result};
use crate::hash::{hash_chunks, keyed_shorthash};
use crate::types::{PubKey, SecretKey, SharedSecret, TunnelNonce};
use curve25519_dalek::montgomery::MontgomeryPoint;
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroizing;

/// Identity-bound X25519 agreement
fn dh(
    client_pk: &PubKey,
    server_pk: &PubKey,
    their_public: &PubKey,
    our_secret: &SecretKey,
) -> Result<SharedSecret> {
    let scalar = our_secret.seed_bytes();
    let raw = Zeroizing::new(
        MontgomeryPoint(*their_public.as_bytes())
            .mul_clamped(*scalar)
            .to_bytes(),
    );

    // Small-order input points land on the identity
    if bool::from(raw[..].ct_eq(&[0u8; 32][..])) {
        return Err(CryptoError::DhFailed(
            "scalar multiplication produced the identity".to_string(),
        ));
    }

    let shared = hash_chunks(&[
        client_pk.as_bytes().as_slice(),
        server_pk.as_bytes().as_slice(),
        raw.as_slice(),
    ]);
    Ok(SharedSecret::new(*shared.as_bytes()))
}

/// Mixes the per-handshake nonce into an identity-bound secret
fn session_key(shared: &SharedSecret, nonce: &TunnelNonce) -> SharedSecret {
    SharedSecret::new(*keyed_shorthash(nonce.as_bytes(), shared.as_bytes()).as_bytes())
}

fn dh_client_priv(their_public: &PubKey, our_secret: &SecretKey, nonce: &TunnelNonce) -> Result<SharedSecret> {
    let shared = dh(&our_secret.to_public(), their_public, their_public, our_secret)?;
    Ok(session_key(&shared, nonce))
}

fn dh_server_priv(their_public: &PubKey, our_secret: &SecretKey, nonce: &TunnelNonce) -> Result<SharedSecret> {
    let shared = dh(their_public, &our_secret.to_public(), their_public, our_secret)?;
    Ok(session_key(&shared, nonce))
}

/// Path key agreement, client side
///
/// # Arguments
/// * `server_public` - Relay's public encryption key
/// * `client_secret` - Our encryption key
/// * `nonce` - Per-handshake nonce shared with the relay
///
/// # Returns
/// Session key equal to the relay's [`dh_server`] result
pub fn dh_client(
    server_public: &PubKey,
    client_secret: &SecretKey,
    nonce: &TunnelNonce,
) -> Result<SharedSecret> {
    dh_client_priv(server_public, client_secret, nonce).inspect_err(|e| {
        warn!("dh_client failed: {}", e);
    })
}

/// Path key agreement, relay side
///
/// # Arguments
/// * `client_public` - Client's public encryption key
/// * `server_secret` - Our encryption key
/// * `nonce` - Per-handshake nonce shared with the client
pub fn dh_server(
    client_public: &PubKey,
    server_secret: &SecretKey,
    nonce: &TunnelNonce,
) -> Result<SharedSecret> {
    dh_server_priv(client_public, server_secret, nonce).inspect_err(|e| {
        warn!("dh_server failed: {}", e);
    })
}

/// Transport link key agreement, initiator side
pub fn transport_dh_client(
    server_public: &PubKey,
    client_secret: &SecretKey,
    nonce: &TunnelNonce,
) -> Result<SharedSecret> {
    dh_client_priv(server_public, client_secret, nonce).inspect_err(|e| {
        warn!("transport_dh_client failed: {}", e);
    })
}

/// Transport link key agreement, responder side
pub fn transport_dh_server(
    client_public: &PubKey,
    server_secret: &SecretKey,
    nonce: &TunnelNonce,
) -> Result<SharedSecret> {
    dh_server_priv(client_public, server_secret, nonce).inspect_err(|e| {
        warn!("transport_dh_server failed: {}", e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::encryption_keygen;

    #[test]
    fn test_client_server_agree() {
        let client = encryption_keygen();
        let server = encryption_keygen();
        let nonce = TunnelNonce::random();

        let a = dh_client(&server.to_public(), &client, &nonce).unwrap();
        let b = dh_server(&client.to_public(), &server, &nonce).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transport_agree() {
        let client = encryption_keygen();
        let server = encryption_keygen();
        let nonce = TunnelNonce::random();

        let a = transport_dh_client(&server.to_public(), &client, &nonce).unwrap();
        let b = transport_dh_server(&client.to_public(), &server, &nonce).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonce_changes_session_key() {
        let client = encryption_keygen();
        let server = encryption_keygen();

        let a = dh_client(&server.to_public(), &client, &TunnelNonce::new([1u8; 32])).unwrap();
        let b = dh_client(&server.to_public(), &client, &TunnelNonce::new([2u8; 32])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_swapped_roles_disagree() {
        // Both sides acting as client bind the keys in opposite order
        let x = encryption_keygen();
        let y = encryption_keygen();
        let nonce = TunnelNonce::random();

        let a = dh_client(&y.to_public(), &x, &nonce).unwrap();
        let b = dh_client(&x.to_public(), &y, &nonce).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_public_key_rejected() {
        let ours = encryption_keygen();
        let zero = PubKey::new([0u8; 32]);
        let nonce = TunnelNonce::random();

        assert!(matches!(
            dh_client(&zero, &ours, &nonce),
            Err(CryptoError::DhFailed(_))
        ));
        assert!(matches!(
            dh_server(&zero, &ours, &nonce),
            Err(CryptoError::DhFailed(_))
        ));
    }

    #[test]
    fn test_small_order_point_rejected() {
        // u = 1 has order 4 on Curve25519
        let mut one = [0u8; 32];
        one[0] = 1;
        let ours = encryption_keygen();

        let result = transport_dh_client(&PubKey::new(one), &ours, &TunnelNonce::random());
        assert!(result.is_err());
    }
}
