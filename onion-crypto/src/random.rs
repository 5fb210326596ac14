// src/random.rs

//! Randomness source.
//!
//! Every random byte in this crate comes from the operating system CSPRNG
//! through [`OsRng`]. There is no seeded process-wide generator; the OS
//! provider is safe to call from any number of threads.

use crate::errors::{CryptoError, Result};
use rand::rngs::OsRng;
use rand_core::RngCore;

/// Fills a buffer with random bytes
pub fn randomize(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Returns an array of random bytes
///
/// # Example
/// ```
/// use onion_crypto::random::randbytes;
///
/// let nonce: [u8; 24] = randbytes();
/// assert_eq!(nonce.len(), 24);
/// ```
pub fn randbytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    OsRng.fill_bytes(&mut out);
    out
}

/// Returns a uniformly random 64-bit integer
pub fn randint() -> u64 {
    OsRng.next_u64()
}

/// Probes the OS provider with a fallible fill
///
/// Used once at engine start so a broken entropy source surfaces as an error
/// instead of a panic deep inside key generation.
pub fn check_rng() -> Result<()> {
    let mut probe = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut probe)
        .map_err(|e| CryptoError::RandomError(format!("OS entropy source failed: {}", e)))?;

    if probe.iter().all(|&b| b == 0) {
        return Err(CryptoError::RandomError(
            "OS entropy source returned all zeroes".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomize_fills() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        randomize(&mut a);
        randomize(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_randint_varies() {
        let samples: Vec<u64> = (0..8).map(|_| randint()).collect();
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_check_rng() {
        assert!(check_rng().is_ok());
    }

    #[test]
    fn test_randomize_empty() {
        let mut empty: [u8; 0] = [];
        randomize(&mut empty);
    }
}
