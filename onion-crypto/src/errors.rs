// src/errors.rs

//! Error types for cryptographic operations.
//!
//! Every public operation in this crate reports failure through
//! [`CryptoError`]. Nothing is retried here: a failure usually means a
//! malformed or hostile peer, and the calling protocol decides whether to
//! re-handshake or drop the session.

use thiserror::Error;

/// Main error type for cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Buffer of the wrong size for a fixed-size operation
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Size the operation requires
        expected: usize,
        /// Size that was supplied
        actual: usize,
    },

    /// Invalid key format or inconsistent key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Bytes that do not decode to a usable curve point
    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    /// Signature generation or verification failed
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Scalar multiplication produced no usable shared secret
    #[error("Diffie-Hellman failed: {0}")]
    DhFailed(String),

    /// Subkey derivation failed
    #[error("Subkey derivation failed: {0}")]
    DerivationFailed(String),

    /// Random number generation failed
    #[error("Random generation error: {0}")]
    RandomError(String),

    /// Key encapsulation failed
    #[error("KEM error: {0}")]
    KemError(String),

    /// Stream cipher could not be applied
    #[error("Cipher error: {0}")]
    CipherError(String),

    /// Startup self-test detected inconsistent results
    #[error("Self-test failed: {0}")]
    SelfTestFailed(String),

    /// Engine configuration rejected
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Post-quantum operation requested while the hook is disabled
    #[error("Post-quantum hook is disabled")]
    PqDisabled,
}

impl CryptoError {
    /// Shorthand for a size mismatch
    pub fn invalid_length(expected: usize, actual: usize) -> Self {
        CryptoError::InvalidLength { expected, actual }
    }
}

/// Result type alias for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CryptoError::InvalidKey("key too short".to_string());
        assert_eq!(format!("{}", err), "Invalid key: key too short");

        let err = CryptoError::invalid_length(32, 31);
        assert_eq!(format!("{}", err), "Invalid length: expected 32, got 31");
    }

    #[test]
    fn test_error_clone() {
        let err1 = CryptoError::DhFailed("zero output".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }

    #[test]
    fn test_pq_disabled_display() {
        assert_eq!(
            CryptoError::PqDisabled.to_string(),
            "Post-quantum hook is disabled"
        );
    }
}
