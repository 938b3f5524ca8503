//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// RSA modulus outside the accepted range
    #[error("Unsupported RSA modulus size: {bits} bits (accepted {min}..={max})")]
    UnsupportedKeySize {
        /// Modulus size in bits
        bits: usize,
        /// Smallest accepted modulus
        min: usize,
        /// Largest accepted modulus
        max: usize,
    },

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Signature has a high S value
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Invalid encoding (base64 and friends)
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}
