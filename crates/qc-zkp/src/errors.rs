//! ZKP error types.

use thiserror::Error;

/// Zero-knowledge proof errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZkpError {
    /// Public input is not a canonical decimal field element
    #[error("Invalid field element: '{0}'")]
    InvalidFieldElement(String),

    /// Byte string does not fit in the allotted field elements
    #[error("Input of {len} bytes exceeds packing capacity of {max} bytes")]
    InputTooLong {
        /// Input length in bytes
        len: usize,
        /// Capacity in bytes
        max: usize,
    },

    /// Field element does not hold a packed 31-byte chunk
    #[error("Field element is not a valid byte packing")]
    NonCanonicalPacking,

    /// Verifying key bytes could not be decoded
    #[error("Invalid verifying key")]
    InvalidVerifyingKey,

    /// Proof bytes could not be decoded
    #[error("Invalid proof encoding")]
    InvalidProof,

    /// Number of public inputs does not match the verifying key
    #[error("Public input count mismatch: expected {expected}, got {actual}")]
    InputCountMismatch {
        /// Inputs the circuit declares
        expected: usize,
        /// Inputs supplied
        actual: usize,
    },

    /// Proof verification failed
    #[error("Proof verification failed")]
    VerificationFailed,
}
