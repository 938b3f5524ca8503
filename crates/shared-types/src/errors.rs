//! # Error Types
//!
//! Errors raised while validating ledger-facing entities.

use thiserror::Error;

/// Errors related to account address validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Address does not carry the configured human-readable prefix.
    #[error("Address prefix mismatch: expected '{expected}1...', got '{address}'")]
    PrefixMismatch { expected: String, address: String },

    /// Address has no data part after the separator.
    #[error("Address '{0}' has an empty data part")]
    EmptyData(String),

    /// Address data part contains characters outside lowercase alphanumerics.
    #[error("Address '{0}' contains invalid characters")]
    InvalidCharacters(String),

    /// Address exceeds the maximum length.
    #[error("Address length {length} exceeds maximum {max}")]
    TooLong { length: usize, max: usize },
}
