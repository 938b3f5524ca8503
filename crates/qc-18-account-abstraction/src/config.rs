//! Authorization configuration and validation
//!
//! The configuration is an explicit value handed to the service at
//! construction. Nothing in this crate reads process-wide settings.
//!
//! # Example
//!
//! ```
//! use qc_18_account_abstraction::AuthConfig;
//!
//! let config = AuthConfig::default()
//!     .with_clock_skew(5)
//!     .with_address_prefix("xion");
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::authenticator::AuthenticatorKind;

/// Largest accepted clock-skew tolerance (one hour).
pub const MAX_CLOCK_SKEW_SECS: u64 = 3_600;

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A size bound is zero
    #[error("{0} must be greater than zero")]
    ZeroBound(&'static str),

    /// Clock skew is larger than the allowed maximum
    #[error("Clock skew {skew}s exceeds maximum {max}s")]
    ExcessiveClockSkew { skew: u64, max: u64 },

    /// Address prefix is empty
    #[error("Address prefix cannot be empty")]
    EmptyAddressPrefix,
}

/// Gas figure reported per authenticator variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCosts {
    /// Secp256K1 / Ed25519 signature check
    pub key: u64,
    /// Token pipeline
    pub jwt: u64,
    /// Passkey assertion check
    pub passkey: u64,
    /// Groth16 proof plus registry cross-checks
    pub zk_email: u64,
    /// Charged when the envelope names no stored authenticator
    pub lookup: u64,
}

impl Default for VerificationCosts {
    fn default() -> Self {
        Self {
            key: 10_000,
            jwt: 60_000,
            passkey: 40_000,
            zk_email: 250_000,
            lookup: 1_000,
        }
    }
}

impl VerificationCosts {
    /// Gas charged for running the pipeline of the given variant.
    pub fn for_kind(&self, kind: AuthenticatorKind) -> u64 {
        match kind {
            AuthenticatorKind::KeyBased => self.key,
            AuthenticatorKind::TokenBased => self.jwt,
            AuthenticatorKind::PasskeyBased => self.passkey,
            AuthenticatorKind::ZkEmailBased => self.zk_email,
        }
    }
}

/// Authorization configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Tolerance applied to `nbf`, `exp` and `iat` (seconds)
    pub clock_skew_secs: u64,
    /// Maximum compact token size (bytes)
    pub max_token_bytes: usize,
    /// Maximum ZK-email credential envelope size (bytes)
    pub max_proof_bytes: usize,
    /// Maximum passkey credential size (bytes)
    pub max_passkey_bytes: usize,
    /// Human-readable prefix of account addresses
    pub address_prefix: String,
    /// Gas reported to the fee pipeline
    pub costs: VerificationCosts,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            clock_skew_secs: 0,
            max_token_bytes: 8 * 1024,
            max_proof_bytes: 16 * 1024,
            max_passkey_bytes: 4 * 1024,
            address_prefix: "qc".to_string(),
            costs: VerificationCosts::default(),
        }
    }
}

impl AuthConfig {
    /// Validate bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_token_bytes == 0 {
            return Err(ConfigError::ZeroBound("max_token_bytes"));
        }
        if self.max_proof_bytes == 0 {
            return Err(ConfigError::ZeroBound("max_proof_bytes"));
        }
        if self.max_passkey_bytes == 0 {
            return Err(ConfigError::ZeroBound("max_passkey_bytes"));
        }
        if self.clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            return Err(ConfigError::ExcessiveClockSkew {
                skew: self.clock_skew_secs,
                max: MAX_CLOCK_SKEW_SECS,
            });
        }
        if self.address_prefix.is_empty() {
            return Err(ConfigError::EmptyAddressPrefix);
        }
        Ok(())
    }

    /// Builder-style method to set the clock-skew tolerance
    pub fn with_clock_skew(mut self, secs: u64) -> Self {
        self.clock_skew_secs = secs;
        self
    }

    /// Builder-style method to set the token size bound
    pub fn with_max_token_bytes(mut self, bytes: usize) -> Self {
        self.max_token_bytes = bytes;
        self
    }

    /// Builder-style method to set the ZK-email envelope size bound
    pub fn with_max_proof_bytes(mut self, bytes: usize) -> Self {
        self.max_proof_bytes = bytes;
        self
    }

    /// Builder-style method to set the address prefix
    pub fn with_address_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.address_prefix = prefix.into();
        self
    }

    /// Builder-style method to set gas costs
    pub fn with_costs(mut self, costs: VerificationCosts) -> Self {
        self.costs = costs;
        self
    }
}
