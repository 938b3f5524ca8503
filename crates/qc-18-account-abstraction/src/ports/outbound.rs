//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies this subsystem needs.

use qc_zkp::{Fr, ZkpError};

use crate::domain::entities::{Audience, DkimRecord};

/// Read access to the credential registries.
///
/// Verification only ever sees registry state through this trait, bound to
/// the evaluation context (a live store or a snapshot of one).
pub trait RegistryReader: Send + Sync {
    /// Active audience under `name`.
    fn audience(&self, name: &str) -> Option<&Audience>;

    /// Any active DKIM record whose commitment equals `commitment`.
    ///
    /// `commitment` is the canonical decimal form of the field element.
    fn dkim_by_commitment(&self, commitment: &str) -> Option<&DkimRecord>;
}

/// Zero-knowledge proof verification.
///
/// The email circuit's verifying key lives behind this port so that
/// pipeline logic stays independent of the proving system.
pub trait ProofVerifier: Send + Sync {
    /// Verify `proof` against the public inputs.
    ///
    /// # Errors
    /// * `ZkpError::InputCountMismatch` - Wrong number of public inputs
    /// * `ZkpError::InvalidProof` - Proof bytes do not decode
    /// * `ZkpError::VerificationFailed` - Pairing check failed
    fn verify(&self, proof: &[u8], public_inputs: &[Fr]) -> Result<(), ZkpError>;
}
