//! # Groth16 Proof Verifier Adapter
//!
//! Implements [`ProofVerifier`] with a prepared BN254 verifying key.

use qc_zkp::{Fr, Groth16Verifier, ZkpError};
use tracing::debug;

use crate::ports::outbound::ProofVerifier;

/// Groth16 verifier for the email circuit.
#[derive(Clone, Debug)]
pub struct Groth16ProofVerifier {
    inner: Groth16Verifier,
}

impl Groth16ProofVerifier {
    /// Load a compressed verifying key.
    pub fn from_verifying_key_bytes(bytes: &[u8]) -> Result<Self, ZkpError> {
        let inner = Groth16Verifier::from_verifying_key_bytes(bytes)?;
        debug!(
            public_inputs = inner.num_public_inputs(),
            "Loaded email circuit verifying key"
        );
        Ok(Self { inner })
    }

    /// Number of public inputs the key expects.
    pub fn num_public_inputs(&self) -> usize {
        self.inner.num_public_inputs()
    }
}

impl ProofVerifier for Groth16ProofVerifier {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr]) -> Result<(), ZkpError> {
        self.inner.verify(proof, public_inputs)
    }
}
