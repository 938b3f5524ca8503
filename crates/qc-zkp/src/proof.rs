//! # Groth16 Proof Verification
//!
//! Verifying keys and proofs use the arkworks compressed encoding.
//! Trailing bytes after either encoding are rejected.

use crate::errors::ZkpError;
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;

/// Verifier bound to one circuit's verifying key.
#[derive(Clone, Debug)]
pub struct Groth16Verifier {
    prepared: PreparedVerifyingKey<Bn254>,
    num_public_inputs: usize,
}

impl Groth16Verifier {
    /// Load a compressed verifying key.
    pub fn from_verifying_key_bytes(bytes: &[u8]) -> Result<Self, ZkpError> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes)
            .map_err(|_| ZkpError::InvalidVerifyingKey)?;
        if vk.compressed_size() != bytes.len() || vk.gamma_abc_g1.is_empty() {
            return Err(ZkpError::InvalidVerifyingKey);
        }
        let num_public_inputs = vk.gamma_abc_g1.len() - 1;
        let prepared =
            Groth16::<Bn254>::process_vk(&vk).map_err(|_| ZkpError::InvalidVerifyingKey)?;
        Ok(Self {
            prepared,
            num_public_inputs,
        })
    }

    /// Number of public inputs the circuit declares.
    pub fn num_public_inputs(&self) -> usize {
        self.num_public_inputs
    }

    /// Verify a compressed proof against the given public inputs.
    pub fn verify(&self, proof_bytes: &[u8], public_inputs: &[Fr]) -> Result<(), ZkpError> {
        if public_inputs.len() != self.num_public_inputs {
            return Err(ZkpError::InputCountMismatch {
                expected: self.num_public_inputs,
                actual: public_inputs.len(),
            });
        }

        let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes)
            .map_err(|_| ZkpError::InvalidProof)?;
        if proof.compressed_size() != proof_bytes.len() {
            return Err(ZkpError::InvalidProof);
        }

        match Groth16::<Bn254>::verify_with_processed_vk(&self.prepared, public_inputs, &proof) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(ZkpError::VerificationFailed),
        }
    }
}
