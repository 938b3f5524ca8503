//! Echo circuit for fixtures: every public input is copied from a private
//! witness, so any assignment of public inputs has a valid proof.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_relations::lc;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError, Variable};
use ark_serialize::CanonicalSerialize;
use ark_snark::SNARK;
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;

/// Circuit with `inputs.len()` public inputs.
#[derive(Clone, Debug)]
pub struct EchoCircuit {
    /// Values assigned to the public inputs.
    pub inputs: Vec<Fr>,
}

impl ConstraintSynthesizer<Fr> for EchoCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        for value in self.inputs {
            let public = cs.new_input_variable(|| Ok(value))?;
            let private = cs.new_witness_variable(|| Ok(value))?;
            cs.enforce_constraint(lc!() + private, lc!() + Variable::One, lc!() + public)?;
        }
        Ok(())
    }
}

/// Proving and verifying keys for an echo circuit of fixed width.
pub struct EchoCircuitKeys {
    proving_key: ProvingKey<Bn254>,
    verifying_key: VerifyingKey<Bn254>,
    width: usize,
}

impl EchoCircuitKeys {
    /// Run the (insecure, seeded) circuit-specific setup.
    pub fn setup(width: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let circuit = EchoCircuit {
            inputs: vec![Fr::from(0u64); width],
        };
        let (proving_key, verifying_key) =
            Groth16::<Bn254>::circuit_specific_setup(circuit, &mut rng)
                .expect("echo circuit setup");
        Self {
            proving_key,
            verifying_key,
            width,
        }
    }

    /// Compressed verifying key.
    pub fn verifying_key_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .expect("serialize verifying key");
        bytes
    }

    /// Prove the given public inputs, returning the compressed proof.
    pub fn prove(&self, inputs: &[Fr]) -> Vec<u8> {
        assert_eq!(inputs.len(), self.width, "echo circuit width");
        let mut rng = StdRng::seed_from_u64(0x9009);
        let proof = Groth16::<Bn254>::prove(
            &self.proving_key,
            EchoCircuit {
                inputs: inputs.to_vec(),
            },
            &mut rng,
        )
        .expect("echo circuit proof");
        let mut bytes = Vec::new();
        proof
            .serialize_compressed(&mut bytes)
            .expect("serialize proof");
        bytes
    }
}
