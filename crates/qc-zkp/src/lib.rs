//! # QC-ZKP: Zero-Knowledge Proof Verification
//!
//! Groth16 verification over BN254, the proof system zk-email circuits are
//! compiled for.
//!
//! ## Components
//!
//! - `field` - canonical field-element parsing and byte packing of public inputs
//! - `proof` - verifying-key loading and proof verification
//! - `testing` - echo circuit for fixtures (`test-utils` feature)

#![warn(missing_docs)]

pub mod errors;
pub mod field;
pub mod proof;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use ark_bn254::Fr;
pub use errors::ZkpError;
pub use field::{
    field_to_decimal, pack_bytes, parse_field_element, unpack_bytes, BYTES_PER_FIELD,
};
pub use proof::Groth16Verifier;
