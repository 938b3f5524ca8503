//! # Shared Crypto - Signature Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256, base64 | Digests, token segment decoding |
//! | `signatures` | Ed25519 | Key and passkey authenticators, `EdDSA` tokens |
//! | `ecdsa` | secp256k1 | Key authenticators, `ES256K` tokens |
//! | `rsa` | RSASSA-PKCS1-v1_5 / SHA-256 | `RS256` tokens |
//!
//! ## Security Properties
//!
//! - **secp256k1**: low-S enforced on verification (no malleable signatures)
//! - **Ed25519**: strict verification (rejects small-order keys and non-canonical S)
//! - **RSA**: modulus bounded to 1024..=4096 bits before any verification work
//! - Digest comparisons are constant time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod rsa;
pub mod signatures;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{ct_eq, decode_base64_lenient, decode_base64url, encode_base64url, sha256, Hash};
pub use rsa::{RsaKeyPair, RsaVerifyingKey};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
