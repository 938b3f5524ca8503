//! # Hashing and Encoding
//!
//! SHA-256 digests plus the base64 variants credentials arrive in.

use crate::CryptoError;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Decode strict base64url without padding (JWS segments, WebAuthn fields).
pub fn decode_base64url(input: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

/// Encode bytes as base64url without padding.
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode any of the four common base64 alphabets/padding combinations.
///
/// Used for registry-supplied key material where producers disagree.
pub fn decode_base64_lenient(input: &str) -> Result<Vec<u8>, CryptoError> {
    let engines = [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD];
    for engine in engines {
        if let Ok(bytes) = engine.decode(input) {
            return Ok(bytes);
        }
    }
    Err(CryptoError::InvalidEncoding(format!(
        "not valid base64 ({} chars)",
        input.len()
    )))
}

/// Constant-time equality for digests and other public-but-sensitive values.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
