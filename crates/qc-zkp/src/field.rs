//! # BN254 Scalar Field Helpers
//!
//! Public inputs travel as decimal strings. Byte strings (email hosts,
//! transaction digests) are packed 31 bytes per element, little endian,
//! which always stays below the field modulus.

use crate::errors::ZkpError;
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use std::str::FromStr;

/// Bytes carried by one packed field element.
pub const BYTES_PER_FIELD: usize = 31;

/// Longest decimal representation of an element (r has 77 digits).
const MAX_DECIMAL_DIGITS: usize = 77;

/// Parse a canonical decimal field element.
///
/// Rejects empty strings, non-digits, leading zeros and values `>= r`.
pub fn parse_field_element(value: &str) -> Result<Fr, ZkpError> {
    let invalid = || ZkpError::InvalidFieldElement(truncate(value));

    if value.is_empty()
        || value.len() > MAX_DECIMAL_DIGITS
        || !value.bytes().all(|b| b.is_ascii_digit())
        || (value.len() > 1 && value.starts_with('0'))
    {
        return Err(invalid());
    }

    let element = Fr::from_str(value).map_err(|_| invalid())?;

    // FromStr reduces modulo r; a canonical input survives the round trip.
    if field_to_decimal(&element) != value {
        return Err(invalid());
    }

    Ok(element)
}

/// Canonical decimal representation.
pub fn field_to_decimal(element: &Fr) -> String {
    element.into_bigint().to_string()
}

/// Pack bytes into exactly `num_fields` elements, zero padded.
pub fn pack_bytes(bytes: &[u8], num_fields: usize) -> Result<Vec<Fr>, ZkpError> {
    let max = num_fields * BYTES_PER_FIELD;
    if bytes.len() > max {
        return Err(ZkpError::InputTooLong {
            len: bytes.len(),
            max,
        });
    }

    let mut fields: Vec<Fr> = bytes
        .chunks(BYTES_PER_FIELD)
        .map(Fr::from_le_bytes_mod_order)
        .collect();
    fields.resize(num_fields, Fr::from(0u64));
    Ok(fields)
}

/// Inverse of [`pack_bytes`]. Trailing zero padding is kept.
pub fn unpack_bytes(fields: &[Fr]) -> Result<Vec<u8>, ZkpError> {
    let mut out = Vec::with_capacity(fields.len() * BYTES_PER_FIELD);
    for field in fields {
        let le = field.into_bigint().to_bytes_le();
        if le[BYTES_PER_FIELD..].iter().any(|&b| b != 0) {
            return Err(ZkpError::NonCanonicalPacking);
        }
        out.extend_from_slice(&le[..BYTES_PER_FIELD]);
    }
    Ok(out)
}

fn truncate(value: &str) -> String {
    value.chars().take(16).collect()
}
