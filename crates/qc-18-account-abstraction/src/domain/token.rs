//! # Token Structural Parser
//!
//! Splits a compact token into its three segments, bounds its size and
//! decodes header and payload into JSON objects. Nothing here looks at
//! claim values or touches key material.

use serde_json::{Map, Value};
use shared_crypto::decode_base64url;

use super::errors::AuthError;

/// Compact token segments: header, payload, signature.
pub const TOKEN_SEGMENTS: usize = 3;

/// Structurally valid compact token.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedToken {
    /// Decoded header object
    pub header: Map<String, Value>,
    /// Decoded payload object
    pub payload: Map<String, Value>,
    /// `b64(header).b64(payload)`, the bytes the signature covers
    pub signing_input: String,
    /// Decoded signature (may be empty, e.g. for `alg: none`)
    pub signature: Vec<u8>,
}

impl ParsedToken {
    /// Header `alg` if it is a string.
    pub fn algorithm(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }
}

/// Parse a compact token of at most `max_bytes`.
///
/// # Errors
/// * `AuthError::Structural` - Empty, oversized, non-UTF-8, wrong segment
///   count, bad base64url or non-object JSON
pub fn parse_token(raw: &[u8], max_bytes: usize) -> Result<ParsedToken, AuthError> {
    if raw.is_empty() {
        return Err(AuthError::structural("empty token"));
    }
    if raw.len() > max_bytes {
        return Err(AuthError::structural(format!(
            "token of {} bytes exceeds {max_bytes} bytes",
            raw.len()
        )));
    }

    let text =
        std::str::from_utf8(raw).map_err(|_| AuthError::structural("token is not UTF-8"))?;
    let text = text.trim();

    let segments: Vec<&str> = text.split('.').collect();
    if segments.len() != TOKEN_SEGMENTS {
        return Err(AuthError::structural(format!(
            "expected {TOKEN_SEGMENTS} segments, found {}",
            segments.len()
        )));
    }

    let header = decode_object(segments[0], "header")?;
    let payload = decode_object(segments[1], "payload")?;
    let signature = decode_base64url(segments[2])
        .map_err(|_| AuthError::structural("signature segment is not base64url"))?;

    Ok(ParsedToken {
        header,
        payload,
        signing_input: format!("{}.{}", segments[0], segments[1]),
        signature,
    })
}

fn decode_object(segment: &str, name: &str) -> Result<Map<String, Value>, AuthError> {
    if segment.is_empty() {
        return Err(AuthError::structural(format!("{name} segment is empty")));
    }
    let bytes = decode_base64url(segment)
        .map_err(|_| AuthError::structural(format!("{name} segment is not base64url")))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AuthError::structural(format!("{name} is not a JSON object"))),
        Err(_) => Err(AuthError::structural(format!("{name} is not valid JSON"))),
    }
}
