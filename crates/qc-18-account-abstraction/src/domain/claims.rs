//! # Claim Validator
//!
//! Presence and type checks of the required claims, and the validity
//! window. Runs before any cryptographic work.

use serde_json::{Map, Value};
use shared_crypto::{decode_base64_lenient, Hash};
use shared_types::Timestamp;

use super::errors::AuthError;

/// Claim carrying the bound transaction digest.
pub const TRANSACTION_HASH_CLAIM: &str = "transaction_hash";

/// Validated, typed token claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub exp: u64,
    pub nbf: u64,
    pub iat: u64,
    /// Digest the token is bound to
    pub transaction_hash: Hash,
}

impl TokenClaims {
    /// Extract the required claims from a decoded payload.
    ///
    /// # Errors
    /// * `AuthError::Claim` - Missing, null, empty or mistyped claim
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, AuthError> {
        let sub = string_claim(payload, "sub")?;
        let aud = string_claim(payload, "aud")?;
        let iss = string_claim(payload, "iss")?;
        let exp = time_claim(payload, "exp")?;
        let nbf = time_claim(payload, "nbf")?;
        let iat = time_claim(payload, "iat")?;

        let encoded = string_claim(payload, TRANSACTION_HASH_CLAIM)?;
        let transaction_hash = decode_base64_lenient(&encoded)
            .ok()
            .and_then(|bytes| Hash::try_from(bytes.as_slice()).ok())
            .ok_or_else(|| AuthError::claim(TRANSACTION_HASH_CLAIM, "not a base64 32-byte digest"))?;

        Ok(Self {
            sub,
            aud,
            iss,
            exp,
            nbf,
            iat,
            transaction_hash,
        })
    }

    /// Check `nbf - skew <= now <= exp + skew` and `iat <= now + skew`.
    ///
    /// # Errors
    /// * `AuthError::Expired` - Outside the window
    pub fn check_time_window(&self, now: Timestamp, skew: u64) -> Result<(), AuthError> {
        let not_yet_valid = now.saturating_add(skew) < self.nbf;
        let expired = now > self.exp.saturating_add(skew);
        let issued_in_future = self.iat > now.saturating_add(skew);

        if not_yet_valid || expired || issued_in_future {
            return Err(AuthError::Expired {
                now,
                not_before: self.nbf,
                expires: self.exp,
                issued_at: self.iat,
            });
        }
        Ok(())
    }
}

fn string_claim(payload: &Map<String, Value>, name: &str) -> Result<String, AuthError> {
    match payload.get(name) {
        None | Some(Value::Null) => Err(AuthError::claim(name, "missing")),
        Some(Value::String(value)) if value.is_empty() => Err(AuthError::claim(name, "empty")),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(AuthError::claim(name, "expected a string")),
    }
}

fn time_claim(payload: &Map<String, Value>, name: &str) -> Result<u64, AuthError> {
    match payload.get(name) {
        None | Some(Value::Null) => Err(AuthError::claim(name, "missing")),
        Some(Value::Number(number)) => number
            .as_u64()
            .ok_or_else(|| AuthError::claim(name, "expected a non-negative integer")),
        Some(_) => Err(AuthError::claim(name, "expected a number")),
    }
}
