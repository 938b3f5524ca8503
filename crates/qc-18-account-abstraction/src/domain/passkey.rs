//! # Passkey Assertions
//!
//! WebAuthn-style assertions from platform authenticators with Ed25519
//! credentials. The signature covers
//! `authenticatorData || SHA-256(clientDataJSON)`, and the client data
//! carries the transaction digest as its challenge.

use serde::{Deserialize, Serialize};
use shared_crypto::{
    ct_eq, decode_base64url, encode_base64url, sha256, Ed25519PublicKey, Ed25519Signature, Hash,
};

use super::authenticator::Ceremony;
use super::errors::AuthError;

/// rpIdHash (32) + flags (1) + signCount (4).
pub const MIN_AUTHENTICATOR_DATA_LEN: usize = 37;

/// User-present flag in the authenticator data.
pub const FLAG_USER_PRESENT: u8 = 0x01;

const FLAGS_OFFSET: usize = 32;

/// Assertion produced by the authenticator; every field is base64url.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasskeyAssertion {
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
}

/// Registration credential: the new public key plus a creation assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasskeyRegistration {
    #[serde(rename = "publicKey")]
    pub public_key: String,
    pub assertion: PasskeyAssertion,
}

#[derive(Deserialize)]
struct ClientData {
    #[serde(rename = "type")]
    ceremony_type: String,
    challenge: String,
    origin: String,
}

/// Decode a base64url registration credential.
pub fn parse_registration(
    credential: &str,
    max_bytes: usize,
) -> Result<(Ed25519PublicKey, PasskeyAssertion), AuthError> {
    if credential.len() > max_bytes {
        return Err(AuthError::structural(format!(
            "passkey credential exceeds {max_bytes} bytes"
        )));
    }
    let json = decode_base64url(credential)
        .map_err(|_| AuthError::structural("passkey credential is not base64url"))?;
    let registration: PasskeyRegistration = serde_json::from_slice(&json)
        .map_err(|e| AuthError::structural(format!("malformed passkey registration: {e}")))?;

    let key_bytes = decode_base64url(&registration.public_key)
        .map_err(|_| AuthError::InvalidParameters("passkey public key is not base64url".into()))?;
    let public_key = Ed25519PublicKey::from_slice(&key_bytes)
        .map_err(|e| AuthError::InvalidParameters(format!("passkey public key: {e}")))?;

    Ok((public_key, registration.assertion))
}

/// Decode a JSON assertion from a transaction envelope.
pub fn parse_assertion(credential: &[u8], max_bytes: usize) -> Result<PasskeyAssertion, AuthError> {
    if credential.len() > max_bytes {
        return Err(AuthError::structural(format!(
            "passkey assertion exceeds {max_bytes} bytes"
        )));
    }
    serde_json::from_slice(credential)
        .map_err(|e| AuthError::structural(format!("malformed passkey assertion: {e}")))
}

/// Verify an assertion for `origin` over `digest`.
///
/// Order: structure, signature, ceremony type, origin, challenge.
pub fn verify_assertion(
    public_key: &Ed25519PublicKey,
    origin: &str,
    assertion: &PasskeyAssertion,
    ceremony: Ceremony,
    digest: &Hash,
) -> Result<(), AuthError> {
    let authenticator_data = decode_field(&assertion.authenticator_data, "authenticatorData")?;
    if authenticator_data.len() < MIN_AUTHENTICATOR_DATA_LEN {
        return Err(AuthError::structural(format!(
            "authenticator data shorter than {MIN_AUTHENTICATOR_DATA_LEN} bytes"
        )));
    }
    if authenticator_data[FLAGS_OFFSET] & FLAG_USER_PRESENT == 0 {
        return Err(AuthError::structural("user-present flag not set"));
    }

    let client_data_json = decode_field(&assertion.client_data_json, "clientDataJSON")?;
    let client_data: ClientData = serde_json::from_slice(&client_data_json)
        .map_err(|e| AuthError::structural(format!("malformed client data: {e}")))?;

    let signature = decode_field(&assertion.signature, "signature")
        .and_then(|bytes| {
            Ed25519Signature::from_slice(&bytes)
                .map_err(|_| AuthError::structural("passkey signature must be 64 bytes"))
        })?;

    let mut signed = authenticator_data;
    signed.extend_from_slice(&sha256(&client_data_json));
    public_key
        .verify(&signed, &signature)
        .map_err(|_| AuthError::SignatureInvalid)?;

    if client_data.ceremony_type != ceremony.webauthn_type() {
        return Err(AuthError::structural(format!(
            "client data type '{}' where '{}' was expected",
            client_data.ceremony_type,
            ceremony.webauthn_type()
        )));
    }
    if client_data.origin != origin {
        return Err(AuthError::OriginMismatch {
            expected: origin.to_string(),
            actual: client_data.origin,
        });
    }
    if !ct_eq(
        client_data.challenge.as_bytes(),
        encode_base64url(digest).as_bytes(),
    ) {
        return Err(AuthError::DigestMismatch);
    }
    Ok(())
}

fn decode_field(value: &str, name: &str) -> Result<Vec<u8>, AuthError> {
    decode_base64url(value).map_err(|_| AuthError::structural(format!("{name} is not base64url")))
}
