//! # Audience Keys
//!
//! Parses `publicKeyJWK` documents into verification keys and fixes the
//! algorithm each key is pinned to. The pinned algorithm is derived from the
//! key type, never from a token header.

use serde::Deserialize;
use shared_crypto::{
    decode_base64url, Ed25519PublicKey, Ed25519Signature, RsaVerifyingKey, Secp256k1PublicKey,
    Secp256k1Signature,
};

use super::errors::RegistryError;

/// Upper bound on a JWK document.
pub const MAX_JWK_BYTES: usize = 4 * 1024;

/// Asymmetric token algorithms an audience can be pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JwtAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,
    /// ECDSA over secp256k1 with SHA-256
    Es256k,
    /// Ed25519
    EdDsa,
}

impl JwtAlgorithm {
    /// JOSE `alg` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Es256k => "ES256K",
            Self::EdDsa => "EdDSA",
        }
    }
}

impl std::fmt::Display for JwtAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current verification key of an audience.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudienceKey {
    Rsa(RsaVerifyingKey),
    Secp256k1(Secp256k1PublicKey),
    Ed25519(Ed25519PublicKey),
}

impl AudienceKey {
    /// Algorithm this key is pinned to.
    pub fn algorithm(&self) -> JwtAlgorithm {
        match self {
            Self::Rsa(_) => JwtAlgorithm::Rs256,
            Self::Secp256k1(_) => JwtAlgorithm::Es256k,
            Self::Ed25519(_) => JwtAlgorithm::EdDsa,
        }
    }

    /// Check a JWS signature over `signing_input`.
    ///
    /// Returns `false` for any malformed signature; the caller has already
    /// pinned the algorithm.
    pub fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Rsa(key) => key.verify(signing_input, signature).is_ok(),
            Self::Secp256k1(key) => Secp256k1Signature::from_slice(signature)
                .and_then(|sig| key.verify_sha256(signing_input, &sig))
                .is_ok(),
            Self::Ed25519(key) => Ed25519Signature::from_slice(signature)
                .and_then(|sig| key.verify(signing_input, &sig))
                .is_ok(),
        }
    }

    /// Parse a JSON Web Key document.
    pub fn from_jwk(document: &str) -> Result<Self, RegistryError> {
        if document.len() > MAX_JWK_BYTES {
            return Err(RegistryError::InvalidKey(format!(
                "JWK of {} bytes exceeds {} bytes",
                document.len(),
                MAX_JWK_BYTES
            )));
        }

        let jwk: Jwk = serde_json::from_str(document)
            .map_err(|e| RegistryError::InvalidKey(format!("malformed JWK: {e}")))?;

        if let Some(key_use) = jwk.key_use.as_deref() {
            if key_use != "sig" {
                return Err(RegistryError::InvalidKey(format!(
                    "key use '{key_use}' is not 'sig'"
                )));
            }
        }

        let key = match (jwk.kty.as_str(), jwk.crv.as_deref()) {
            ("RSA", None) => {
                let n = component(&jwk.n, "n")?;
                let e = component(&jwk.e, "e")?;
                RsaVerifyingKey::from_components(&n, &e).map(Self::Rsa)
            }
            ("EC", Some("secp256k1")) => {
                let x = component(&jwk.x, "x")?;
                let y = component(&jwk.y, "y")?;
                Secp256k1PublicKey::from_coordinates(&x, &y).map(Self::Secp256k1)
            }
            ("OKP", Some("Ed25519")) => {
                let x = component(&jwk.x, "x")?;
                Ed25519PublicKey::from_slice(&x).map(Self::Ed25519)
            }
            (kty, crv) => {
                return Err(RegistryError::InvalidKey(format!(
                    "unsupported key type {kty} (curve {crv:?})"
                )))
            }
        }
        .map_err(|e| RegistryError::InvalidKey(e.to_string()))?;

        if let Some(alg) = jwk.alg.as_deref() {
            if alg != key.algorithm().as_str() {
                return Err(RegistryError::InvalidKey(format!(
                    "alg '{alg}' conflicts with {} key",
                    key.algorithm()
                )));
            }
        }

        Ok(key)
    }
}

#[derive(Deserialize)]
struct Jwk {
    kty: String,
    #[serde(default)]
    alg: Option<String>,
    #[serde(default)]
    crv: Option<String>,
    #[serde(default, rename = "use")]
    key_use: Option<String>,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

fn component(value: &Option<String>, name: &str) -> Result<Vec<u8>, RegistryError> {
    let encoded = value
        .as_deref()
        .ok_or_else(|| RegistryError::InvalidKey(format!("missing member '{name}'")))?;
    decode_base64url(encoded)
        .map_err(|e| RegistryError::InvalidKey(format!("member '{name}': {e}")))
}
