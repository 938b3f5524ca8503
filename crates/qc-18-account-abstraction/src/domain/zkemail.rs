//! # ZK-Email Verification Pipeline
//!
//! ```text
//! Parse envelope → StructuralCheck → ProofVerify → ExtractPublicInputs
//!     → CommitmentLookup → SaltMatch → HostAllowlistCheck → DigestBindCheck
//! ```
//!
//! ## Public input layout
//!
//! | Index | Content |
//! |-------|---------|
//! | 0..9 | sender host, 31 bytes per element, little endian |
//! | 9 | DKIM key commitment |
//! | 10..12 | transaction digest, packed like the host |
//! | 12 | account salt |

use qc_zkp::{field_to_decimal, parse_field_element, unpack_bytes, Fr};
use serde::{Deserialize, Serialize};
use shared_crypto::{ct_eq, decode_base64_lenient, Hash};
use tracing::debug;

use super::errors::AuthError;
use crate::config::AuthConfig;
use crate::ports::outbound::{ProofVerifier, RegistryReader};

pub const HOST_FIELDS: usize = 9;
pub const COMMITMENT_INDEX: usize = 9;
pub const DIGEST_FIELDS: usize = 2;
pub const DIGEST_OFFSET: usize = 10;
pub const SALT_INDEX: usize = 12;
pub const PUBLIC_INPUT_COUNT: usize = 13;

/// `{proof, publicInputs}` envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCredential {
    /// Base64 compressed Groth16 proof
    pub proof: String,
    /// Decimal field elements
    #[serde(rename = "publicInputs")]
    pub public_inputs: Vec<String>,
}

/// Values the proof attests to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailPublicInputs {
    pub host: String,
    /// Canonical decimal commitment
    pub commitment: String,
    pub digest: Hash,
    pub salt: Fr,
}

impl EmailPublicInputs {
    /// Decode the fixed layout.
    pub fn from_fields(fields: &[Fr]) -> Result<Self, AuthError> {
        if fields.len() != PUBLIC_INPUT_COUNT {
            return Err(AuthError::structural(format!(
                "expected {PUBLIC_INPUT_COUNT} public inputs, found {}",
                fields.len()
            )));
        }

        let host_bytes = unpack_bytes(&fields[..HOST_FIELDS])
            .map_err(|e| AuthError::structural(format!("email host: {e}")))?;
        let host_len = host_bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let host = std::str::from_utf8(&host_bytes[..host_len])
            .map_err(|_| AuthError::structural("email host is not UTF-8"))?;
        if host.is_empty() {
            return Err(AuthError::structural("email host is empty"));
        }

        let digest_bytes = unpack_bytes(&fields[DIGEST_OFFSET..DIGEST_OFFSET + DIGEST_FIELDS])
            .map_err(|e| AuthError::structural(format!("transaction digest: {e}")))?;
        let (digest, padding) = digest_bytes.split_at(32);
        if padding.iter().any(|&b| b != 0) {
            return Err(AuthError::structural("transaction digest padding is not zero"));
        }
        let digest = Hash::try_from(digest)
            .map_err(|_| AuthError::structural("transaction digest is not 32 bytes"))?;

        Ok(Self {
            host: host.to_string(),
            commitment: field_to_decimal(&fields[COMMITMENT_INDEX]),
            digest,
            salt: fields[SALT_INDEX],
        })
    }
}

/// Normalize an allow-list entry or proven host for comparison.
pub fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}

/// ZK-email pipeline bound to one evaluation context.
pub struct EmailVerifier<'a> {
    registry: &'a dyn RegistryReader,
    proofs: &'a dyn ProofVerifier,
    config: &'a AuthConfig,
}

impl<'a> EmailVerifier<'a> {
    pub fn new(
        registry: &'a dyn RegistryReader,
        proofs: &'a dyn ProofVerifier,
        config: &'a AuthConfig,
    ) -> Self {
        Self {
            registry,
            proofs,
            config,
        }
    }

    /// Run the full pipeline for an authenticator with `email_salt` and
    /// `allowed_hosts` against `digest`.
    pub fn verify(
        &self,
        credential: &[u8],
        email_salt: &str,
        allowed_hosts: &[String],
        digest: &Hash,
    ) -> Result<EmailPublicInputs, AuthError> {
        if credential.is_empty() || credential.len() > self.config.max_proof_bytes {
            return Err(AuthError::structural(format!(
                "email credential must be 1..={} bytes",
                self.config.max_proof_bytes
            )));
        }
        let envelope: EmailCredential = serde_json::from_slice(credential)
            .map_err(|e| AuthError::structural(format!("malformed email credential: {e}")))?;

        if envelope.public_inputs.len() != PUBLIC_INPUT_COUNT {
            return Err(AuthError::structural(format!(
                "expected {PUBLIC_INPUT_COUNT} public inputs, found {}",
                envelope.public_inputs.len()
            )));
        }
        let fields = envelope
            .public_inputs
            .iter()
            .map(|value| parse_field_element(value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AuthError::structural(format!("public input: {e}")))?;
        let proof = decode_base64_lenient(&envelope.proof)
            .map_err(|_| AuthError::structural("proof is not base64"))?;

        self.proofs.verify(&proof, &fields).map_err(|e| {
            debug!(error = %e, "Email proof rejected");
            AuthError::ProofInvalid
        })?;

        let inputs = EmailPublicInputs::from_fields(&fields)?;

        if self.registry.dkim_by_commitment(&inputs.commitment).is_none() {
            return Err(AuthError::CommitmentNotFound(inputs.commitment));
        }

        let salt_matches = parse_field_element(email_salt)
            .map(|salt| salt == inputs.salt)
            .unwrap_or(false);
        if !salt_matches {
            return Err(AuthError::SaltMismatch);
        }

        let host = normalize_host(&inputs.host);
        if !allowed_hosts.iter().any(|allowed| normalize_host(allowed) == host) {
            return Err(AuthError::HostNotAllowed(inputs.host));
        }

        if !ct_eq(&inputs.digest, digest) {
            return Err(AuthError::DigestMismatch);
        }

        debug!(host = %host, "Email proof verified");
        Ok(inputs)
    }
}
