//! # Authorization Errors
//!
//! Error taxonomy for credential verification, authenticator management and
//! registry transitions. Every rejection carries a stable kind string so the
//! ledger can report it without matching on messages.

use shared_types::AddressError;
use thiserror::Error;

use super::entities::AuthenticatorId;

/// Errors raised while verifying a credential or managing an authenticator set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Credential is malformed (size, encoding, segment count, JSON shape)
    #[error("Malformed credential: {0}")]
    Structural(String),

    /// A required claim is missing or has the wrong type
    #[error("Invalid claim '{claim}': {reason}")]
    Claim { claim: String, reason: String },

    /// Token algorithm is missing or differs from the audience's pinned algorithm
    #[error("Algorithm rejected: token uses {found:?}, audience is pinned to {pinned}")]
    Algorithm {
        found: Option<String>,
        pinned: &'static str,
    },

    /// Evaluation time falls outside the credential's validity window
    #[error("Credential not valid at {now} (nbf {not_before}, exp {expires}, iat {issued_at})")]
    Expired {
        now: u64,
        not_before: u64,
        expires: u64,
        issued_at: u64,
    },

    /// No active audience under the token's `aud`
    #[error("Audience not found: {0}")]
    AudienceNotFound(String),

    /// No active DKIM record carries the proven commitment
    #[error("No active DKIM record for commitment {0}")]
    CommitmentNotFound(String),

    /// Token `sub`/`aud` differ from the authenticator's registered pair
    #[error("Token subject/audience does not match the authenticator")]
    SubjectAudienceMismatch,

    /// Cryptographic signature check failed
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// Zero-knowledge proof check failed
    #[error("Proof verification failed")]
    ProofInvalid,

    /// Credential is bound to a different transaction
    #[error("Credential is bound to a different transaction digest")]
    DigestMismatch,

    /// Proven account salt differs from the authenticator's salt
    #[error("Email salt does not match the authenticator")]
    SaltMismatch,

    /// Proven email host is not in the authenticator's allow-list
    #[error("Email host '{0}' is not allowed")]
    HostNotAllowed(String),

    /// Passkey client data was produced for a different origin
    #[error("Passkey origin mismatch: expected '{expected}', got '{actual}'")]
    OriginMismatch { expected: String, actual: String },

    /// Removing the authenticator would leave the account without any
    #[error("Cannot remove the last authenticator of an account")]
    Lockout,

    /// No authenticator stored under the referenced id
    #[error("Authenticator {0} not found")]
    AuthenticatorNotFound(AuthenticatorId),

    /// Requested authenticator id is already in use
    #[error("Authenticator id {0} is already in use")]
    AuthenticatorIdTaken(AuthenticatorId),

    /// Every authenticator id has been handed out
    #[error("Authenticator ids exhausted")]
    AuthenticatorIdsExhausted,

    /// Registration parameters are invalid (bad key, empty allow-list, bad salt)
    #[error("Invalid authenticator parameters: {0}")]
    InvalidParameters(String),

    /// Account address failed validation
    #[error("Invalid account address: {0}")]
    InvalidAddress(#[from] AddressError),
}

impl AuthError {
    /// Stable machine-readable kind of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structural(_) => "structural_error",
            Self::Claim { .. } => "claim_error",
            Self::Algorithm { .. } => "algorithm_error",
            Self::Expired { .. } => "expiry_error",
            Self::AudienceNotFound(_) => "audience_not_found",
            Self::CommitmentNotFound(_) => "commitment_not_found",
            Self::SubjectAudienceMismatch => "subject_audience_mismatch",
            Self::SignatureInvalid => "signature_invalid",
            Self::ProofInvalid => "proof_invalid",
            Self::DigestMismatch => "digest_mismatch",
            Self::SaltMismatch => "salt_mismatch",
            Self::HostNotAllowed(_) => "host_not_allowed",
            Self::OriginMismatch { .. } => "origin_mismatch",
            Self::Lockout => "lockout",
            Self::AuthenticatorNotFound(_) => "authenticator_not_found",
            Self::AuthenticatorIdTaken(_) => "authenticator_id_taken",
            Self::AuthenticatorIdsExhausted => "authenticator_ids_exhausted",
            Self::InvalidParameters(_) => "invalid_parameters",
            Self::InvalidAddress(_) => "invalid_address",
        }
    }

    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        Self::Structural(reason.into())
    }

    pub(crate) fn claim(claim: &str, reason: impl Into<String>) -> Self {
        Self::Claim {
            claim: claim.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by registry transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Audience name is already claimed by another owner
    #[error("Audience name '{0}' is already claimed")]
    NameTaken(String),

    /// Caller holds no claim on the audience name
    #[error("Audience name '{0}' must be claimed by the caller first")]
    ClaimRequired(String),

    /// An audience is already active under the name
    #[error("Audience '{0}' is already active")]
    AlreadyActive(String),

    /// Caller does not own the audience
    #[error("Caller does not own audience '{0}'")]
    Unauthorized(String),

    /// Caller is not the DKIM registry authority
    #[error("Caller '{0}' is not the DKIM registry authority")]
    NotAuthority(String),

    /// No audience under the name
    #[error("Audience not found: {0}")]
    AudienceNotFound(String),

    /// Audience name is empty, too long or contains whitespace
    #[error("Invalid audience name: {0}")]
    InvalidName(String),

    /// JWK cannot be turned into a verification key
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    /// No DKIM record under the (domain, selector) key
    #[error("DKIM record not found: {domain}/{selector}")]
    DkimRecordNotFound { domain: String, selector: String },

    /// DKIM record fields are empty or malformed
    #[error("Invalid DKIM record: {0}")]
    InvalidDkimRecord(String),
}

impl RegistryError {
    /// Stable machine-readable kind of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameTaken(_) => "name_taken",
            Self::ClaimRequired(_) => "claim_required",
            Self::AlreadyActive(_) => "already_active",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotAuthority(_) => "not_authority",
            Self::AudienceNotFound(_) => "audience_not_found",
            Self::InvalidName(_) => "invalid_name",
            Self::InvalidKey(_) => "invalid_key",
            Self::DkimRecordNotFound { .. } => "dkim_record_not_found",
            Self::InvalidDkimRecord(_) => "invalid_dkim_record",
        }
    }
}
