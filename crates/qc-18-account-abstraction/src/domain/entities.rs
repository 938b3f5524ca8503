//! # Domain Entities
//!
//! Registry records, registry transition events and the authorization verdict
//! handed to the fee pipeline.

use shared_types::AccountAddress;

use super::errors::AuthError;
use super::jwk::{AudienceKey, JwtAlgorithm};

/// Identifier of an authenticator within one account (the envelope's first byte).
pub type AuthenticatorId = u8;

/// Reservation of an audience name by its future owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudienceClaim {
    pub name: String,
    pub owner: AccountAddress,
}

/// Named, owned token-verification key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Audience {
    pub name: String,
    pub owner: AccountAddress,
    /// The key every verification reads; replaced in place on rotation
    pub key: AudienceKey,
    /// JWK document the key was parsed from
    pub public_key_jwk: String,
}

impl Audience {
    /// Algorithm tokens for this audience must use.
    pub fn pinned_algorithm(&self) -> JwtAlgorithm {
        self.key.algorithm()
    }
}

/// DKIM signing key of an email domain, keyed by (domain, selector).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DkimRecord {
    pub domain: String,
    pub selector: String,
    /// Base64 DKIM public key
    pub public_key: String,
    /// Canonical decimal field element committing to the key
    pub commitment: String,
}

/// Append-only log entry for every successful registry mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Claimed {
        name: String,
        owner: AccountAddress,
        height: u64,
    },
    Created {
        name: String,
        algorithm: JwtAlgorithm,
        height: u64,
    },
    Updated {
        name: String,
        algorithm: JwtAlgorithm,
        height: u64,
    },
    Deleted {
        name: String,
        height: u64,
    },
    DkimAdded {
        domain: String,
        selector: String,
        height: u64,
    },
    DkimRemoved {
        domain: String,
        selector: String,
        height: u64,
    },
}

impl RegistryEvent {
    /// Block height the transition was applied at.
    pub fn height(&self) -> u64 {
        match self {
            Self::Claimed { height, .. }
            | Self::Created { height, .. }
            | Self::Updated { height, .. }
            | Self::Deleted { height, .. }
            | Self::DkimAdded { height, .. }
            | Self::DkimRemoved { height, .. } => *height,
        }
    }
}

/// Verdict of one transaction authorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationResult {
    /// Whether the transaction is authorized
    pub valid: bool,
    /// Authenticator named by the envelope, if the envelope was readable
    pub authenticator_id: Option<AuthenticatorId>,
    /// Gas charged for the verification work
    pub gas_used: u64,
    /// Rejection reason
    pub error: Option<AuthError>,
}

impl AuthorizationResult {
    /// Accepted by the given authenticator.
    pub fn accepted(authenticator_id: AuthenticatorId, gas_used: u64) -> Self {
        Self {
            valid: true,
            authenticator_id: Some(authenticator_id),
            gas_used,
            error: None,
        }
    }

    /// Rejected with a typed error.
    pub fn rejected(
        authenticator_id: Option<AuthenticatorId>,
        gas_used: u64,
        error: AuthError,
    ) -> Self {
        Self {
            valid: false,
            authenticator_id,
            gas_used,
            error: Some(error),
        }
    }
}
