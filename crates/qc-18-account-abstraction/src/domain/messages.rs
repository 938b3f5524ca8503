//! # Message Payloads
//!
//! JSON shapes of registry-management and authenticator-management requests.

use serde::{Deserialize, Serialize};

use super::entities::AuthenticatorId;

/// `{aud}`: reserve an audience name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAudience {
    pub aud: String,
}

/// `{aud, publicKeyJWK}`: activate a claimed audience.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAudience {
    pub aud: String,
    #[serde(rename = "publicKeyJWK")]
    pub public_key_jwk: String,
}

/// `{aud, publicKeyJWK}`: rotate an audience key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAudience {
    pub aud: String,
    #[serde(rename = "publicKeyJWK")]
    pub public_key_jwk: String,
}

/// `{aud}`: delete an audience.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteAudience {
    pub aud: String,
}

/// One DKIM record of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkimRecordInput {
    pub domain: String,
    pub selector: String,
    #[serde(rename = "publicKey")]
    pub public_key: String,
    pub commitment: String,
}

/// `{authority, records}`: add or replace DKIM records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddDkimRecords {
    pub authority: String,
    pub records: Vec<DkimRecordInput>,
}

/// `{authority, domain, selector}`: remove one DKIM record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRemoveDkimRecord {
    pub authority: String,
    pub domain: String,
    pub selector: String,
}

/// Authenticator registration payload.
///
/// Every variant carries a bootstrap credential over the account's
/// bootstrap digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddAuthenticator {
    /// Compressed secp256k1 key (base64) and a 64-byte signature (base64)
    Secp256K1 {
        #[serde(default)]
        id: Option<AuthenticatorId>,
        pubkey: String,
        signature: String,
    },
    /// Ed25519 key (base64) and a 64-byte signature (base64)
    Ed25519 {
        #[serde(default)]
        id: Option<AuthenticatorId>,
        pubkey: String,
        signature: String,
    },
    /// Token subject and audience plus a compact token
    Jwt {
        #[serde(default)]
        id: Option<AuthenticatorId>,
        sub: String,
        aud: String,
        token: String,
    },
    /// Relying-party origin plus a base64url registration credential
    Passkey {
        #[serde(default)]
        id: Option<AuthenticatorId>,
        url: String,
        credential: String,
    },
    /// Account salt, host allow-list and a base64 proof envelope
    #[serde(rename = "ZKEmail")]
    ZkEmail {
        #[serde(default)]
        id: Option<AuthenticatorId>,
        email_salt: String,
        allowed_email_hosts: Vec<String>,
        signature: String,
    },
}

impl AddAuthenticator {
    /// Explicitly requested id.
    pub fn id(&self) -> Option<AuthenticatorId> {
        match self {
            Self::Secp256K1 { id, .. }
            | Self::Ed25519 { id, .. }
            | Self::Jwt { id, .. }
            | Self::Passkey { id, .. }
            | Self::ZkEmail { id, .. } => *id,
        }
    }
}

/// Authenticator-management messages executed by an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountMsg {
    AddAuthMethod { add_authenticator: AddAuthenticator },
    RemoveAuthMethod { id: AuthenticatorId },
}
