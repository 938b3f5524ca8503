//! # Authenticators
//!
//! The closed set of credential types an account can hold. Each variant
//! exposes the same capability, [`Authenticator::verify`], dispatched by
//! `match`.

use qc_zkp::parse_field_element;
use shared_crypto::{
    decode_base64_lenient, Ed25519PublicKey, Ed25519Signature, Hash, Secp256k1PublicKey,
    Secp256k1Signature,
};
use shared_types::Timestamp;

use super::errors::AuthError;
use super::jwt::TokenVerifier;
use super::messages::AddAuthenticator;
use super::passkey::{parse_assertion, parse_registration, verify_assertion};
use super::zkemail::{normalize_host, EmailVerifier};
use crate::config::AuthConfig;
use crate::ports::outbound::{ProofVerifier, RegistryReader};

/// Maximum number of hosts in a ZK-email allow-list.
pub const MAX_ALLOWED_HOSTS: usize = 32;

/// What a credential is being verified for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ceremony {
    /// Bootstrap credential of a new authenticator
    Registration,
    /// Authorization of a transaction
    Transaction,
}

impl Ceremony {
    /// WebAuthn client-data type expected for this ceremony.
    pub fn webauthn_type(&self) -> &'static str {
        match self {
            Self::Registration => "webauthn.create",
            Self::Transaction => "webauthn.get",
        }
    }
}

/// Authenticator family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthenticatorKind {
    KeyBased,
    TokenBased,
    PasskeyBased,
    ZkEmailBased,
}

impl AuthenticatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyBased => "key",
            Self::TokenBased => "token",
            Self::PasskeyBased => "passkey",
            Self::ZkEmailBased => "zk_email",
        }
    }
}

/// Everything a verification may read besides the credential itself.
#[derive(Clone, Copy)]
pub struct VerificationContext<'a> {
    pub registry: &'a dyn RegistryReader,
    pub proofs: &'a dyn ProofVerifier,
    pub config: &'a AuthConfig,
    /// Block time
    pub now: Timestamp,
    pub ceremony: Ceremony,
}

/// One credential bound to an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authenticator {
    Secp256K1 {
        pubkey: Secp256k1PublicKey,
    },
    Ed25519 {
        pubkey: Ed25519PublicKey,
    },
    Jwt {
        sub: String,
        aud: String,
    },
    Passkey {
        url: String,
        public_key: Ed25519PublicKey,
    },
    ZkEmail {
        email_salt: String,
        allowed_email_hosts: Vec<String>,
    },
}

impl Authenticator {
    pub fn kind(&self) -> AuthenticatorKind {
        match self {
            Self::Secp256K1 { .. } | Self::Ed25519 { .. } => AuthenticatorKind::KeyBased,
            Self::Jwt { .. } => AuthenticatorKind::TokenBased,
            Self::Passkey { .. } => AuthenticatorKind::PasskeyBased,
            Self::ZkEmail { .. } => AuthenticatorKind::ZkEmailBased,
        }
    }

    /// Verify `credential` against `digest`.
    pub fn verify(
        &self,
        ctx: &VerificationContext<'_>,
        digest: &Hash,
        credential: &[u8],
    ) -> Result<(), AuthError> {
        match self {
            Self::Secp256K1 { pubkey } => {
                let signature = Secp256k1Signature::from_slice(credential)
                    .map_err(|_| AuthError::structural("secp256k1 signature must be 64 bytes"))?;
                pubkey
                    .verify_prehash(digest, &signature)
                    .map_err(|_| AuthError::SignatureInvalid)
            }
            Self::Ed25519 { pubkey } => {
                let signature = Ed25519Signature::from_slice(credential)
                    .map_err(|_| AuthError::structural("ed25519 signature must be 64 bytes"))?;
                pubkey
                    .verify(digest, &signature)
                    .map_err(|_| AuthError::SignatureInvalid)
            }
            Self::Jwt { sub, aud } => TokenVerifier::new(ctx.registry, ctx.config, ctx.now)
                .verify(credential, sub, aud, digest)
                .map(|_| ()),
            Self::Passkey { url, public_key } => {
                let assertion = parse_assertion(credential, ctx.config.max_passkey_bytes)?;
                verify_assertion(public_key, url, &assertion, ctx.ceremony, digest)
            }
            Self::ZkEmail {
                email_salt,
                allowed_email_hosts,
            } => EmailVerifier::new(ctx.registry, ctx.proofs, ctx.config)
                .verify(credential, email_salt, allowed_email_hosts, digest)
                .map(|_| ()),
        }
    }

    /// Split a registration payload into the authenticator and its
    /// bootstrap credential. Parameters are validated; the credential is not.
    pub fn from_request(
        request: AddAuthenticator,
        config: &AuthConfig,
    ) -> Result<(Self, Vec<u8>), AuthError> {
        match request {
            AddAuthenticator::Secp256K1 {
                pubkey, signature, ..
            } => {
                let bytes = decode_key(&pubkey)?;
                let pubkey = Secp256k1PublicKey::from_sec1(&bytes)
                    .map_err(|e| AuthError::InvalidParameters(format!("secp256k1 key: {e}")))?;
                Ok((Self::Secp256K1 { pubkey }, decode_credential(&signature)?))
            }
            AddAuthenticator::Ed25519 {
                pubkey, signature, ..
            } => {
                let bytes = decode_key(&pubkey)?;
                let pubkey = Ed25519PublicKey::from_slice(&bytes)
                    .map_err(|e| AuthError::InvalidParameters(format!("ed25519 key: {e}")))?;
                Ok((Self::Ed25519 { pubkey }, decode_credential(&signature)?))
            }
            AddAuthenticator::Jwt { sub, aud, token, .. } => {
                if sub.is_empty() || aud.is_empty() {
                    return Err(AuthError::InvalidParameters(
                        "token authenticator needs a subject and an audience".into(),
                    ));
                }
                Ok((Self::Jwt { sub, aud }, token.into_bytes()))
            }
            AddAuthenticator::Passkey {
                url, credential, ..
            } => {
                if url.trim().is_empty() {
                    return Err(AuthError::InvalidParameters("passkey url is empty".into()));
                }
                let (public_key, assertion) =
                    parse_registration(&credential, config.max_passkey_bytes)?;
                let bootstrap = serde_json::to_vec(&assertion)
                    .map_err(|e| AuthError::structural(e.to_string()))?;
                Ok((Self::Passkey { url, public_key }, bootstrap))
            }
            AddAuthenticator::ZkEmail {
                email_salt,
                allowed_email_hosts,
                signature,
                ..
            } => {
                parse_field_element(&email_salt)
                    .map_err(|e| AuthError::InvalidParameters(format!("email salt: {e}")))?;
                let allowed_email_hosts = validate_hosts(allowed_email_hosts)?;
                Ok((
                    Self::ZkEmail {
                        email_salt,
                        allowed_email_hosts,
                    },
                    decode_credential(&signature)?,
                ))
            }
        }
    }
}

fn decode_key(encoded: &str) -> Result<Vec<u8>, AuthError> {
    decode_base64_lenient(encoded)
        .map_err(|_| AuthError::InvalidParameters("public key is not base64".into()))
}

fn decode_credential(encoded: &str) -> Result<Vec<u8>, AuthError> {
    decode_base64_lenient(encoded).map_err(|_| AuthError::structural("credential is not base64"))
}

fn validate_hosts(hosts: Vec<String>) -> Result<Vec<String>, AuthError> {
    if hosts.is_empty() || hosts.len() > MAX_ALLOWED_HOSTS {
        return Err(AuthError::InvalidParameters(format!(
            "allowed email hosts must list 1..={MAX_ALLOWED_HOSTS} hosts"
        )));
    }
    let mut normalized: Vec<String> = Vec::with_capacity(hosts.len());
    for host in &hosts {
        let host = normalize_host(host);
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(AuthError::InvalidParameters(format!(
                "invalid email host '{host}'"
            )));
        }
        if !normalized.contains(&host) {
            normalized.push(host);
        }
    }
    Ok(normalized)
}
