//! # Token Verification Pipeline
//!
//! ```text
//! Parse/StructuralCheck → ClaimPresence/TypeCheck → TimeWindowCheck
//!     → AudienceLookup → AlgorithmPin → SignatureVerify
//!     → SubjectAudienceMatch → DigestBindCheck → Accept
//! ```
//!
//! Each stage is terminal on failure. The algorithm comparison happens in
//! exactly one place, [`pin_algorithm`], before any key is used.

use shared_crypto::{ct_eq, Hash};
use shared_types::Timestamp;
use tracing::debug;

use super::claims::TokenClaims;
use super::errors::AuthError;
use super::jwk::JwtAlgorithm;
use super::token::parse_token;
use crate::config::AuthConfig;
use crate::ports::outbound::RegistryReader;

/// Reject any token algorithm other than the audience's pinned one.
///
/// Covers a missing header, `none`, symmetric algorithms and any other
/// asymmetric algorithm.
pub fn pin_algorithm(token_alg: Option<&str>, pinned: JwtAlgorithm) -> Result<(), AuthError> {
    match token_alg {
        Some(alg) if alg == pinned.as_str() => Ok(()),
        found => Err(AuthError::Algorithm {
            found: found.map(str::to_string),
            pinned: pinned.as_str(),
        }),
    }
}

/// Token pipeline bound to one evaluation context.
pub struct TokenVerifier<'a> {
    registry: &'a dyn RegistryReader,
    config: &'a AuthConfig,
    now: Timestamp,
}

impl<'a> TokenVerifier<'a> {
    pub fn new(registry: &'a dyn RegistryReader, config: &'a AuthConfig, now: Timestamp) -> Self {
        Self {
            registry,
            config,
            now,
        }
    }

    /// Run the full pipeline for an authenticator registered with
    /// (`expected_sub`, `expected_aud`) against `digest`.
    pub fn verify(
        &self,
        raw: &[u8],
        expected_sub: &str,
        expected_aud: &str,
        digest: &Hash,
    ) -> Result<TokenClaims, AuthError> {
        let token = parse_token(raw, self.config.max_token_bytes)?;

        let claims = TokenClaims::from_payload(&token.payload)?;
        claims.check_time_window(self.now, self.config.clock_skew_secs)?;

        let audience = self
            .registry
            .audience(&claims.aud)
            .ok_or_else(|| AuthError::AudienceNotFound(claims.aud.clone()))?;

        pin_algorithm(token.algorithm(), audience.pinned_algorithm())?;

        if !audience
            .key
            .verify(token.signing_input.as_bytes(), &token.signature)
        {
            return Err(AuthError::SignatureInvalid);
        }

        if claims.sub != expected_sub || claims.aud != expected_aud {
            return Err(AuthError::SubjectAudienceMismatch);
        }

        if !ct_eq(&claims.transaction_hash, digest) {
            return Err(AuthError::DigestMismatch);
        }

        debug!(
            audience = %claims.aud,
            algorithm = %audience.pinned_algorithm(),
            "Token verified"
        );
        Ok(claims)
    }
}
