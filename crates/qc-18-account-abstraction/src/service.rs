//! # Account Abstraction Service
//!
//! Application service layer that implements the `AccountAuthApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`AccountAuthApi`)
//! - Uses the outbound ports (`RegistryReader`, `ProofVerifier`)
//! - Dispatches each envelope to the authenticator it names

use shared_types::{Timestamp, Transaction};
use tracing::{debug, info, warn};

use crate::config::{AuthConfig, ConfigError};
use crate::domain::account::AbstractAccount;
use crate::domain::authenticator::{Ceremony, VerificationContext};
use crate::domain::entities::{AuthenticatorId, AuthorizationResult};
use crate::domain::errors::AuthError;
use crate::domain::messages::{AccountMsg, AddAuthenticator};
use crate::ports::inbound::AccountAuthApi;
use crate::ports::outbound::{ProofVerifier, RegistryReader};

/// Account Abstraction Service.
///
/// Holds configuration and the email-circuit verifier. Registry state is
/// supplied per call so that simulations can run against snapshots.
pub struct AccountAbstractionService<P: ProofVerifier> {
    config: AuthConfig,
    proofs: P,
}

impl<P: ProofVerifier> AccountAbstractionService<P> {
    /// Create a new service.
    ///
    /// # Errors
    /// * `ConfigError` - `config` fails validation
    pub fn new(config: AuthConfig, proofs: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, proofs })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn context<'a>(
        &'a self,
        registry: &'a dyn RegistryReader,
        now: Timestamp,
        ceremony: Ceremony,
    ) -> VerificationContext<'a> {
        VerificationContext {
            registry,
            proofs: &self.proofs,
            config: &self.config,
            now,
            ceremony,
        }
    }
}

impl<P: ProofVerifier> AccountAuthApi for AccountAbstractionService<P> {
    fn instantiate_account(
        &self,
        address: &str,
        request: AddAuthenticator,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> Result<AbstractAccount, AuthError> {
        let ctx = self.context(registry, now, Ceremony::Registration);
        match AbstractAccount::instantiate(address, request, &ctx) {
            Ok(account) => {
                info!(account = %account.address(), "Abstract account instantiated");
                Ok(account)
            }
            Err(e) => {
                warn!(account = %address, kind = e.kind(), "Account instantiation rejected");
                Err(e)
            }
        }
    }

    fn authorize(
        &self,
        account: &AbstractAccount,
        tx: &Transaction,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> AuthorizationResult {
        let costs = &self.config.costs;

        let Some((&id, credential)) = tx.signature.split_first() else {
            return AuthorizationResult::rejected(
                None,
                0,
                AuthError::structural("empty signature envelope"),
            );
        };

        if &tx.sender != account.address() {
            return AuthorizationResult::rejected(
                Some(id),
                0,
                AuthError::structural("transaction sender is not this account"),
            );
        }

        let Some(authenticator) = account.authenticator(id) else {
            debug!(account = %account.address(), authenticator_id = id, "Unknown authenticator");
            return AuthorizationResult::rejected(
                Some(id),
                costs.lookup,
                AuthError::AuthenticatorNotFound(id),
            );
        };

        let kind = authenticator.kind();
        let gas_used = costs.for_kind(kind);
        let ctx = self.context(registry, now, Ceremony::Transaction);

        match authenticator.verify(&ctx, &tx.signing_digest(), credential) {
            Ok(()) => {
                debug!(
                    account = %account.address(),
                    authenticator_id = id,
                    kind = kind.as_str(),
                    sequence = tx.sequence,
                    "Transaction authorized"
                );
                AuthorizationResult::accepted(id, gas_used)
            }
            Err(e) => {
                warn!(
                    account = %account.address(),
                    authenticator_id = id,
                    kind = kind.as_str(),
                    reason = e.kind(),
                    "Transaction authorization rejected"
                );
                AuthorizationResult::rejected(Some(id), gas_used, e)
            }
        }
    }

    fn add_authenticator(
        &self,
        account: &mut AbstractAccount,
        request: AddAuthenticator,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> Result<AuthenticatorId, AuthError> {
        let ctx = self.context(registry, now, Ceremony::Registration);
        let id = account.add(request, &ctx).map_err(|e| {
            warn!(account = %account.address(), reason = e.kind(), "Authenticator rejected");
            e
        })?;

        if let Some(authenticator) = account.authenticator(id) {
            info!(
                account = %account.address(),
                authenticator_id = id,
                kind = authenticator.kind().as_str(),
                "Authenticator added"
            );
        }
        Ok(id)
    }

    fn remove_authenticator(
        &self,
        account: &mut AbstractAccount,
        id: AuthenticatorId,
    ) -> Result<(), AuthError> {
        let removed = account.remove(id).map_err(|e| {
            warn!(
                account = %account.address(),
                authenticator_id = id,
                reason = e.kind(),
                "Authenticator removal rejected"
            );
            e
        })?;

        info!(
            account = %account.address(),
            authenticator_id = id,
            kind = removed.kind().as_str(),
            remaining = account.len(),
            "Authenticator removed"
        );
        Ok(())
    }

    fn execute(
        &self,
        account: &mut AbstractAccount,
        tx: &Transaction,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> Result<(), AuthError> {
        let result = self.authorize(account, tx, registry, now);
        if let Some(error) = result.error {
            return Err(error);
        }

        let msg: AccountMsg = serde_json::from_slice(&tx.body).map_err(|e| {
            warn!(account = %account.address(), error = %e, "Transaction body is not an account message");
            AuthError::structural(format!("transaction body is not an account message: {e}"))
        })?;

        match msg {
            AccountMsg::AddAuthMethod { add_authenticator } => self
                .add_authenticator(account, add_authenticator, registry, now)
                .map(|_| ()),
            AccountMsg::RemoveAuthMethod { id } => self.remove_authenticator(account, id),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
