//! # Authenticator Set Manager
//!
//! An abstract account and its ordered set of authenticators.
//!
//! ## Invariants
//!
//! - The set is never empty once the account exists
//! - Ids are unique and immutable; an id is never handed out twice, even
//!   after its authenticator was removed

use std::collections::{BTreeMap, BTreeSet};

use shared_crypto::{sha256, Hash};
use shared_types::AccountAddress;

use super::authenticator::{Authenticator, Ceremony, VerificationContext};
use super::entities::AuthenticatorId;
use super::errors::AuthError;
use super::messages::AddAuthenticator;

/// Programmable account controlled by its authenticators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbstractAccount {
    address: AccountAddress,
    authenticators: BTreeMap<AuthenticatorId, Authenticator>,
    /// Ids of removed authenticators
    retired: BTreeSet<AuthenticatorId>,
    /// Next id to assign; 256 once every id has been used
    next_id: u16,
}

impl AbstractAccount {
    /// Create an account from its first authenticator.
    ///
    /// `ctx.ceremony` is forced to [`Ceremony::Registration`].
    pub fn instantiate(
        address: &str,
        request: AddAuthenticator,
        ctx: &VerificationContext<'_>,
    ) -> Result<Self, AuthError> {
        let address = AccountAddress::parse(address, &ctx.config.address_prefix)?;
        let mut account = Self {
            address,
            authenticators: BTreeMap::new(),
            retired: BTreeSet::new(),
            next_id: 0,
        };
        account.add(request, ctx)?;
        Ok(account)
    }

    pub fn address(&self) -> &AccountAddress {
        &self.address
    }

    /// Digest every bootstrap credential of this account must cover.
    pub fn bootstrap_digest(&self) -> Hash {
        sha256(self.address.as_bytes())
    }

    pub fn authenticator(&self, id: AuthenticatorId) -> Option<&Authenticator> {
        self.authenticators.get(&id)
    }

    /// Authenticators in id order.
    pub fn authenticators(&self) -> impl Iterator<Item = (AuthenticatorId, &Authenticator)> {
        self.authenticators.iter().map(|(id, auth)| (*id, auth))
    }

    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty()
    }

    /// Verify the new authenticator's bootstrap credential and store it.
    ///
    /// The account is unchanged on any error.
    pub fn add(
        &mut self,
        request: AddAuthenticator,
        ctx: &VerificationContext<'_>,
    ) -> Result<AuthenticatorId, AuthError> {
        let id = self.resolve_id(request.id())?;
        let (authenticator, credential) = Authenticator::from_request(request, ctx.config)?;

        let registration = VerificationContext {
            ceremony: Ceremony::Registration,
            ..*ctx
        };
        authenticator.verify(&registration, &self.bootstrap_digest(), &credential)?;

        self.authenticators.insert(id, authenticator);
        self.next_id = self.next_id.max(u16::from(id) + 1);
        Ok(id)
    }

    /// Remove an authenticator unless it is the last one.
    pub fn remove(&mut self, id: AuthenticatorId) -> Result<Authenticator, AuthError> {
        if !self.authenticators.contains_key(&id) {
            return Err(AuthError::AuthenticatorNotFound(id));
        }
        if self.authenticators.len() == 1 {
            return Err(AuthError::Lockout);
        }
        let removed = self
            .authenticators
            .remove(&id)
            .ok_or(AuthError::AuthenticatorNotFound(id))?;
        self.retired.insert(id);
        Ok(removed)
    }

    fn resolve_id(&self, requested: Option<AuthenticatorId>) -> Result<AuthenticatorId, AuthError> {
        match requested {
            Some(id) if self.authenticators.contains_key(&id) || self.retired.contains(&id) => {
                Err(AuthError::AuthenticatorIdTaken(id))
            }
            Some(id) => Ok(id),
            None => AuthenticatorId::try_from(self.next_id)
                .map_err(|_| AuthError::AuthenticatorIdsExhausted),
        }
    }
}
