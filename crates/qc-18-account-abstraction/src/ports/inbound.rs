//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use shared_types::{AccountAddress, Timestamp, Transaction};

use crate::domain::account::AbstractAccount;
use crate::domain::entities::{AuthenticatorId, AuthorizationResult};
use crate::domain::errors::{AuthError, RegistryError};
use crate::domain::jwk::JwtAlgorithm;
use crate::domain::messages::{
    AddAuthenticator, MsgAddDkimRecords, MsgClaimAudience, MsgCreateAudience,
    MsgDeleteAudience, MsgRemoveDkimRecord, MsgUpdateAudience,
};
use crate::ports::outbound::RegistryReader;

/// Transaction authorization and authenticator management.
///
/// Every call takes the registry view and block time of its evaluation
/// context; implementations hold no registry state of their own.
pub trait AccountAuthApi: Send + Sync {
    /// Create an account whose first authenticator proves control over
    /// the account's bootstrap digest.
    ///
    /// # Errors
    /// * `AuthError::InvalidAddress` - Address does not match the configured prefix
    /// * any pipeline error of the bootstrap credential
    fn instantiate_account(
        &self,
        address: &str,
        request: AddAuthenticator,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> Result<AbstractAccount, AuthError>;

    /// Decide whether `tx` is authorized by one of the account's authenticators.
    ///
    /// The envelope's first byte selects the authenticator; the remainder is
    /// the credential. Rejections carry a typed error.
    fn authorize(
        &self,
        account: &AbstractAccount,
        tx: &Transaction,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> AuthorizationResult;

    /// Verify a new authenticator's bootstrap credential and add it.
    fn add_authenticator(
        &self,
        account: &mut AbstractAccount,
        request: AddAuthenticator,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> Result<AuthenticatorId, AuthError>;

    /// Remove an authenticator, refusing to remove the last one.
    ///
    /// # Errors
    /// * `AuthError::Lockout` - `id` is the only authenticator
    /// * `AuthError::AuthenticatorNotFound` - No authenticator under `id`
    fn remove_authenticator(
        &self,
        account: &mut AbstractAccount,
        id: AuthenticatorId,
    ) -> Result<(), AuthError>;

    /// Authorize `tx` and, on acceptance, apply the authenticator-management
    /// message carried in `tx.body`.
    ///
    /// # Errors
    /// * Any authorization failure of `tx`
    /// * `AuthError::Structural` - `tx.body` is not an [`AccountMsg`](crate::domain::messages::AccountMsg)
    fn execute(
        &self,
        account: &mut AbstractAccount,
        tx: &Transaction,
        registry: &dyn RegistryReader,
        now: Timestamp,
    ) -> Result<(), AuthError>;
}

/// Registry-management operations, applied by the single ledger writer.
///
/// `signer` is the authenticated sender of the message and `height` the
/// block the transition is recorded at.
pub trait RegistryManagementApi {
    /// Reserve an audience name.
    ///
    /// # Errors
    /// * `RegistryError::NameTaken` - Claimed by another owner
    fn claim_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgClaimAudience,
    ) -> Result<(), RegistryError>;

    /// Activate a claimed audience; returns the pinned algorithm.
    ///
    /// # Errors
    /// * `RegistryError::ClaimRequired` - Signer holds no claim on the name
    /// * `RegistryError::AlreadyActive` - Audience exists
    /// * `RegistryError::InvalidKey` - JWK unusable
    fn create_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgCreateAudience,
    ) -> Result<JwtAlgorithm, RegistryError>;

    /// Replace an audience's key; the previous key stops verifying immediately.
    fn update_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgUpdateAudience,
    ) -> Result<JwtAlgorithm, RegistryError>;

    /// Remove an audience and its claim.
    fn delete_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgDeleteAudience,
    ) -> Result<(), RegistryError>;

    /// Add or replace DKIM records; authority only, all-or-nothing.
    fn add_dkim_records(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgAddDkimRecords,
    ) -> Result<usize, RegistryError>;

    /// Remove one DKIM record; authority only.
    fn remove_dkim_record(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgRemoveDkimRecord,
    ) -> Result<(), RegistryError>;
}
