//! # Account Abstraction Subsystem (QC-18)
//!
//! Pluggable authenticators for programmable accounts and replay-safe
//! transaction authorization.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): registries, credential pipelines, authenticator sets
//! - **Ports Layer** (`ports/`): inbound APIs and the registry/proof-verifier SPIs
//! - **Adapters Layer** (`adapters/`): Groth16 proof verifier
//! - **Service Layer** (`service.rs`): dispatcher wiring domain logic to ports
//!
//! ## Data Flow
//!
//! ```text
//! Transaction ──signature[0] = authenticator id──→ [Dispatcher]
//!                                                      │
//!          ┌─────────────────┬──────────────────┬──────┴───────────┐
//!          ↓                 ↓                  ↓                  ↓
//!     [Key check]    [Token pipeline]   [Passkey check]   [ZK-email pipeline]
//!                            │                                     │
//!                            └──────→ [Registry snapshot] ←────────┘
//! ```
//!
//! ## Security Notes
//!
//! - **Digest Binding**: every credential carries SHA-256 of the transaction's
//!   canonical sign bytes; a credential for one transaction fails for any other
//! - **Algorithm Pinning**: the token `alg` is compared to the audience's pinned
//!   algorithm before any signature verification is attempted
//! - **Lockout Prevention**: the last authenticator of an account cannot be removed
//! - **Re-broadcast**: identical transaction bytes are the ledger's sequence
//!   check, not this subsystem's

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export public API
pub use adapters::groth16::Groth16ProofVerifier;
pub use config::{AuthConfig, ConfigError, VerificationCosts};
pub use domain::account::AbstractAccount;
pub use domain::authenticator::{Authenticator, AuthenticatorKind, Ceremony, VerificationContext};
pub use domain::entities::{
    Audience, AudienceClaim, AuthenticatorId, AuthorizationResult, DkimRecord, RegistryEvent,
};
pub use domain::errors::{AuthError, RegistryError};
pub use domain::jwk::{AudienceKey, JwtAlgorithm};
pub use domain::messages::{
    AccountMsg, AddAuthenticator, DkimRecordInput, MsgAddDkimRecords, MsgClaimAudience,
    MsgCreateAudience, MsgDeleteAudience, MsgRemoveDkimRecord, MsgUpdateAudience,
};
pub use domain::registry::{RegistrySnapshot, RegistryStore};
pub use ports::inbound::{AccountAuthApi, RegistryManagementApi};
pub use ports::outbound::{ProofVerifier, RegistryReader};
pub use service::AccountAbstractionService;
