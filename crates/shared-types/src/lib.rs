//! # Shared Types Crate
//!
//! Entities handed to the account abstraction subsystem by the surrounding
//! ledger: the transaction under evaluation, account addresses and the
//! canonical signing digest every credential must be bound to.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The signable byte layout is defined once, here.
//! - **Signature Excluded**: The digest never covers the signature field, so a
//!   credential can be computed before it is attached.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
