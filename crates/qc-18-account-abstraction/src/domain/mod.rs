//! # Domain Layer
//!
//! Pure verification and registry logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod account;
pub mod authenticator;
pub mod claims;
pub mod entities;
pub mod errors;
pub mod jwk;
pub mod jwt;
pub mod messages;
pub mod passkey;
pub mod registry;
pub mod token;
pub mod zkemail;
