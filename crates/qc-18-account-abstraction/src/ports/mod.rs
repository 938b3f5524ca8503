//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the ledger calls
//! - **Outbound (Driven)**: Registry reads and proof verification this subsystem needs

pub mod inbound;
pub mod outbound;
