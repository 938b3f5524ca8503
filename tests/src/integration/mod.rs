//! Cross-crate flows: registry management, account lifecycle and
//! authorization through the service.

pub mod account_flows;
