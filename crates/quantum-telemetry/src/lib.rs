//! # Quantum Telemetry
//!
//! Structured logging for Quantum-Chain subsystems.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_subsystem("18", "account-abstraction");
//! init_tracing(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `quantum-chain` | Service name in log records |
//! | `QC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `QC_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `QC_SUBSYSTEM_ID` | `00` | Subsystem identifier |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_tracing, init_test_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed
    #[error("Invalid log filter '{directive}': {reason}")]
    Filter {
        /// Directive as configured
        directive: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}
