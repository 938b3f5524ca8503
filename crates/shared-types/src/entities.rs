//! # Core Domain Entities
//!
//! Transaction and account types shared between the ledger and the
//! account abstraction subsystem.

use crate::errors::AddressError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Unix timestamp in seconds (block time).
pub type Timestamp = u64;

/// Domain tag prepended to every sign document.
pub const SIGN_DOC_TAG: &[u8] = b"QC-AA-SIGNDOC-V1";

/// Maximum length of an account address string.
pub const MAX_ADDRESS_LEN: usize = 128;

/// Bech32-style account address (`<prefix>1<data>`).
///
/// The prefix is not a process-wide constant: it is supplied by whoever
/// parses the address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Parse and validate an address against the expected prefix.
    pub fn parse(address: &str, prefix: &str) -> Result<Self, AddressError> {
        if address.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong {
                length: address.len(),
                max: MAX_ADDRESS_LEN,
            });
        }

        let data = address
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('1'))
            .ok_or_else(|| AddressError::PrefixMismatch {
                expected: prefix.to_string(),
                address: address.to_string(),
            })?;

        if data.is_empty() {
            return Err(AddressError::EmptyData(address.to_string()));
        }

        if !data
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(AddressError::InvalidCharacters(address.to_string()));
        }

        Ok(Self(address.to_string()))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transaction as sequenced by the ledger.
///
/// `signature` carries the authenticator envelope: one leading byte selecting
/// the authenticator id followed by the credential payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Chain identifier the transaction is valid on.
    pub chain_id: String,
    /// The abstract account authorizing this transaction.
    pub sender: AccountAddress,
    /// Ledger-assigned account number.
    pub account_number: u64,
    /// Account sequence (replay of identical bytes is handled by the ledger).
    pub sequence: u64,
    /// Encoded messages.
    pub body: Vec<u8>,
    /// Authenticator envelope.
    pub signature: Vec<u8>,
}

impl Transaction {
    /// Canonical signable bytes (everything except the signature).
    pub fn sign_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            SIGN_DOC_TAG.len() + self.chain_id.len() + self.sender.as_str().len() + self.body.len() + 32,
        );
        out.extend_from_slice(SIGN_DOC_TAG);
        put_bytes(&mut out, self.chain_id.as_bytes());
        put_bytes(&mut out, self.sender.as_bytes());
        out.extend_from_slice(&self.account_number.to_be_bytes());
        out.extend_from_slice(&self.sequence.to_be_bytes());
        put_bytes(&mut out, &self.body);
        out
    }

    /// SHA-256 of the canonical signable bytes.
    pub fn signing_digest(&self) -> Hash {
        Sha256::digest(self.sign_bytes()).into()
    }
}

fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    // Fields are bounded well below u32::MAX by the ledger's size limits.
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}
