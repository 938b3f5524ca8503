//! # Credential Registry Store
//!
//! Audience claims, audiences and DKIM records held as explicit key-value
//! maps behind an `Arc`. Mutations go through [`RegistryStore`] (single
//! writer) and append to a transition log; readers take a
//! [`RegistrySnapshot`], which is a cheap clone of the current state and is
//! never affected by later writes.
//!
//! ## Lifecycle
//!
//! ```text
//! ClaimName ──→ CreateAudience ──→ UpdateAudience* ──→ DeleteAudience
//!                     ↑                                        │
//!                     └──────── original owner only ───────────┘
//! ```
//!
//! Deleting an audience keeps its claim: the name cannot be taken over by
//! another principal and re-pointed at a new key.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use qc_zkp::parse_field_element;
use shared_crypto::decode_base64_lenient;
use shared_types::AccountAddress;
use tracing::info;

use super::entities::{Audience, AudienceClaim, DkimRecord, RegistryEvent};
use super::errors::RegistryError;
use super::jwk::{AudienceKey, JwtAlgorithm};
use super::messages::{
    DkimRecordInput, MsgAddDkimRecords, MsgClaimAudience, MsgCreateAudience, MsgDeleteAudience,
    MsgRemoveDkimRecord, MsgUpdateAudience,
};
use crate::ports::inbound::RegistryManagementApi;
use crate::ports::outbound::RegistryReader;

/// Maximum audience name length.
pub const MAX_AUDIENCE_NAME_LEN: usize = 128;

type DkimKey = (String, String);

#[derive(Clone, Debug, Default)]
struct RegistryState {
    claims: HashMap<String, AudienceClaim>,
    audiences: HashMap<String, Audience>,
    dkim: BTreeMap<DkimKey, DkimRecord>,
    /// commitment -> (domain, selector) keys carrying it
    commitments: HashMap<String, BTreeSet<DkimKey>>,
}

impl RegistryState {
    fn audience_claim(&self, name: &str) -> Option<&AudienceClaim> {
        self.claims.get(name)
    }

    fn dkim_record(&self, domain: &str, selector: &str) -> Option<&DkimRecord> {
        self.dkim.get(&(normalize_domain(domain), selector.to_string()))
    }

    fn dkim_records(&self) -> Vec<&DkimRecord> {
        self.dkim.values().collect()
    }

    fn dkim_by_commitment(&self, commitment: &str) -> Option<&DkimRecord> {
        self.commitments
            .get(commitment)?
            .iter()
            .next()
            .and_then(|key| self.dkim.get(key))
    }

    fn insert_dkim(&mut self, record: DkimRecord) {
        let key = (record.domain.clone(), record.selector.clone());
        let commitment = record.commitment.clone();
        if let Some(previous) = self.dkim.insert(key.clone(), record) {
            self.unindex(&previous.commitment, &key);
        }
        self.commitments.entry(commitment).or_default().insert(key);
    }

    fn remove_dkim(&mut self, key: &DkimKey) -> Option<DkimRecord> {
        let record = self.dkim.remove(key)?;
        self.unindex(&record.commitment, key);
        Some(record)
    }

    fn unindex(&mut self, commitment: &str, key: &DkimKey) {
        if let Some(keys) = self.commitments.get_mut(commitment) {
            keys.remove(key);
            if keys.is_empty() {
                self.commitments.remove(commitment);
            }
        }
    }
}

/// Immutable view of the registries at one point in time.
#[derive(Clone, Debug)]
pub struct RegistrySnapshot {
    state: Arc<RegistryState>,
}

impl RegistrySnapshot {
    /// Claim on an audience name.
    pub fn audience_claim(&self, name: &str) -> Option<&AudienceClaim> {
        self.state.audience_claim(name)
    }

    /// DKIM record under (domain, selector).
    pub fn dkim_record(&self, domain: &str, selector: &str) -> Option<&DkimRecord> {
        self.state.dkim_record(domain, selector)
    }

    /// All DKIM records, ordered by (domain, selector).
    pub fn dkim_records(&self) -> Vec<&DkimRecord> {
        self.state.dkim_records()
    }
}

impl RegistryReader for RegistrySnapshot {
    fn audience(&self, name: &str) -> Option<&Audience> {
        self.state.audiences.get(name)
    }

    fn dkim_by_commitment(&self, commitment: &str) -> Option<&DkimRecord> {
        self.state.dkim_by_commitment(commitment)
    }
}

/// Single-writer registry store with an append-only transition log.
#[derive(Debug)]
pub struct RegistryStore {
    state: Arc<RegistryState>,
    events: Vec<RegistryEvent>,
    authority: AccountAddress,
}

impl RegistryStore {
    /// Create an empty store; `authority` is the only signer allowed to
    /// change DKIM records.
    pub fn new(authority: AccountAddress) -> Self {
        Self {
            state: Arc::new(RegistryState::default()),
            events: Vec::new(),
            authority,
        }
    }

    /// DKIM registry authority.
    pub fn authority(&self) -> &AccountAddress {
        &self.authority
    }

    /// Consistent read-only view of the current state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            state: Arc::clone(&self.state),
        }
    }

    /// Every successful transition, oldest first.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Claim on an audience name.
    pub fn audience_claim(&self, name: &str) -> Option<&AudienceClaim> {
        self.state.audience_claim(name)
    }

    /// DKIM record under (domain, selector).
    pub fn dkim_record(&self, domain: &str, selector: &str) -> Option<&DkimRecord> {
        self.state.dkim_record(domain, selector)
    }

    /// All DKIM records, ordered by (domain, selector).
    pub fn dkim_records(&self) -> Vec<&DkimRecord> {
        self.state.dkim_records()
    }

    fn state_mut(&mut self) -> &mut RegistryState {
        Arc::make_mut(&mut self.state)
    }

    fn check_owner(&self, name: &str, signer: &AccountAddress) -> Result<(), RegistryError> {
        let audience = self
            .state
            .audiences
            .get(name)
            .ok_or_else(|| RegistryError::AudienceNotFound(name.to_string()))?;
        if &audience.owner != signer {
            return Err(RegistryError::Unauthorized(name.to_string()));
        }
        Ok(())
    }

    fn check_authority(&self, signer: &AccountAddress, claimed: &str) -> Result<(), RegistryError> {
        if signer != &self.authority || claimed != self.authority.as_str() {
            return Err(RegistryError::NotAuthority(signer.to_string()));
        }
        Ok(())
    }
}

impl RegistryReader for RegistryStore {
    fn audience(&self, name: &str) -> Option<&Audience> {
        self.state.audiences.get(name)
    }

    fn dkim_by_commitment(&self, commitment: &str) -> Option<&DkimRecord> {
        self.state.dkim_by_commitment(commitment)
    }
}

impl RegistryManagementApi for RegistryStore {
    fn claim_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgClaimAudience,
    ) -> Result<(), RegistryError> {
        validate_name(&msg.aud)?;

        if let Some(claim) = self.state.claims.get(&msg.aud) {
            if &claim.owner == signer {
                return Ok(());
            }
            return Err(RegistryError::NameTaken(msg.aud));
        }

        self.state_mut().claims.insert(
            msg.aud.clone(),
            AudienceClaim {
                name: msg.aud.clone(),
                owner: signer.clone(),
            },
        );
        info!(audience = %msg.aud, owner = %signer, height, "Audience name claimed");
        self.events.push(RegistryEvent::Claimed {
            name: msg.aud,
            owner: signer.clone(),
            height,
        });
        Ok(())
    }

    fn create_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgCreateAudience,
    ) -> Result<JwtAlgorithm, RegistryError> {
        match self.state.claims.get(&msg.aud) {
            Some(claim) if &claim.owner == signer => {}
            _ => return Err(RegistryError::ClaimRequired(msg.aud)),
        }
        if self.state.audiences.contains_key(&msg.aud) {
            return Err(RegistryError::AlreadyActive(msg.aud));
        }

        let key = AudienceKey::from_jwk(&msg.public_key_jwk)?;
        let algorithm = key.algorithm();

        self.state_mut().audiences.insert(
            msg.aud.clone(),
            Audience {
                name: msg.aud.clone(),
                owner: signer.clone(),
                key,
                public_key_jwk: msg.public_key_jwk,
            },
        );
        info!(audience = %msg.aud, owner = %signer, %algorithm, height, "Audience created");
        self.events.push(RegistryEvent::Created {
            name: msg.aud,
            algorithm,
            height,
        });
        Ok(algorithm)
    }

    fn update_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgUpdateAudience,
    ) -> Result<JwtAlgorithm, RegistryError> {
        self.check_owner(&msg.aud, signer)?;
        let key = AudienceKey::from_jwk(&msg.public_key_jwk)?;
        let algorithm = key.algorithm();

        if let Some(audience) = self.state_mut().audiences.get_mut(&msg.aud) {
            audience.key = key;
            audience.public_key_jwk = msg.public_key_jwk;
        }
        info!(audience = %msg.aud, %algorithm, height, "Audience key rotated");
        self.events.push(RegistryEvent::Updated {
            name: msg.aud,
            algorithm,
            height,
        });
        Ok(algorithm)
    }

    fn delete_audience(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgDeleteAudience,
    ) -> Result<(), RegistryError> {
        self.check_owner(&msg.aud, signer)?;

        self.state_mut().audiences.remove(&msg.aud);
        info!(audience = %msg.aud, height, "Audience deleted");
        self.events.push(RegistryEvent::Deleted {
            name: msg.aud,
            height,
        });
        Ok(())
    }

    fn add_dkim_records(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgAddDkimRecords,
    ) -> Result<usize, RegistryError> {
        self.check_authority(signer, &msg.authority)?;
        if msg.records.is_empty() {
            return Err(RegistryError::InvalidDkimRecord(
                "no records supplied".to_string(),
            ));
        }

        // Validate the whole batch before touching state.
        let mut seen = BTreeSet::new();
        let mut records = Vec::with_capacity(msg.records.len());
        for input in msg.records {
            let record = validate_dkim(input)?;
            if !seen.insert((record.domain.clone(), record.selector.clone())) {
                return Err(RegistryError::InvalidDkimRecord(format!(
                    "duplicate record {}/{}",
                    record.domain, record.selector
                )));
            }
            records.push(record);
        }

        let count = records.len();
        let state = self.state_mut();
        let mut applied = Vec::with_capacity(count);
        for record in records {
            applied.push((record.domain.clone(), record.selector.clone()));
            state.insert_dkim(record);
        }
        for (domain, selector) in applied {
            info!(%domain, %selector, height, "DKIM record added");
            self.events.push(RegistryEvent::DkimAdded {
                domain,
                selector,
                height,
            });
        }
        Ok(count)
    }

    fn remove_dkim_record(
        &mut self,
        signer: &AccountAddress,
        height: u64,
        msg: MsgRemoveDkimRecord,
    ) -> Result<(), RegistryError> {
        self.check_authority(signer, &msg.authority)?;

        let key = (normalize_domain(&msg.domain), msg.selector);
        if !self.state.dkim.contains_key(&key) {
            return Err(RegistryError::DkimRecordNotFound {
                domain: key.0,
                selector: key.1,
            });
        }
        self.state_mut().remove_dkim(&key);

        let (domain, selector) = key;
        info!(%domain, %selector, height, "DKIM record removed");
        self.events.push(RegistryEvent::DkimRemoved {
            domain,
            selector,
            height,
        });
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.len() > MAX_AUDIENCE_NAME_LEN {
        return Err(RegistryError::InvalidName(format!(
            "length must be 1..={MAX_AUDIENCE_NAME_LEN}"
        )));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().to_ascii_lowercase()
}

fn validate_dkim(input: DkimRecordInput) -> Result<DkimRecord, RegistryError> {
    let domain = normalize_domain(&input.domain);
    if domain.is_empty() || domain.contains(char::is_whitespace) {
        return Err(RegistryError::InvalidDkimRecord(format!(
            "invalid domain '{}'",
            input.domain
        )));
    }
    if input.selector.is_empty() || input.selector.contains(char::is_whitespace) {
        return Err(RegistryError::InvalidDkimRecord(format!(
            "invalid selector '{}'",
            input.selector
        )));
    }
    match decode_base64_lenient(&input.public_key) {
        Ok(bytes) if !bytes.is_empty() => {}
        _ => {
            return Err(RegistryError::InvalidDkimRecord(format!(
                "public key of {domain}/{} is not base64",
                input.selector
            )))
        }
    }
    parse_field_element(&input.commitment).map_err(|e| {
        RegistryError::InvalidDkimRecord(format!("commitment of {domain}/{}: {e}", input.selector))
    })?;

    Ok(DkimRecord {
        domain,
        selector: input.selector,
        public_key: input.public_key,
        commitment: input.commitment,
    })
}
