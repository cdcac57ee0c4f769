//! Reusable fakes for showcase integration tests.
//!
//! Every collaborator contract gets a small in-memory implementation here
//! so tests can run the real service end to end: real crypto, real SQLite
//! storage, fake network and chain.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use vitrine_core::crypto::keys::{IdentityPrivateKey, IdentityPublicKey};
use vitrine_core::showcase::collaborators::{
    Clock, Community, CommunityDirectory, ContactDirectory, ContactRecord, GrantError,
    HolderBalance, MembershipGrant, OracleError, OwnershipOracle, Transport, TransportError,
};
use vitrine_core::showcase::types::{CollectibleId, ShowcaseEnvelopeSet};

/// Oracle answering from a fixed contract-address → holder map.
#[derive(Default)]
pub struct MapOracle {
    holders: HashMap<String, Vec<HolderBalance>>,
}

impl MapOracle {
    pub fn with_holder(mut self, contract_address: &str, holder: &str) -> Self {
        self.holders
            .entry(contract_address.to_string())
            .or_default()
            .push(HolderBalance {
                address: holder.to_string(),
                balance: 1,
            });
        self
    }
}

impl OwnershipOracle for MapOracle {
    fn holders(&self, id: &CollectibleId) -> Result<Vec<HolderBalance>, OracleError> {
        Ok(self
            .holders
            .get(&id.contract_address)
            .cloned()
            .unwrap_or_default())
    }
}

/// Community whose grants are bincode-serialized [`MembershipGrant`]s.
///
/// `local_member` is the identity the fake will issue grants for; members
/// of open communities go in `members`.
pub struct FakeCommunity {
    pub id: String,
    pub access_controlled: bool,
    pub members: Vec<IdentityPublicKey>,
    pub local_member: Option<IdentityPublicKey>,
}

impl Community for FakeCommunity {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_access_controlled(&self) -> bool {
        self.access_controlled
    }

    fn verify_grant(&self, grant: &[u8]) -> Result<MembershipGrant, GrantError> {
        bincode::deserialize(grant).map_err(|e| GrantError::Verification(e.to_string()))
    }

    fn has_member(&self, member: &IdentityPublicKey) -> bool {
        self.members.contains(member)
    }

    fn issue_grant(&self) -> Result<Vec<u8>, GrantError> {
        let member = self
            .local_member
            .as_ref()
            .ok_or_else(|| GrantError::Issuance("no grant held".to_string()))?;
        let grant = MembershipGrant {
            community_id: self.id.clone(),
            member_id: member.as_bytes().to_vec(),
            issued_at: 1,
        };
        bincode::serialize(&grant).map_err(|e| GrantError::Issuance(e.to_string()))
    }
}

/// Directory over a fixed set of [`FakeCommunity`]s.
#[derive(Default)]
pub struct FakeDirectory {
    communities: HashMap<String, Arc<FakeCommunity>>,
}

impl FakeDirectory {
    pub fn with(mut self, community: FakeCommunity) -> Self {
        self.communities
            .insert(community.id.clone(), Arc::new(community));
        self
    }
}

impl CommunityDirectory for FakeDirectory {
    fn resolve(&self, community_id: &str) -> Option<Arc<dyn Community>> {
        self.communities
            .get(community_id)
            .cloned()
            .map(|c| c as Arc<dyn Community>)
    }
}

/// Transport that records everything it is handed.
#[derive(Default)]
pub struct RecordingTransport {
    published: Mutex<Vec<ShowcaseEnvelopeSet>>,
    synced: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    pub fn published_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    pub fn last_published(&self) -> Option<ShowcaseEnvelopeSet> {
        self.published.lock().unwrap().last().cloned()
    }

    pub fn synced_payloads(&self) -> Vec<Vec<u8>> {
        self.synced.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn publish(&self, envelope_set: &ShowcaseEnvelopeSet) -> Result<(), TransportError> {
        self.published.lock().unwrap().push(envelope_set.clone());
        Ok(())
    }

    fn dispatch_sync(&self, payload: &[u8]) -> Result<(), TransportError> {
        self.synced.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}

/// Contact directory over a fixed snapshot.
#[derive(Default)]
pub struct FixedContacts {
    records: Vec<ContactRecord>,
}

impl FixedContacts {
    pub fn with(mut self, record: ContactRecord) -> Self {
        self.records.push(record);
        self
    }
}

impl ContactDirectory for FixedContacts {
    fn list_contacts(&self) -> Vec<ContactRecord> {
        self.records.clone()
    }
}

/// Clock ticking forward by one on every read.
#[derive(Default)]
pub struct TickingClock {
    next: AtomicU64,
}

impl TickingClock {
    pub fn starting_at(value: u64) -> Self {
        Self {
            next: AtomicU64::new(value),
        }
    }
}

impl Clock for TickingClock {
    fn current_timestamp(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// Builds a contact record from an identity.
pub fn contact(
    id: &str,
    identity: &IdentityPrivateKey,
    mutual: bool,
    id_verified: bool,
) -> ContactRecord {
    ContactRecord {
        id: id.to_string(),
        public_key: identity.public_key(),
        mutual,
        id_verified,
    }
}
