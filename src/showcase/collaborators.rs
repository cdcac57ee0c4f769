//! Collaborator contracts consumed by the showcase core.
//!
//! The core never owns networking, community lifecycle, or chain access; it
//! talks to them through these narrow traits. Implementations may block or
//! run their own async internally, but the core imposes no timeout of its
//! own: each call is expected to either return or fail within the
//! collaborator's documented latency bound, and reads are expected to be
//! idempotent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CollectibleId, ShowcaseEnvelopeSet};
use crate::crypto::keys::IdentityPublicKey;

// ==================== Ownership oracle ====================

/// One on-chain holder of a collectible, as reported by the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderBalance {
    /// Holder wallet address.
    pub address: String,
    /// Held balance (1 for single-holder token standards).
    pub balance: u64,
}

/// Error type for ownership lookups.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The lookup could not be completed (network, rate limit, bad chain).
    #[error("Ownership lookup failed: {0}")]
    Lookup(String),
}

/// External service mapping a collectible identity to its current
/// on-chain holder(s).
pub trait OwnershipOracle: Send + Sync {
    /// Returns the current holders of the given collectible.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails; validation surfaces it to the
    /// caller without retrying.
    fn holders(&self, id: &CollectibleId) -> Result<Vec<HolderBalance>, OracleError>;
}

// ==================== Communities ====================

/// A verified membership grant, decoded by the issuing community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipGrant {
    /// Community that issued the grant.
    pub community_id: String,
    /// Identity key bytes of the member the grant was issued to.
    pub member_id: Vec<u8>,
    /// Issuance timestamp of the grant.
    pub issued_at: u64,
}

/// Error type for grant issuance and verification.
#[derive(Error, Debug)]
pub enum GrantError {
    /// The grant's signature or structure did not verify.
    #[error("Grant verification failed: {0}")]
    Verification(String),
    /// The community could not issue a grant for the local user.
    #[error("Grant issuance failed: {0}")]
    Issuance(String),
}

/// A resolved community, able to answer membership questions.
pub trait Community: Send + Sync {
    /// Community identifier.
    fn id(&self) -> &str;

    /// Whether membership is gated (grant required to prove it).
    fn is_access_controlled(&self) -> bool;

    /// Verifies a grant blob against this community's grant key and
    /// returns the decoded grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature or structure is invalid.
    fn verify_grant(&self, grant: &[u8]) -> Result<MembershipGrant, GrantError>;

    /// Whether the given identity appears in the local member list.
    ///
    /// Only meaningful for communities that are not access-controlled;
    /// gated communities do not expose a member list.
    fn has_member(&self, member: &IdentityPublicKey) -> bool;

    /// Issues a grant proving the local user's own membership, for
    /// attachment to outgoing community entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the local user holds no valid grant.
    fn issue_grant(&self) -> Result<Vec<u8>, GrantError>;
}

/// Lookup of locally known communities.
pub trait CommunityDirectory: Send + Sync {
    /// Resolves a community by id; `None` if it is not known locally.
    fn resolve(&self, community_id: &str) -> Option<Arc<dyn Community>>;
}

// ==================== Transport ====================

/// Error type for outbound dispatch.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Publishing the showcase failed.
    #[error("Publish failed: {0}")]
    Publish(String),
    /// Dispatching the device-sync payload failed.
    #[error("Sync dispatch failed: {0}")]
    Sync(String),
}

/// Outbound message transport.
///
/// Retries and store-node interaction are the transport's concern; the core
/// calls each method at most once per mutation.
pub trait Transport: Send + Sync {
    /// Publishes a three-tier showcase to the contact topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the publication could not be handed off.
    fn publish(&self, envelope_set: &ShowcaseEnvelopeSet) -> Result<(), TransportError>;

    /// Dispatches the serialized preference set to the user's own other
    /// devices. Transport-level encryption of this channel is the
    /// transport's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatch could not be handed off.
    fn dispatch_sync(&self, payload: &[u8]) -> Result<(), TransportError>;
}

// ==================== Contacts ====================

/// One known contact, as captured in a directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    /// Stable contact identifier.
    pub id: String,
    /// The contact's identity public key.
    pub public_key: IdentityPublicKey,
    /// Whether the contact relationship is mutual.
    pub mutual: bool,
    /// Whether the contact's identity has been verified.
    pub id_verified: bool,
}

/// Read access to the contact graph.
pub trait ContactDirectory: Send + Sync {
    /// Returns a snapshot of all known contacts.
    ///
    /// The returned sequence is immutable: concurrent mutation of the
    /// directory must not be observable through it.
    fn list_contacts(&self) -> Vec<ContactRecord>;
}

// ==================== Clock ====================

/// Source of the logical publication timestamp attached to each saved
/// preference set.
pub trait Clock: Send + Sync {
    /// Returns the current logical timestamp.
    fn current_timestamp(&self) -> u64;
}

/// Wall-clock backed [`Clock`], millisecond resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_timestamp(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_non_decreasing() {
        let clock = SystemClock;
        let a = clock.current_timestamp();
        let b = clock.current_timestamp();
        assert!(b >= a);
        assert!(a > 0);
    }

    #[test]
    fn oracle_error_display() {
        let err = OracleError::Lookup("timeout".to_string());
        assert_eq!(err.to_string(), "Ownership lookup failed: timeout");
    }

    #[test]
    fn grant_error_display() {
        let err = GrantError::Verification("bad signature".to_string());
        assert_eq!(err.to_string(), "Grant verification failed: bad signature");
    }
}
