//! Showcase service facade.
//!
//! One `ShowcaseService` per local identity wires the storage, the crypto
//! envelope, and the collaborator contracts together. Messenger-level
//! callers talk only to this type: local mutations come in through
//! [`set_preferences`](ShowcaseService::set_preferences) and the wallet and
//! community hooks, incoming publications through
//! [`build_from_incoming`](ShowcaseService::build_from_incoming).
//!
//! Every successful local mutation re-publishes the three-tier envelope
//! set; no-op deletes do not touch the network.

use std::sync::Arc;

use tracing::{debug, info};

use super::collaborators::{
    Clock, CommunityDirectory, ContactDirectory, OwnershipOracle, Transport,
};
use super::error::{ProtocolError, Result, ShowcaseError};
use super::reconciler;
use super::storage::ShowcaseStorage;
use super::types::{
    ContactAccountMatch, EntrySet, Showcase, ShowcaseEnvelopeSet, StoredPreferences,
    VisibilityTier, WalletAccount,
};
use super::{projector, validator};
use crate::crypto::envelope::{self, SealedPayload};
use crate::crypto::keys::{IdentityPrivateKey, IdentityPublicKey};

/// Facade over showcase preferences, publication, and reconciliation.
pub struct ShowcaseService {
    storage: ShowcaseStorage,
    identity: IdentityPrivateKey,
    oracle: Arc<dyn OwnershipOracle>,
    communities: Arc<dyn CommunityDirectory>,
    transport: Arc<dyn Transport>,
    contacts: Arc<dyn ContactDirectory>,
    clock: Arc<dyn Clock>,
}

impl ShowcaseService {
    /// Creates a service for one local identity.
    ///
    /// The private key is read-only here: the service derives shared
    /// secrets from it but never rotates or persists it.
    #[must_use]
    pub fn new(
        storage: ShowcaseStorage,
        identity: IdentityPrivateKey,
        oracle: Arc<dyn OwnershipOracle>,
        communities: Arc<dyn CommunityDirectory>,
        transport: Arc<dyn Transport>,
        contacts: Arc<dyn ContactDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            identity,
            oracle,
            communities,
            transport,
            contacts,
            clock,
        }
    }

    // ==================== Local Preferences ====================

    /// Validates and saves a new preference set, then publishes it.
    ///
    /// The publication clock is stamped here, so repeated saves order
    /// correctly on the receiving side. With `sync_to_other_devices` the
    /// full set is additionally dispatched to the user's own devices.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is persisted, or a
    /// store/crypto/transport error from the save and publish steps.
    pub fn set_preferences(
        &self,
        mut preferences: StoredPreferences,
        sync_to_other_devices: bool,
    ) -> Result<()> {
        preferences.clock = self.clock.current_timestamp();
        validator::validate_preferences(self.oracle.as_ref(), &preferences)?;
        self.storage.save_preferences(&preferences)?;

        if sync_to_other_devices {
            let payload = bincode::serialize(&preferences)
                .map_err(|err| ShowcaseError::Decode(err.to_string()))?;
            self.transport.dispatch_sync(&payload)?;
        }

        info!(clock = preferences.clock, "showcase preferences saved");
        self.publish_showcase()
    }

    /// Returns the stored preference set.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored rows cannot be read.
    pub fn preferences(&self) -> Result<StoredPreferences> {
        Ok(self.storage.get_preferences()?)
    }

    /// Applies a preference set synced from another of the user's devices.
    ///
    /// The payload keeps the clock stamped by the originating device. The
    /// set is re-validated and re-published locally, but not dispatched
    /// back to the sync channel.
    ///
    /// # Errors
    ///
    /// Returns a decode error for a malformed payload, or the same errors
    /// as a local save.
    pub fn apply_synced_preferences(&self, payload: &[u8]) -> Result<()> {
        let preferences: StoredPreferences =
            bincode::deserialize(payload).map_err(|err| ShowcaseError::Decode(err.to_string()))?;
        validator::validate_preferences(self.oracle.as_ref(), &preferences)?;
        self.storage.save_preferences(&preferences)?;

        info!(clock = preferences.clock, "synced showcase preferences applied");
        self.publish_showcase()
    }

    // ==================== Publication ====================

    /// Projects, seals, and publishes the three-tier envelope set.
    ///
    /// The everyone tier goes out in plaintext. The contacts tier is
    /// sealed for every mutual contact, the id-verified tier for the
    /// subset that is also identity-verified. The contact snapshot is
    /// taken once per publication.
    ///
    /// # Errors
    ///
    /// Returns an error if reading preferences, sealing, or the transport
    /// hand-off fails.
    pub fn publish_showcase(&self) -> Result<()> {
        let preferences = self.storage.get_preferences()?;

        let [for_everyone, contacts_entries, verified_entries] = VisibilityTier::PUBLICATION_TIERS
            .map(|tier| projector::project(self.communities.as_ref(), &preferences, tier));

        let snapshot = self.contacts.list_contacts();
        let mutual: Vec<IdentityPublicKey> = snapshot
            .iter()
            .filter(|c| c.mutual)
            .map(|c| c.public_key.clone())
            .collect();
        let id_verified: Vec<IdentityPublicKey> = snapshot
            .iter()
            .filter(|c| c.mutual && c.id_verified)
            .map(|c| c.public_key.clone())
            .collect();

        let envelope_set = ShowcaseEnvelopeSet {
            for_everyone,
            for_contacts: self.seal_entries(&contacts_entries, &mutual)?,
            for_id_verified_contacts: self.seal_entries(&verified_entries, &id_verified)?,
        };

        self.transport.publish(&envelope_set)?;
        debug!(
            mutual_recipients = mutual.len(),
            id_verified_recipients = id_verified.len(),
            "showcase published"
        );
        Ok(())
    }

    fn seal_entries(
        &self,
        entries: &EntrySet,
        recipients: &[IdentityPublicKey],
    ) -> Result<SealedPayload> {
        let plaintext =
            bincode::serialize(entries).map_err(|err| ShowcaseError::Decode(err.to_string()))?;
        Ok(envelope::seal(&self.identity, recipients, &plaintext)?)
    }

    // ==================== Reconciliation ====================

    /// Reconciles one incoming showcase publication from a contact.
    ///
    /// Sealed tiers this identity cannot open contribute no entries; any
    /// other decode or crypto failure aborts with no partial state. The
    /// assembled showcase replaces the stored one wholesale and is
    /// returned as the change notification — unless it equals the stored
    /// one structurally, in which case nothing is written and `None` is
    /// returned (repeated delivery is a no-op).
    ///
    /// The contact id is derived from the sender's identity key.
    ///
    /// # Errors
    ///
    /// Returns a protocol error on fatal crypto failures, undecodable
    /// entries, or storage failures.
    pub fn build_from_incoming(
        &self,
        sender: &IdentityPublicKey,
        envelope_set: &ShowcaseEnvelopeSet,
    ) -> std::result::Result<Option<Showcase>, ProtocolError> {
        let mut tiers = vec![envelope_set.for_everyone.clone()];
        for sealed in [
            &envelope_set.for_contacts,
            &envelope_set.for_id_verified_contacts,
        ] {
            if let Some(bytes) = envelope::open(&self.identity, sender, sealed)? {
                tiers.push(reconciler::decode_entries(&bytes)?);
            }
        }

        let contact_id = hex::encode(sender.as_bytes());
        let candidate =
            reconciler::assemble(self.communities.as_ref(), sender, contact_id.clone(), tiers);

        let stored = self.storage.get_showcase(&contact_id)?;
        if stored == candidate {
            debug!(%contact_id, "incoming showcase unchanged, skipping write");
            return Ok(None);
        }

        self.storage.save_showcase(&candidate)?;
        info!(%contact_id, "incoming showcase reconciled");
        Ok(Some(candidate))
    }

    // ==================== Accessors ====================

    /// Returns the stored showcase for one contact, empty if the contact
    /// never sent one.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored rows cannot be read.
    pub fn showcase_for_contact(&self, contact_id: &str) -> Result<Showcase> {
        Ok(self.storage.get_showcase(contact_id)?)
    }

    /// Finds every contact whose showcase reveals the given wallet
    /// address.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored rows cannot be read.
    pub fn showcase_accounts_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<ContactAccountMatch>> {
        Ok(self.storage.get_showcase_accounts_by_address(address)?)
    }

    // ==================== Wallet & Community Hooks ====================

    /// Propagates a wallet-side account rename/restyle into the matching
    /// showcase preference, if one exists, and re-publishes.
    ///
    /// # Errors
    ///
    /// Returns an error if the save or the publication fails.
    pub fn on_wallet_account_changed(&self, account: &WalletAccount) -> Result<()> {
        let Some(mut preference) = self.storage.get_account_preference(&account.address)? else {
            return Ok(());
        };

        preference.name = account.name.clone();
        preference.color_id = account.color_id.clone();
        preference.emoji = account.emoji.clone();
        self.storage.save_account_preference(&preference)?;

        debug!(address = %account.address, "showcased account metadata updated");
        self.publish_showcase()
    }

    /// Drops the showcase preference for a deleted wallet account.
    ///
    /// Re-publishes only when a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete or the publication fails.
    pub fn on_wallet_account_deleted(&self, address: &str) -> Result<()> {
        if self.storage.delete_account_preference(address)? {
            debug!(%address, "showcased account removed");
            self.publish_showcase()?;
        }
        Ok(())
    }

    /// Drops the showcase preference for a community the user left or
    /// that was deleted.
    ///
    /// Re-publishes only when a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete or the publication fails.
    pub fn on_community_deleted(&self, community_id: &str) -> Result<()> {
        if self.storage.delete_community_preference(community_id)? {
            debug!(%community_id, "showcased community removed");
            self.publish_showcase()?;
        }
        Ok(())
    }
}
