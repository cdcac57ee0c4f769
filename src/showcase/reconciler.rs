//! Incoming showcase reconciliation.
//!
//! Turns the entry sets recovered from a publication into one [`Showcase`]
//! per sending contact. Community entries get a derived trust verdict here;
//! everything else is carried through and resorted for display. Trust
//! failures never abort reconciliation, they only downgrade the affected
//! entry's [`MembershipStatus`].

use tracing::warn;

use super::collaborators::CommunityDirectory;
use super::error::ProtocolError;
use super::types::{
    CommunityEntry, EntrySet, MembershipStatus, Showcase, ShowcaseAccount, ShowcaseCollectible,
    ShowcaseCommunity, ShowcaseUnverifiedToken, ShowcaseVerifiedToken,
};
use crate::crypto::keys::IdentityPublicKey;

/// Decodes one tier's entry set from its plaintext bytes.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] if the bytes are not a valid encoding;
/// the whole publication is then discarded.
pub fn decode_entries(bytes: &[u8]) -> Result<EntrySet, ProtocolError> {
    bincode::deserialize(bytes).map_err(|err| ProtocolError::Decode(err.to_string()))
}

/// Derives the membership verdict for one community entry.
///
/// The trust ladder:
///
/// - community unknown locally: [`MembershipStatus::Unproven`], nothing can
///   be checked either way;
/// - access-controlled community: the attached grant must verify against
///   the community's grant key, name this community, and be issued to the
///   sender's identity key, otherwise [`MembershipStatus::NotAMember`];
/// - open community: the sender must appear in the local member list.
pub fn evaluate_membership(
    directory: &dyn CommunityDirectory,
    sender: &IdentityPublicKey,
    entry: &CommunityEntry,
) -> MembershipStatus {
    let Some(community) = directory.resolve(&entry.community_id) else {
        warn!(
            community_id = %entry.community_id,
            "community in received showcase not known locally"
        );
        return MembershipStatus::Unproven;
    };

    if community.is_access_controlled() {
        let Some(grant_bytes) = entry.grant.as_deref() else {
            return MembershipStatus::NotAMember;
        };
        match community.verify_grant(grant_bytes) {
            Ok(grant) => {
                if grant.community_id == entry.community_id
                    && grant.member_id == sender.as_bytes()
                {
                    MembershipStatus::ProvenMember
                } else {
                    MembershipStatus::NotAMember
                }
            }
            Err(err) => {
                warn!(
                    community_id = %entry.community_id,
                    error = %err,
                    "grant verification failed for received showcase entry"
                );
                MembershipStatus::NotAMember
            }
        }
    } else if community.has_member(sender) {
        MembershipStatus::ProvenMember
    } else {
        MembershipStatus::NotAMember
    }
}

/// Assembles the recovered tiers into the contact's showcase.
///
/// Tiers must be passed broadest first; entries of all readable tiers are
/// concatenated per kind, then stably sorted by ascending `order`, so the
/// result is identical no matter which tiers were encrypted in transit.
#[must_use]
pub fn assemble(
    directory: &dyn CommunityDirectory,
    sender: &IdentityPublicKey,
    contact_id: String,
    tiers: Vec<EntrySet>,
) -> Showcase {
    let mut showcase = Showcase::empty(contact_id);

    for tier in tiers {
        for entry in tier.communities {
            let membership_status = evaluate_membership(directory, sender, &entry);
            showcase.communities.push(ShowcaseCommunity {
                community_id: entry.community_id,
                order: entry.order,
                membership_status,
            });
        }
        for entry in tier.accounts {
            showcase.accounts.push(ShowcaseAccount {
                address: entry.address,
                name: entry.name,
                color_id: entry.color_id,
                emoji: entry.emoji,
                order: entry.order,
            });
        }
        for entry in tier.collectibles {
            showcase.collectibles.push(ShowcaseCollectible {
                contract_address: entry.contract_address,
                chain_id: entry.chain_id,
                token_id: entry.token_id,
                community_id: entry.community_id,
                account_address: entry.account_address,
                order: entry.order,
            });
        }
        for entry in tier.verified_tokens {
            showcase.verified_tokens.push(ShowcaseVerifiedToken {
                symbol: entry.symbol,
                order: entry.order,
            });
        }
        for entry in tier.unverified_tokens {
            showcase.unverified_tokens.push(ShowcaseUnverifiedToken {
                contract_address: entry.contract_address,
                chain_id: entry.chain_id,
                community_id: entry.community_id,
                order: entry.order,
            });
        }
    }

    // Stable sort keeps the broadest-first tier order among equal keys.
    showcase.communities.sort_by_key(|c| c.order);
    showcase.accounts.sort_by_key(|a| a.order);
    showcase.collectibles.sort_by_key(|c| c.order);
    showcase.verified_tokens.sort_by_key(|t| t.order);
    showcase.unverified_tokens.sort_by_key(|t| t.order);

    showcase
}
