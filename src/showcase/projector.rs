//! Tier projection.
//!
//! Converts the local preference set into the wire entries for one tier.
//! Filtering is by exact tier match, so every preference lands in exactly
//! one tier's entry list (or nowhere, for `NoOne`). Entries keep the
//! insertion order of the preference list; sorting happens on the
//! receiving side only.

use tracing::warn;

use super::collaborators::CommunityDirectory;
use super::types::{
    AccountEntry, CollectibleEntry, CommunityEntry, EntrySet, StoredPreferences,
    UnverifiedTokenEntry, VerifiedTokenEntry, VisibilityTier,
};

/// Projects one tier of a preference set into wire entries.
///
/// For community preferences in an access-controlled community, a signed
/// membership grant is attached so receivers can verify the claim. Grant
/// attachment failures (community unknown locally, no grant held) are
/// logged and degrade to an entry without a grant; receivers will then
/// treat the membership as unproven.
#[must_use]
pub fn project(
    directory: &dyn CommunityDirectory,
    preferences: &StoredPreferences,
    tier: VisibilityTier,
) -> EntrySet {
    let mut entries = EntrySet::default();

    for preference in &preferences.communities {
        if preference.visibility != tier {
            continue;
        }

        let mut grant = None;
        match directory.resolve(&preference.community_id) {
            Some(community) if community.is_access_controlled() => {
                match community.issue_grant() {
                    Ok(bytes) => grant = Some(bytes),
                    Err(err) => {
                        warn!(
                            community_id = %preference.community_id,
                            error = %err,
                            "failed to issue grant for showcase entry"
                        );
                    }
                }
            }
            Some(_) => {}
            None => {
                warn!(
                    community_id = %preference.community_id,
                    "community not resolvable for showcase entry"
                );
            }
        }

        entries.communities.push(CommunityEntry {
            community_id: preference.community_id.clone(),
            order: preference.order,
            grant,
        });
    }

    for preference in &preferences.accounts {
        if preference.visibility != tier {
            continue;
        }
        entries.accounts.push(AccountEntry {
            address: preference.address.clone(),
            name: preference.name.clone(),
            color_id: preference.color_id.clone(),
            emoji: preference.emoji.clone(),
            order: preference.order,
        });
    }

    for preference in &preferences.collectibles {
        if preference.visibility != tier {
            continue;
        }
        entries.collectibles.push(CollectibleEntry {
            contract_address: preference.contract_address.clone(),
            chain_id: preference.chain_id,
            token_id: preference.token_id.clone(),
            community_id: preference.community_id.clone(),
            account_address: preference.account_address.clone(),
            order: preference.order,
        });
    }

    for preference in &preferences.verified_tokens {
        if preference.visibility != tier {
            continue;
        }
        entries.verified_tokens.push(VerifiedTokenEntry {
            symbol: preference.symbol.clone(),
            order: preference.order,
        });
    }

    for preference in &preferences.unverified_tokens {
        if preference.visibility != tier {
            continue;
        }
        entries.unverified_tokens.push(UnverifiedTokenEntry {
            contract_address: preference.contract_address.clone(),
            chain_id: preference.chain_id,
            community_id: preference.community_id.clone(),
            order: preference.order,
        });
    }

    entries
}
