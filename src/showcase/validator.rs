//! Preference validation.
//!
//! A preference set must pass here before anything is persisted or
//! published. The check is pure: it reads the ownership oracle but mutates
//! nothing.

use std::collections::HashMap;

use super::collaborators::OwnershipOracle;
use super::error::ValidationError;
use super::types::{CollectibleId, CollectiblePreference, StoredPreferences, VisibilityTier};

/// Checks that a token id is a non-negative decimal integer literal.
fn parse_token_id(token_id: &str) -> Result<(), ValidationError> {
    if token_id.is_empty() || !token_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::TokenIdNotParsable(token_id.to_string()));
    }
    Ok(())
}

/// Resolves a collectible preference to the identity used for ownership
/// lookups, validating the token id on the way.
fn to_collectible_id(preference: &CollectiblePreference) -> Result<CollectibleId, ValidationError> {
    parse_token_id(&preference.token_id)?;
    Ok(CollectibleId {
        contract_address: preference.contract_address.clone(),
        token_id: preference.token_id.clone(),
        chain_id: preference.chain_id,
    })
}

/// Validates a preference set against its internal invariants and the
/// ownership oracle.
///
/// Checks, in order:
///
/// 1. account addresses are unique;
/// 2. every collectible's token id is a non-negative decimal literal;
/// 3. every collectible is held, per the oracle, by one of the declared
///    accounts;
/// 4. the holding account's tier is at least as broad as the collectible's
///    (a collectible can never be visible to a wider audience than the
///    account holding it).
///
/// Ownership is checked at validation time only; it is not re-verified
/// later. Single-holder token semantics: only the first oracle-reported
/// holder matching a declared account is considered, so multi-holder
/// standards (ERC-1155-style) are not supported.
///
/// # Errors
///
/// Returns the first violated invariant, or the oracle's own error if a
/// lookup fails.
pub fn validate_preferences(
    oracle: &dyn OwnershipOracle,
    preferences: &StoredPreferences,
) -> Result<(), ValidationError> {
    let mut account_tiers: HashMap<&str, VisibilityTier> = HashMap::new();
    for account in &preferences.accounts {
        if account_tiers
            .insert(account.address.as_str(), account.visibility)
            .is_some()
        {
            return Err(ValidationError::DuplicateAccount(account.address.clone()));
        }
    }

    for collectible in &preferences.collectibles {
        let id = to_collectible_id(collectible)?;
        let balances = oracle.holders(&id)?;

        let holder_tier = balances
            .iter()
            .find_map(|balance| account_tiers.get(balance.address.as_str()));

        match holder_tier {
            Some(tier) => {
                if !tier.is_at_least_as_broad_as(collectible.visibility) {
                    return Err(ValidationError::AccountVisibilityTooRestrictive {
                        account_address: collectible.account_address.clone(),
                    });
                }
            }
            None => {
                return Err(ValidationError::OwnerNotPresented {
                    contract_address: collectible.contract_address.clone(),
                    token_id: collectible.token_id.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::showcase::collaborators::{HolderBalance, OracleError};
    use crate::showcase::types::AccountPreference;

    /// Oracle reporting a fixed holder for every collectible.
    struct FixedOracle {
        holder: String,
    }

    impl OwnershipOracle for FixedOracle {
        fn holders(&self, _id: &CollectibleId) -> Result<Vec<HolderBalance>, OracleError> {
            Ok(vec![HolderBalance {
                address: self.holder.clone(),
                balance: 1,
            }])
        }
    }

    /// Oracle that must never be consulted.
    struct PanickingOracle;

    impl OwnershipOracle for PanickingOracle {
        fn holders(&self, _id: &CollectibleId) -> Result<Vec<HolderBalance>, OracleError> {
            panic!("oracle consulted before cheaper checks");
        }
    }

    struct FailingOracle;

    impl OwnershipOracle for FailingOracle {
        fn holders(&self, _id: &CollectibleId) -> Result<Vec<HolderBalance>, OracleError> {
            Err(OracleError::Lookup("oracle offline".to_string()))
        }
    }

    fn account(address: &str, visibility: VisibilityTier) -> AccountPreference {
        AccountPreference {
            address: address.to_string(),
            name: "Account".to_string(),
            color_id: "blue".to_string(),
            emoji: "-_-".to_string(),
            visibility,
            order: 0,
        }
    }

    fn collectible(account_address: &str, visibility: VisibilityTier) -> CollectiblePreference {
        CollectiblePreference {
            contract_address: "0xc0ffee".to_string(),
            chain_id: 1,
            token_id: "123213895929994903".to_string(),
            community_id: String::new(),
            account_address: account_address.to_string(),
            visibility,
            order: 0,
        }
    }

    #[test]
    fn empty_preferences_are_valid() {
        let oracle = PanickingOracle;
        validate_preferences(&oracle, &StoredPreferences::default()).unwrap();
    }

    #[test]
    fn duplicate_account_rejected_before_ownership_lookup() {
        // The panicking oracle proves the duplicate check runs first.
        let oracle = PanickingOracle;
        let preferences = StoredPreferences {
            accounts: vec![
                account("0xaa", VisibilityTier::Everyone),
                account("0xaa", VisibilityTier::Contacts),
            ],
            collectibles: vec![collectible("0xaa", VisibilityTier::Everyone)],
            ..StoredPreferences::default()
        };

        let err = validate_preferences(&oracle, &preferences).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateAccount(addr) if addr == "0xaa"));
    }

    #[test]
    fn unparsable_token_id_rejected() {
        let oracle = PanickingOracle;
        for bad in ["", "12x3", "-5", " 7", "0x10"] {
            let preferences = StoredPreferences {
                accounts: vec![account("0xaa", VisibilityTier::Everyone)],
                collectibles: vec![CollectiblePreference {
                    token_id: bad.to_string(),
                    ..collectible("0xaa", VisibilityTier::Everyone)
                }],
                ..StoredPreferences::default()
            };

            let err = validate_preferences(&oracle, &preferences).unwrap_err();
            assert!(
                matches!(err, ValidationError::TokenIdNotParsable(t) if t == bad),
                "token id {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn token_id_larger_than_u128_is_accepted() {
        let oracle = FixedOracle {
            holder: "0xaa".to_string(),
        };
        let preferences = StoredPreferences {
            accounts: vec![account("0xaa", VisibilityTier::Everyone)],
            collectibles: vec![CollectiblePreference {
                // 78 digits, beyond any machine integer.
                token_id: "9".repeat(78),
                ..collectible("0xaa", VisibilityTier::Everyone)
            }],
            ..StoredPreferences::default()
        };

        validate_preferences(&oracle, &preferences).unwrap();
    }

    #[test]
    fn owner_not_presented_when_holder_unknown() {
        let oracle = FixedOracle {
            holder: "0xstranger".to_string(),
        };
        let preferences = StoredPreferences {
            accounts: vec![account("0xaa", VisibilityTier::Everyone)],
            collectibles: vec![collectible("0xaa", VisibilityTier::Everyone)],
            ..StoredPreferences::default()
        };

        let err = validate_preferences(&oracle, &preferences).unwrap_err();
        assert!(matches!(err, ValidationError::OwnerNotPresented { .. }));
    }

    #[test]
    fn adding_the_holding_account_makes_it_pass() {
        let oracle = FixedOracle {
            holder: "0xbb".to_string(),
        };
        let mut preferences = StoredPreferences {
            accounts: vec![account("0xaa", VisibilityTier::Everyone)],
            collectibles: vec![collectible("0xbb", VisibilityTier::Everyone)],
            ..StoredPreferences::default()
        };

        assert!(validate_preferences(&oracle, &preferences).is_err());

        preferences
            .accounts
            .push(account("0xbb", VisibilityTier::Everyone));
        validate_preferences(&oracle, &preferences).unwrap();
    }

    #[test]
    fn collectible_broader_than_account_rejected() {
        let oracle = FixedOracle {
            holder: "0xaa".to_string(),
        };
        let preferences = StoredPreferences {
            accounts: vec![account("0xaa", VisibilityTier::Contacts)],
            collectibles: vec![collectible("0xaa", VisibilityTier::Everyone)],
            ..StoredPreferences::default()
        };

        let err = validate_preferences(&oracle, &preferences).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::AccountVisibilityTooRestrictive { account_address } if account_address == "0xaa"
        ));
    }

    #[test]
    fn collectible_at_or_below_account_tier_accepted() {
        let oracle = FixedOracle {
            holder: "0xaa".to_string(),
        };
        for tier in [VisibilityTier::Contacts, VisibilityTier::IdVerifiedContacts] {
            let preferences = StoredPreferences {
                accounts: vec![account("0xaa", VisibilityTier::Contacts)],
                collectibles: vec![collectible("0xaa", tier)],
                ..StoredPreferences::default()
            };
            validate_preferences(&oracle, &preferences).unwrap();
        }
    }

    #[test]
    fn oracle_failure_propagates() {
        let oracle = FailingOracle;
        let preferences = StoredPreferences {
            accounts: vec![account("0xaa", VisibilityTier::Everyone)],
            collectibles: vec![collectible("0xaa", VisibilityTier::Everyone)],
            ..StoredPreferences::default()
        };

        let err = validate_preferences(&oracle, &preferences).unwrap_err();
        assert!(matches!(err, ValidationError::Oracle(_)));
    }
}
