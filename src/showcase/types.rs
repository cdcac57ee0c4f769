//! Core types for profile showcase management.
//!
//! Three families of types mirror the three lives of a showcase:
//!
//! - **Preferences** are the local user's durable configuration, one row per
//!   showcased item, each carrying a [`VisibilityTier`] and a display order.
//!   They are never transmitted as-is.
//! - **Wire entries** are the per-tier projection sent to peers. They carry
//!   no visibility field: the tier is implied by which envelope carries
//!   them.
//! - **Reconciled showcases** are what a received publication becomes after
//!   decryption and trust evaluation, stored per contact.

use serde::{Deserialize, Serialize};

use crate::crypto::envelope::SealedPayload;

/// Audience tier for a showcased item.
///
/// `NoOne` keeps an item configured without publishing it anywhere; the
/// other three are the publication tiers, each sealed (or not) into its own
/// envelope. Audience comparisons go through
/// [`is_at_least_as_broad_as`](Self::is_at_least_as_broad_as) rather than a
/// derived ordering, so no code depends on the internal ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisibilityTier {
    /// Visible to anybody who can fetch the profile.
    Everyone,
    /// Visible to mutual contacts.
    Contacts,
    /// Visible only to identity-verified mutual contacts.
    IdVerifiedContacts,
    /// Configured but not published to any tier.
    #[default]
    NoOne,
}

impl VisibilityTier {
    /// The three tiers that are actually published, broadest first.
    pub const PUBLICATION_TIERS: [Self; 3] =
        [Self::Everyone, Self::Contacts, Self::IdVerifiedContacts];

    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Everyone => "everyone",
            Self::Contacts => "contacts",
            Self::IdVerifiedContacts => "id_verified_contacts",
            Self::NoOne => "no_one",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "everyone" => Some(Self::Everyone),
            "contacts" => Some(Self::Contacts),
            "id_verified_contacts" => Some(Self::IdVerifiedContacts),
            "no_one" => Some(Self::NoOne),
            _ => None,
        }
    }

    /// Audience breadth rank. Internal only: everyone ⊇ contacts ⊇
    /// id-verified contacts ⊇ no one.
    const fn breadth(self) -> u8 {
        match self {
            Self::Everyone => 3,
            Self::Contacts => 2,
            Self::IdVerifiedContacts => 1,
            Self::NoOne => 0,
        }
    }

    /// Returns whether this tier's audience includes `other`'s audience.
    ///
    /// A collectible may only be as visible as the account holding it, so
    /// the account's tier must be at least as broad as the collectible's.
    #[must_use]
    pub const fn is_at_least_as_broad_as(self, other: Self) -> bool {
        self.breadth() >= other.breadth()
    }
}

/// Derived membership status for a community entry in a received showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MembershipStatus {
    /// The community could not be resolved locally; nothing was proven
    /// either way.
    #[default]
    Unproven,
    /// The sender proved membership (valid grant, or member-list presence).
    ProvenMember,
    /// The membership claim failed verification.
    NotAMember,
}

impl MembershipStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unproven => "unproven",
            Self::ProvenMember => "proven_member",
            Self::NotAMember => "not_a_member",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unproven" => Some(Self::Unproven),
            "proven_member" => Some(Self::ProvenMember),
            "not_a_member" => Some(Self::NotAMember),
            _ => None,
        }
    }
}

// ==================== Preferences (local, durable) ====================

/// Preference to showcase a joined community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPreference {
    /// Community identifier.
    pub community_id: String,
    /// Audience tier.
    pub visibility: VisibilityTier,
    /// Display order within the community list.
    pub order: u32,
}

/// Preference to showcase a wallet account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPreference {
    /// Wallet address; unique within one preference set.
    pub address: String,
    /// User-facing account name.
    pub name: String,
    /// Display color identifier.
    pub color_id: String,
    /// Display emoji.
    pub emoji: String,
    /// Audience tier.
    pub visibility: VisibilityTier,
    /// Display order within the account list.
    pub order: u32,
}

/// Preference to showcase a collectible.
///
/// `account_address` must name an [`AccountPreference`] in the same set
/// whose tier is at least as broad as this one; validation enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectiblePreference {
    /// Token contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Token id as a decimal string (token ids exceed u128 range).
    pub token_id: String,
    /// Issuing community, if any.
    pub community_id: String,
    /// Address of the showcased account holding this collectible.
    pub account_address: String,
    /// Audience tier.
    pub visibility: VisibilityTier,
    /// Display order within the collectible list.
    pub order: u32,
}

/// Preference to showcase a verified (curated-list) token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedTokenPreference {
    /// Token symbol, e.g. "ETH".
    pub symbol: String,
    /// Audience tier.
    pub visibility: VisibilityTier,
    /// Display order within the verified-token list.
    pub order: u32,
}

/// Preference to showcase an unverified (arbitrary-contract) token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnverifiedTokenPreference {
    /// Token contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Issuing community, if any.
    pub community_id: String,
    /// Audience tier.
    pub visibility: VisibilityTier,
    /// Display order within the unverified-token list.
    pub order: u32,
}

/// The full local showcase configuration.
///
/// Saved wholesale after validation; `clock` is the monotonic publication
/// timestamp attached when the set is saved, used by receivers to order
/// repeated publications.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredPreferences {
    /// Logical publication timestamp.
    pub clock: u64,
    /// Community preferences.
    pub communities: Vec<CommunityPreference>,
    /// Account preferences.
    pub accounts: Vec<AccountPreference>,
    /// Collectible preferences.
    pub collectibles: Vec<CollectiblePreference>,
    /// Verified token preferences.
    pub verified_tokens: Vec<VerifiedTokenPreference>,
    /// Unverified token preferences.
    pub unverified_tokens: Vec<UnverifiedTokenPreference>,
}

/// Resolved collectible identity used for ownership lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectibleId {
    /// Token contract address.
    pub contract_address: String,
    /// Token id as a validated decimal string.
    pub token_id: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
}

// ==================== Wire entries (per-tier projection) ====================

/// Community entry as sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityEntry {
    /// Community identifier.
    pub community_id: String,
    /// Display order.
    pub order: u32,
    /// Signed membership grant, attached only for access-controlled
    /// communities (and only when issuance succeeded).
    pub grant: Option<Vec<u8>>,
}

/// Account entry as sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// Wallet address.
    pub address: String,
    /// User-facing account name.
    pub name: String,
    /// Display color identifier.
    pub color_id: String,
    /// Display emoji.
    pub emoji: String,
    /// Display order.
    pub order: u32,
}

/// Collectible entry as sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleEntry {
    /// Token contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Token id as a decimal string.
    pub token_id: String,
    /// Issuing community, if any.
    pub community_id: String,
    /// Address of the account holding this collectible.
    pub account_address: String,
    /// Display order.
    pub order: u32,
}

/// Verified token entry as sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedTokenEntry {
    /// Token symbol.
    pub symbol: String,
    /// Display order.
    pub order: u32,
}

/// Unverified token entry as sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnverifiedTokenEntry {
    /// Token contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Issuing community, if any.
    pub community_id: String,
    /// Display order.
    pub order: u32,
}

/// One tier's worth of wire entries, all kinds in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntrySet {
    /// Community entries.
    pub communities: Vec<CommunityEntry>,
    /// Account entries.
    pub accounts: Vec<AccountEntry>,
    /// Collectible entries.
    pub collectibles: Vec<CollectibleEntry>,
    /// Verified token entries.
    pub verified_tokens: Vec<VerifiedTokenEntry>,
    /// Unverified token entries.
    pub unverified_tokens: Vec<UnverifiedTokenEntry>,
}

impl EntrySet {
    /// Returns whether the set carries no entries of any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
            && self.accounts.is_empty()
            && self.collectibles.is_empty()
            && self.verified_tokens.is_empty()
            && self.unverified_tokens.is_empty()
    }
}

/// One complete showcase publication: the plaintext tier plus the two
/// sealed tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseEnvelopeSet {
    /// Plaintext entries visible to anybody.
    pub for_everyone: EntrySet,
    /// Entries sealed for mutual contacts.
    pub for_contacts: SealedPayload,
    /// Entries sealed for identity-verified mutual contacts.
    pub for_id_verified_contacts: SealedPayload,
}

// ==================== Reconciled showcase (per contact) ====================

/// Community revealed by a contact, with derived trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseCommunity {
    /// Community identifier.
    pub community_id: String,
    /// Display order.
    pub order: u32,
    /// Derived membership status for the sending contact.
    pub membership_status: MembershipStatus,
}

/// Account revealed by a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseAccount {
    /// Wallet address.
    pub address: String,
    /// User-facing account name.
    pub name: String,
    /// Display color identifier.
    pub color_id: String,
    /// Display emoji.
    pub emoji: String,
    /// Display order.
    pub order: u32,
}

/// Collectible revealed by a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseCollectible {
    /// Token contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Token id as a decimal string.
    pub token_id: String,
    /// Issuing community, if any.
    pub community_id: String,
    /// Address of the account holding this collectible.
    pub account_address: String,
    /// Display order.
    pub order: u32,
}

/// Verified token revealed by a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseVerifiedToken {
    /// Token symbol.
    pub symbol: String,
    /// Display order.
    pub order: u32,
}

/// Unverified token revealed by a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseUnverifiedToken {
    /// Token contract address.
    pub contract_address: String,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Issuing community, if any.
    pub community_id: String,
    /// Display order.
    pub order: u32,
}

/// Everything one contact has revealed to us, across all tiers we could
/// decrypt, sorted per kind by ascending `order`.
///
/// Replaced wholesale on every successful reconciliation; structural
/// equality against the stored instance is the idempotence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showcase {
    /// Identifier of the contact this showcase belongs to.
    pub contact_id: String,
    /// Communities, with derived membership status.
    pub communities: Vec<ShowcaseCommunity>,
    /// Accounts.
    pub accounts: Vec<ShowcaseAccount>,
    /// Collectibles.
    pub collectibles: Vec<ShowcaseCollectible>,
    /// Verified tokens.
    pub verified_tokens: Vec<ShowcaseVerifiedToken>,
    /// Unverified tokens.
    pub unverified_tokens: Vec<ShowcaseUnverifiedToken>,
}

impl Showcase {
    /// Creates an empty showcase for a contact.
    #[must_use]
    pub const fn empty(contact_id: String) -> Self {
        Self {
            contact_id,
            communities: Vec::new(),
            accounts: Vec::new(),
            collectibles: Vec::new(),
            verified_tokens: Vec::new(),
            unverified_tokens: Vec::new(),
        }
    }
}

/// A showcase account found by address, together with the contact that
/// revealed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAccountMatch {
    /// Contact whose showcase contains the account.
    pub contact_id: String,
    /// The revealed account.
    pub account: ShowcaseAccount,
}

/// Wallet account metadata as reported by the wallet subsystem.
///
/// Carried into [`on_wallet_account_changed`] when the wallet renames or
/// restyles an account that may also appear in the showcase.
///
/// [`on_wallet_account_changed`]: crate::ShowcaseService::on_wallet_account_changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    /// Wallet address.
    pub address: String,
    /// User-facing account name.
    pub name: String,
    /// Display color identifier.
    pub color_id: String,
    /// Display emoji.
    pub emoji: String,
}
