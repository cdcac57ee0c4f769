//! `SQLite` storage for showcase state.
//!
//! Two families of tables live here: the local user's preference rows
//! (replaced wholesale on every save, together with the publication clock)
//! and the per-contact reconciled showcases. All data is local to the
//! device; peers only ever see the projected wire entries.

// SQLite operations need to hold the lock for the duration of the operation.
// Dropping the guard earlier would require restructuring all methods.
#![allow(clippy::significant_drop_tightening)]

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::error::StoreError;
use super::types::{
    AccountPreference, CollectiblePreference, CommunityPreference, ContactAccountMatch,
    MembershipStatus, Showcase, ShowcaseAccount, ShowcaseCollectible, ShowcaseCommunity,
    ShowcaseUnverifiedToken, ShowcaseVerifiedToken, StoredPreferences, UnverifiedTokenPreference,
    VerifiedTokenPreference, VisibilityTier,
};

type Result<T> = std::result::Result<T, StoreError>;

/// `SQLite`-based storage for showcase preferences and received showcases.
///
/// Thread-safe wrapper around a `SQLite` connection.
pub struct ShowcaseStorage {
    conn: Mutex<Connection>,
}

impl ShowcaseStorage {
    /// Creates a new storage instance at the given path.
    ///
    /// Creates the database file and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or initialized.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Creates an in-memory storage instance, used in tests and ephemeral
    /// profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Initializes the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute_batch(
            r"
            -- Publication clock for the local preference set
            CREATE TABLE IF NOT EXISTS showcase_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                clock INTEGER NOT NULL
            );

            -- Local preferences, one table per showcased kind
            CREATE TABLE IF NOT EXISTS community_preferences (
                community_id TEXT PRIMARY KEY,
                visibility TEXT NOT NULL,
                sort_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS account_preferences (
                address TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color_id TEXT NOT NULL,
                emoji TEXT NOT NULL,
                visibility TEXT NOT NULL,
                sort_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS collectible_preferences (
                contract_address TEXT NOT NULL,
                chain_id INTEGER NOT NULL,
                token_id TEXT NOT NULL,
                community_id TEXT NOT NULL,
                account_address TEXT NOT NULL,
                visibility TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                PRIMARY KEY (contract_address, chain_id, token_id)
            );

            CREATE TABLE IF NOT EXISTS verified_token_preferences (
                symbol TEXT PRIMARY KEY,
                visibility TEXT NOT NULL,
                sort_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS unverified_token_preferences (
                contract_address TEXT NOT NULL,
                chain_id INTEGER NOT NULL,
                community_id TEXT NOT NULL,
                visibility TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                PRIMARY KEY (contract_address, chain_id)
            );

            -- Reconciled showcases, one row set per sending contact
            CREATE TABLE IF NOT EXISTS contact_showcase_communities (
                contact_id TEXT NOT NULL,
                community_id TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                membership_status TEXT NOT NULL,
                PRIMARY KEY (contact_id, community_id)
            );

            CREATE TABLE IF NOT EXISTS contact_showcase_accounts (
                contact_id TEXT NOT NULL,
                address TEXT NOT NULL,
                name TEXT NOT NULL,
                color_id TEXT NOT NULL,
                emoji TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                PRIMARY KEY (contact_id, address)
            );
            CREATE INDEX IF NOT EXISTS idx_contact_showcase_accounts_address
                ON contact_showcase_accounts(address);

            CREATE TABLE IF NOT EXISTS contact_showcase_collectibles (
                contact_id TEXT NOT NULL,
                contract_address TEXT NOT NULL,
                chain_id INTEGER NOT NULL,
                token_id TEXT NOT NULL,
                community_id TEXT NOT NULL,
                account_address TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                PRIMARY KEY (contact_id, contract_address, chain_id, token_id)
            );

            CREATE TABLE IF NOT EXISTS contact_showcase_verified_tokens (
                contact_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                PRIMARY KEY (contact_id, symbol)
            );

            CREATE TABLE IF NOT EXISTS contact_showcase_unverified_tokens (
                contact_id TEXT NOT NULL,
                contract_address TEXT NOT NULL,
                chain_id INTEGER NOT NULL,
                community_id TEXT NOT NULL,
                sort_order INTEGER NOT NULL,
                PRIMARY KEY (contact_id, contract_address, chain_id)
            );
            ",
        )?;

        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire database lock: {e}")))
    }

    // ==================== Preference Operations ====================

    /// Replaces the stored preference set wholesale.
    ///
    /// All five kinds plus the clock are written in one transaction, so a
    /// reader never observes a half-replaced set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_preferences(&self, preferences: &StoredPreferences) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO showcase_meta (id, clock) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET clock = excluded.clock",
            params![i64::try_from(preferences.clock).unwrap_or(i64::MAX)],
        )?;

        tx.execute("DELETE FROM community_preferences", [])?;
        for preference in &preferences.communities {
            tx.execute(
                "INSERT INTO community_preferences (community_id, visibility, sort_order)
                 VALUES (?1, ?2, ?3)",
                params![
                    &preference.community_id,
                    preference.visibility.as_str(),
                    preference.order,
                ],
            )?;
        }

        tx.execute("DELETE FROM account_preferences", [])?;
        for preference in &preferences.accounts {
            tx.execute(
                "INSERT INTO account_preferences (address, name, color_id, emoji, visibility, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    &preference.address,
                    &preference.name,
                    &preference.color_id,
                    &preference.emoji,
                    preference.visibility.as_str(),
                    preference.order,
                ],
            )?;
        }

        tx.execute("DELETE FROM collectible_preferences", [])?;
        for preference in &preferences.collectibles {
            tx.execute(
                "INSERT INTO collectible_preferences
                     (contract_address, chain_id, token_id, community_id, account_address, visibility, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &preference.contract_address,
                    i64::try_from(preference.chain_id).unwrap_or(i64::MAX),
                    &preference.token_id,
                    &preference.community_id,
                    &preference.account_address,
                    preference.visibility.as_str(),
                    preference.order,
                ],
            )?;
        }

        tx.execute("DELETE FROM verified_token_preferences", [])?;
        for preference in &preferences.verified_tokens {
            tx.execute(
                "INSERT INTO verified_token_preferences (symbol, visibility, sort_order)
                 VALUES (?1, ?2, ?3)",
                params![
                    &preference.symbol,
                    preference.visibility.as_str(),
                    preference.order,
                ],
            )?;
        }

        tx.execute("DELETE FROM unverified_token_preferences", [])?;
        for preference in &preferences.unverified_tokens {
            tx.execute(
                "INSERT INTO unverified_token_preferences
                     (contract_address, chain_id, community_id, visibility, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &preference.contract_address,
                    i64::try_from(preference.chain_id).unwrap_or(i64::MAX),
                    &preference.community_id,
                    preference.visibility.as_str(),
                    preference.order,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Retrieves the full stored preference set.
    ///
    /// Returns a default (empty, clock 0) set when nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored row
    /// carries an unknown visibility value.
    pub fn get_preferences(&self) -> Result<StoredPreferences> {
        let conn = self.lock_conn()?;

        let clock: Option<i64> = conn
            .query_row("SELECT clock FROM showcase_meta WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let mut preferences = StoredPreferences {
            clock: clock.map_or(0, |c| u64::try_from(c).unwrap_or(0)),
            ..StoredPreferences::default()
        };

        let mut stmt = conn.prepare(
            "SELECT community_id, visibility, sort_order
             FROM community_preferences ORDER BY sort_order ASC, community_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })?;
        for row in rows {
            let (community_id, visibility, order) = row?;
            preferences.communities.push(CommunityPreference {
                community_id,
                visibility: parse_visibility(&visibility)?,
                order,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT address, name, color_id, emoji, visibility, sort_order
             FROM account_preferences ORDER BY sort_order ASC, address ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, u32>(5)?,
            ))
        })?;
        for row in rows {
            let (address, name, color_id, emoji, visibility, order) = row?;
            preferences.accounts.push(AccountPreference {
                address,
                name,
                color_id,
                emoji,
                visibility: parse_visibility(&visibility)?,
                order,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT contract_address, chain_id, token_id, community_id, account_address, visibility, sort_order
             FROM collectible_preferences ORDER BY sort_order ASC, contract_address ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, u32>(6)?,
            ))
        })?;
        for row in rows {
            let (contract_address, chain_id, token_id, community_id, account_address, visibility, order) =
                row?;
            preferences.collectibles.push(CollectiblePreference {
                contract_address,
                chain_id: u64::try_from(chain_id).unwrap_or(0),
                token_id,
                community_id,
                account_address,
                visibility: parse_visibility(&visibility)?,
                order,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT symbol, visibility, sort_order
             FROM verified_token_preferences ORDER BY sort_order ASC, symbol ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })?;
        for row in rows {
            let (symbol, visibility, order) = row?;
            preferences.verified_tokens.push(VerifiedTokenPreference {
                symbol,
                visibility: parse_visibility(&visibility)?,
                order,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT contract_address, chain_id, community_id, visibility, sort_order
             FROM unverified_token_preferences ORDER BY sort_order ASC, contract_address ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;
        for row in rows {
            let (contract_address, chain_id, community_id, visibility, order) = row?;
            preferences.unverified_tokens.push(UnverifiedTokenPreference {
                contract_address,
                chain_id: u64::try_from(chain_id).unwrap_or(0),
                community_id,
                visibility: parse_visibility(&visibility)?,
                order,
            });
        }

        Ok(preferences)
    }

    /// Retrieves a single account preference by address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_account_preference(&self, address: &str) -> Result<Option<AccountPreference>> {
        let conn = self.lock_conn()?;

        let result = conn
            .query_row(
                "SELECT address, name, color_id, emoji, visibility, sort_order
                 FROM account_preferences WHERE address = ?1",
                params![address],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, u32>(5)?,
                    ))
                },
            )
            .optional()?;

        match result {
            Some((address, name, color_id, emoji, visibility, order)) => {
                Ok(Some(AccountPreference {
                    address,
                    name,
                    color_id,
                    emoji,
                    visibility: parse_visibility(&visibility)?,
                    order,
                }))
            }
            None => Ok(None),
        }
    }

    /// Saves or updates a single account preference in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_account_preference(&self, preference: &AccountPreference) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            "INSERT INTO account_preferences (address, name, color_id, emoji, visibility, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(address) DO UPDATE SET
                name = excluded.name,
                color_id = excluded.color_id,
                emoji = excluded.emoji,
                visibility = excluded.visibility,
                sort_order = excluded.sort_order",
            params![
                &preference.address,
                &preference.name,
                &preference.color_id,
                &preference.emoji,
                preference.visibility.as_str(),
                preference.order,
            ],
        )?;

        Ok(())
    }

    /// Deletes the account preference for the given address.
    ///
    /// Returns whether a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_account_preference(&self, address: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute(
            "DELETE FROM account_preferences WHERE address = ?1",
            params![address],
        )?;
        Ok(deleted > 0)
    }

    /// Deletes the community preference for the given community id.
    ///
    /// Returns whether a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_community_preference(&self, community_id: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute(
            "DELETE FROM community_preferences WHERE community_id = ?1",
            params![community_id],
        )?;
        Ok(deleted > 0)
    }

    // ==================== Received Showcase Operations ====================

    /// Replaces the stored showcase for one contact wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_showcase(&self, showcase: &Showcase) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn.unchecked_transaction()?;

        Self::clear_showcase_rows(&tx, &showcase.contact_id)?;

        for community in &showcase.communities {
            tx.execute(
                "INSERT INTO contact_showcase_communities
                     (contact_id, community_id, sort_order, membership_status)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    &showcase.contact_id,
                    &community.community_id,
                    community.order,
                    community.membership_status.as_str(),
                ],
            )?;
        }

        for account in &showcase.accounts {
            tx.execute(
                "INSERT INTO contact_showcase_accounts
                     (contact_id, address, name, color_id, emoji, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    &showcase.contact_id,
                    &account.address,
                    &account.name,
                    &account.color_id,
                    &account.emoji,
                    account.order,
                ],
            )?;
        }

        for collectible in &showcase.collectibles {
            tx.execute(
                "INSERT INTO contact_showcase_collectibles
                     (contact_id, contract_address, chain_id, token_id, community_id, account_address, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &showcase.contact_id,
                    &collectible.contract_address,
                    i64::try_from(collectible.chain_id).unwrap_or(i64::MAX),
                    &collectible.token_id,
                    &collectible.community_id,
                    &collectible.account_address,
                    collectible.order,
                ],
            )?;
        }

        for token in &showcase.verified_tokens {
            tx.execute(
                "INSERT INTO contact_showcase_verified_tokens (contact_id, symbol, sort_order)
                 VALUES (?1, ?2, ?3)",
                params![&showcase.contact_id, &token.symbol, token.order],
            )?;
        }

        for token in &showcase.unverified_tokens {
            tx.execute(
                "INSERT INTO contact_showcase_unverified_tokens
                     (contact_id, contract_address, chain_id, community_id, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &showcase.contact_id,
                    &token.contract_address,
                    i64::try_from(token.chain_id).unwrap_or(i64::MAX),
                    &token.community_id,
                    token.order,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn clear_showcase_rows(conn: &Connection, contact_id: &str) -> Result<()> {
        for table in [
            "contact_showcase_communities",
            "contact_showcase_accounts",
            "contact_showcase_collectibles",
            "contact_showcase_verified_tokens",
            "contact_showcase_unverified_tokens",
        ] {
            conn.execute(
                &format!("DELETE FROM {table} WHERE contact_id = ?1"),
                params![contact_id],
            )?;
        }
        Ok(())
    }

    /// Retrieves the stored showcase for one contact.
    ///
    /// Returns an empty showcase when the contact never sent one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored row
    /// carries an unknown membership status.
    pub fn get_showcase(&self, contact_id: &str) -> Result<Showcase> {
        let conn = self.lock_conn()?;

        let mut showcase = Showcase::empty(contact_id.to_string());

        let mut stmt = conn.prepare(
            "SELECT community_id, sort_order, membership_status
             FROM contact_showcase_communities WHERE contact_id = ?1
             ORDER BY sort_order ASC, community_id ASC",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (community_id, order, status) = row?;
            showcase.communities.push(ShowcaseCommunity {
                community_id,
                order,
                membership_status: MembershipStatus::parse(&status).ok_or_else(|| {
                    StoreError::InvalidData(format!("Invalid membership status: {status}"))
                })?,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT address, name, color_id, emoji, sort_order
             FROM contact_showcase_accounts WHERE contact_id = ?1
             ORDER BY sort_order ASC, address ASC",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok(ShowcaseAccount {
                address: row.get(0)?,
                name: row.get(1)?,
                color_id: row.get(2)?,
                emoji: row.get(3)?,
                order: row.get(4)?,
            })
        })?;
        for row in rows {
            showcase.accounts.push(row?);
        }

        let mut stmt = conn.prepare(
            "SELECT contract_address, chain_id, token_id, community_id, account_address, sort_order
             FROM contact_showcase_collectibles WHERE contact_id = ?1
             ORDER BY sort_order ASC, contract_address ASC",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, u32>(5)?,
            ))
        })?;
        for row in rows {
            let (contract_address, chain_id, token_id, community_id, account_address, order) = row?;
            showcase.collectibles.push(ShowcaseCollectible {
                contract_address,
                chain_id: u64::try_from(chain_id).unwrap_or(0),
                token_id,
                community_id,
                account_address,
                order,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT symbol, sort_order
             FROM contact_showcase_verified_tokens WHERE contact_id = ?1
             ORDER BY sort_order ASC, symbol ASC",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok(ShowcaseVerifiedToken {
                symbol: row.get(0)?,
                order: row.get(1)?,
            })
        })?;
        for row in rows {
            showcase.verified_tokens.push(row?);
        }

        let mut stmt = conn.prepare(
            "SELECT contract_address, chain_id, community_id, sort_order
             FROM contact_showcase_unverified_tokens WHERE contact_id = ?1
             ORDER BY sort_order ASC, contract_address ASC",
        )?;
        let rows = stmt.query_map(params![contact_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })?;
        for row in rows {
            let (contract_address, chain_id, community_id, order) = row?;
            showcase.unverified_tokens.push(ShowcaseUnverifiedToken {
                contract_address,
                chain_id: u64::try_from(chain_id).unwrap_or(0),
                community_id,
                order,
            });
        }

        Ok(showcase)
    }

    /// Removes the stored showcase for one contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_showcase(&self, contact_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn.unchecked_transaction()?;
        Self::clear_showcase_rows(&tx, contact_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Finds every contact whose showcase reveals the given wallet address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_showcase_accounts_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<ContactAccountMatch>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            "SELECT contact_id, address, name, color_id, emoji, sort_order
             FROM contact_showcase_accounts WHERE address = ?1
             ORDER BY contact_id ASC",
        )?;
        let rows = stmt.query_map(params![address], |row| {
            Ok(ContactAccountMatch {
                contact_id: row.get(0)?,
                account: ShowcaseAccount {
                    address: row.get(1)?,
                    name: row.get(2)?,
                    color_id: row.get(3)?,
                    emoji: row.get(4)?,
                    order: row.get(5)?,
                },
            })
        })?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }
        Ok(matches)
    }
}

fn parse_visibility(s: &str) -> Result<VisibilityTier> {
    VisibilityTier::parse(s)
        .ok_or_else(|| StoreError::InvalidData(format!("Invalid visibility: {s}")))
}
