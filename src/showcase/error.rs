//! Error types for showcase operations.
//!
//! Validation failures are always surfaced before anything is persisted;
//! reconciliation failures abort the whole message with no partial state.
//! Trust-evaluation problems are deliberately *not* errors: they degrade
//! the affected entry's membership status instead (see the reconciler).

use thiserror::Error;

use super::collaborators::{OracleError, TransportError};
use crate::crypto::CryptoError;

/// Error type for preference validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Two account preferences share one address.
    #[error("Duplicate account address: {0}")]
    DuplicateAccount(String),

    /// A collectible's token id is not a non-negative decimal literal.
    #[error("Token id not parsable: {0:?}")]
    TokenIdNotParsable(String),

    /// No oracle-reported holder of the collectible appears among the
    /// declared account addresses.
    #[error("No showcased account holds collectible {contract_address}/{token_id}")]
    OwnerNotPresented {
        /// Token contract address.
        contract_address: String,
        /// Token id.
        token_id: String,
    },

    /// The holding account's audience is narrower than the collectible's.
    #[error("Account {account_address} is less visible than a collectible it holds")]
    AccountVisibilityTooRestrictive {
        /// Address of the too-restricted account.
        account_address: String,
    },

    /// The ownership oracle could not answer.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Error type for persistence operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Storage operation failed outside of `SQLite` itself.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored row could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Error type for reconciling an incoming showcase.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Envelope opening failed beyond the tolerated recipient-mismatch
    /// case.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Decrypted or plaintext bytes did not decode into entries.
    #[error("Entry decode failed: {0}")]
    Decode(String),

    /// Reading or writing reconciled state failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Umbrella error for the service facade.
#[derive(Error, Debug)]
pub enum ShowcaseError {
    /// Preference validation failed; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Sealing a tier failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Outbound dispatch failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A device-sync payload did not encode or decode.
    #[error("Sync payload codec failed: {0}")]
    Decode(String),
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ShowcaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_account_display() {
        let err = ValidationError::DuplicateAccount("0xabc".to_string());
        assert_eq!(err.to_string(), "Duplicate account address: 0xabc");
    }

    #[test]
    fn owner_not_presented_display() {
        let err = ValidationError::OwnerNotPresented {
            contract_address: "0xc0ffee".to_string(),
            token_id: "7".to_string(),
        };
        assert!(err.to_string().contains("0xc0ffee/7"));
    }

    #[test]
    fn oracle_error_passes_through_validation() {
        let err: ValidationError = OracleError::Lookup("down".to_string()).into();
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn crypto_error_passes_through_protocol() {
        let err: ProtocolError = CryptoError::EmptyRecoveredKey.into();
        assert!(err.to_string().contains("Recovered payload key"));
    }
}
