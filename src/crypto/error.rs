//! Error types for envelope sealing and opening.

use thiserror::Error;

/// Error type for cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key material had the wrong length.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Ciphertext too short to contain a nonce and authentication tag.
    #[error("Malformed ciphertext: {0} bytes is shorter than nonce + tag")]
    MalformedCiphertext(usize),

    /// AEAD authentication failed.
    ///
    /// During a multi-recipient open this is the expected outcome for every
    /// wrapped key that was not addressed to us; callers skip it there and
    /// treat it as fatal everywhere else.
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// A wrapped key authenticated correctly but decrypted to something
    /// that is not a valid symmetric key. Distinct from "not the intended
    /// recipient": this indicates a malformed publication.
    #[error("Recovered payload key is empty or malformed")]
    EmptyRecoveredKey,

    /// Encryption failed.
    #[error("Encryption error: {0}")]
    Encryption(String),
}

/// Result type alias for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
