//! X25519 identity keys.
//!
//! Each user and each contact is identified by a static X25519 key. The
//! showcase core only ever reads key material: generation and rotation
//! happen in the host application.
//!
//! # Security Notes
//!
//! - Private keys and shared secrets are zeroized on drop
//! - `Debug` impls never print secret bytes

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{CryptoError, Result};

/// Size of an X25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an X25519 private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a derived shared secret in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// Public half of a static X25519 identity key.
///
/// This is the identifier a peer presents on the wire; grant member ids are
/// compared against these bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityPublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl IdentityPublicKey {
    /// Creates a public key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; PUBLIC_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Returns the key as a byte array reference.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Returns the key as an owned byte array.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.bytes
    }
}

impl std::fmt::Debug for IdentityPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityPublicKey({}..)", hex::encode(&self.bytes[..4]))
    }
}

impl From<PublicKey> for IdentityPublicKey {
    fn from(key: PublicKey) -> Self {
        Self {
            bytes: key.to_bytes(),
        }
    }
}

impl From<&IdentityPublicKey> for PublicKey {
    fn from(key: &IdentityPublicKey) -> Self {
        Self::from(key.bytes)
    }
}

/// Private half of a static X25519 identity key.
///
/// Read-only to this crate: the host application owns generation and
/// persistence. Zeroized on drop; intentionally not `Clone` so secret
/// material is not duplicated by accident.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct IdentityPrivateKey {
    bytes: [u8; PRIVATE_KEY_SIZE],
}

impl IdentityPrivateKey {
    /// Generates a new random private key.
    ///
    /// Provided for tests and first-run provisioning in the host app.
    #[must_use]
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        Self {
            bytes: secret.to_bytes(),
        }
    }

    /// Creates a private key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; PRIVATE_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Returns the raw key bytes for persistence by the host application.
    ///
    /// The caller is responsible for zeroizing the returned copy.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.bytes
    }

    /// Returns the corresponding public key.
    #[must_use]
    pub fn public_key(&self) -> IdentityPublicKey {
        let secret = StaticSecret::from(self.bytes);
        IdentityPublicKey::from(PublicKey::from(&secret))
    }

    /// Performs a static-static Diffie-Hellman exchange with a peer key.
    ///
    /// Both sides derive the same secret: the publisher pairs its private
    /// key with each recipient's public key, and a recipient pairs its
    /// private key with the claimed sender public key.
    #[must_use]
    pub fn diffie_hellman(&self, peer: &IdentityPublicKey) -> SharedSecret {
        let secret = StaticSecret::from(self.bytes);
        let shared = secret.diffie_hellman(&PublicKey::from(peer));
        SharedSecret {
            bytes: shared.to_bytes(),
        }
    }
}

impl std::fmt::Debug for IdentityPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityPrivateKey([REDACTED])")
    }
}

/// Shared secret from a Diffie-Hellman exchange.
///
/// Input to a KDF, never used directly as an encryption key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Returns the shared secret bytes for key derivation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_has_public_half() {
        let key = IdentityPrivateKey::generate();
        assert_eq!(key.public_key().as_bytes().len(), PUBLIC_KEY_SIZE);
    }

    #[test]
    fn exchange_is_commutative() {
        let alice = IdentityPrivateKey::generate();
        let bob = IdentityPrivateKey::generate();

        let ab = alice.diffie_hellman(&bob.public_key());
        let ba = bob.diffie_hellman(&alice.public_key());

        assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    #[test]
    fn different_peers_produce_different_secrets() {
        let alice = IdentityPrivateKey::generate();
        let bob = IdentityPrivateKey::generate();
        let carol = IdentityPrivateKey::generate();

        let ab = alice.diffie_hellman(&bob.public_key());
        let ac = alice.diffie_hellman(&carol.public_key());

        assert_ne!(ab.as_bytes(), ac.as_bytes());
    }

    #[test]
    fn private_key_round_trips_through_bytes() {
        let original = IdentityPrivateKey::generate();
        let restored = IdentityPrivateKey::from_bytes(&original.bytes).unwrap();
        assert_eq!(restored.public_key(), original.public_key());
    }

    #[test]
    fn public_key_round_trips_through_bytes() {
        let public = IdentityPrivateKey::generate().public_key();
        let restored = IdentityPublicKey::from_bytes(&public.to_bytes()).unwrap();
        assert_eq!(public, restored);
    }

    #[test]
    fn invalid_key_length_rejected() {
        let short = [0u8; 16];
        assert!(IdentityPublicKey::from_bytes(&short).is_err());
        assert!(IdentityPrivateKey::from_bytes(&short).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let private = IdentityPrivateKey::generate();
        let shared = private.diffie_hellman(&IdentityPrivateKey::generate().public_key());

        assert!(format!("{private:?}").contains("REDACTED"));
        assert!(format!("{shared:?}").contains("REDACTED"));
    }

    #[test]
    fn public_key_debug_shows_fingerprint() {
        let public = IdentityPrivateKey::generate().public_key();
        let debug = format!("{public:?}");
        assert!(debug.contains("IdentityPublicKey"));
        assert!(!debug.contains("REDACTED"));
    }
}
