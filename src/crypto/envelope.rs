//! Multi-recipient envelope sealing.
//!
//! One sealed payload can be shared with any number of recipients without a
//! group key: the payload is encrypted once under a fresh 256-bit key, and
//! that key is wrapped once per recipient under a key derived (HKDF-SHA256)
//! from the static-static X25519 secret between publisher and recipient.
//! Payload size is O(entries) + O(recipients).
//!
//! Opening walks the wrapped keys in order. An authentication failure on a
//! wrapped key means "not addressed to us" and is skipped; exhausting all
//! candidates yields an explicit empty result, not an error. Everything
//! else is fatal.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::error::{CryptoError, Result};
use super::keys::{IdentityPrivateKey, IdentityPublicKey, SharedSecret};

/// Size of the symmetric payload key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of the XChaCha20 nonce in bytes (192 bits).
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// HKDF info string binding wrap keys to this protocol.
const WRAP_KEY_INFO: &[u8] = b"vitrine showcase key wrap v1";

/// A sealed payload: one ciphertext plus one wrapped payload key per
/// intended recipient.
///
/// Each blob is `nonce || ciphertext || tag`. The wrapped-key list carries
/// no recipient identifiers; a recipient finds its key by trial decryption.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPayload {
    /// The entry payload, encrypted under the per-publication key.
    pub ciphertext: Vec<u8>,
    /// The per-publication key, wrapped once per recipient.
    pub wrapped_keys: Vec<Vec<u8>>,
}

impl std::fmt::Debug for SealedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedPayload")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("recipients", &self.wrapped_keys.len())
            .finish()
    }
}

/// Encrypts `plaintext` under `key`, returning `nonce || ciphertext || tag`.
fn encrypt_raw(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.into());
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("XChaCha20-Poly1305 encryption failed".into()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypts a `nonce || ciphertext || tag` blob under `key`.
fn decrypt_raw(key: &[u8; KEY_SIZE], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::MalformedCiphertext(data.len()));
    }
    let (nonce, ciphertext) = data.split_at(NONCE_SIZE);

    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

/// Derives the key-wrap key for one publisher/recipient pair.
fn derive_wrap_key(shared: &SharedSecret) -> Zeroizing<[u8; KEY_SIZE]> {
    let hkdf = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
    hkdf.expand(WRAP_KEY_INFO, okm.as_mut())
        .expect("32 bytes is a valid HKDF-SHA256 output length");
    okm
}

/// Seals `plaintext` for a set of recipients.
///
/// A fresh payload key is generated on every call and never reused across
/// publications. Sealing for an empty recipient set is valid: the payload
/// is encrypted but nobody will be able to open it.
///
/// # Errors
///
/// Returns an error if encryption of the payload or of any wrapped key
/// fails.
pub fn seal(
    identity: &IdentityPrivateKey,
    recipients: &[IdentityPublicKey],
    plaintext: &[u8],
) -> Result<SealedPayload> {
    let mut payload_key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(payload_key.as_mut());

    let ciphertext = encrypt_raw(&payload_key, plaintext)?;

    let mut wrapped_keys = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        let shared = identity.diffie_hellman(recipient);
        let wrap_key = derive_wrap_key(&shared);
        wrapped_keys.push(encrypt_raw(&wrap_key, payload_key.as_ref())?);
    }

    Ok(SealedPayload {
        ciphertext,
        wrapped_keys,
    })
}

/// Attempts to open a sealed payload addressed by `sender`.
///
/// Returns `Ok(None)` when none of the wrapped keys were addressed to this
/// identity; the publication may legitimately target other recipients.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedCiphertext`] for a structurally invalid
/// wrapped key, [`CryptoError::EmptyRecoveredKey`] when a wrapped key
/// authenticates but does not contain a valid payload key, and any failure
/// decrypting the main ciphertext once a key has been recovered.
pub fn open(
    identity: &IdentityPrivateKey,
    sender: &IdentityPublicKey,
    sealed: &SealedPayload,
) -> Result<Option<Vec<u8>>> {
    let shared = identity.diffie_hellman(sender);
    let wrap_key = derive_wrap_key(&shared);

    for wrapped in &sealed.wrapped_keys {
        match decrypt_raw(&wrap_key, wrapped) {
            Ok(recovered) => {
                let recovered = Zeroizing::new(recovered);
                if recovered.len() != KEY_SIZE {
                    return Err(CryptoError::EmptyRecoveredKey);
                }
                let mut payload_key = Zeroizing::new([0u8; KEY_SIZE]);
                payload_key.copy_from_slice(&recovered);

                // A recovered key must open the payload; failure here is a
                // protocol violation, not a recipient mismatch.
                return decrypt_raw(&payload_key, &sealed.ciphertext).map(Some);
            }
            // Wrong recipient: try the next candidate.
            Err(CryptoError::AuthenticationFailure) => {}
            Err(err) => return Err(err),
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypairs(n: usize) -> Vec<IdentityPrivateKey> {
        (0..n).map(|_| IdentityPrivateKey::generate()).collect()
    }

    #[test]
    fn every_recipient_recovers_plaintext() {
        let publisher = IdentityPrivateKey::generate();
        let recipients = keypairs(3);
        let public: Vec<_> = recipients.iter().map(IdentityPrivateKey::public_key).collect();

        let sealed = seal(&publisher, &public, b"showcase entries").unwrap();
        assert_eq!(sealed.wrapped_keys.len(), 3);

        for recipient in &recipients {
            let opened = open(recipient, &publisher.public_key(), &sealed).unwrap();
            assert_eq!(opened.as_deref(), Some(b"showcase entries".as_slice()));
        }
    }

    #[test]
    fn non_recipient_gets_empty_result() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();
        let outsider = IdentityPrivateKey::generate();

        let sealed = seal(&publisher, &[recipient.public_key()], b"secret").unwrap();
        let opened = open(&outsider, &publisher.public_key(), &sealed).unwrap();

        assert!(opened.is_none());
    }

    #[test]
    fn empty_recipient_set_opens_to_none() {
        let publisher = IdentityPrivateKey::generate();
        let anyone = IdentityPrivateKey::generate();

        let sealed = seal(&publisher, &[], b"nobody reads this").unwrap();
        assert!(sealed.wrapped_keys.is_empty());

        let opened = open(&anyone, &publisher.public_key(), &sealed).unwrap();
        assert!(opened.is_none());
    }

    #[test]
    fn recipient_position_does_not_matter() {
        let publisher = IdentityPrivateKey::generate();
        let recipients = keypairs(4);
        let public: Vec<_> = recipients.iter().map(IdentityPrivateKey::public_key).collect();

        let sealed = seal(&publisher, &public, b"ordered").unwrap();

        // The last-listed recipient must skip three foreign keys first.
        let opened = open(&recipients[3], &publisher.public_key(), &sealed).unwrap();
        assert_eq!(opened.as_deref(), Some(b"ordered".as_slice()));
    }

    #[test]
    fn payload_key_is_fresh_per_seal() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();

        let a = seal(&publisher, &[recipient.public_key()], b"same").unwrap();
        let b = seal(&publisher, &[recipient.public_key()], b"same").unwrap();

        assert_ne!(a.ciphertext, b.ciphertext);
        assert_ne!(a.wrapped_keys[0], b.wrapped_keys[0]);
    }

    #[test]
    fn tampered_payload_is_fatal_for_addressed_recipient() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();

        let mut sealed = seal(&publisher, &[recipient.public_key()], b"payload").unwrap();
        let last = sealed.ciphertext.len() - 1;
        sealed.ciphertext[last] ^= 0xFF;

        let result = open(&recipient, &publisher.public_key(), &sealed);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
    }

    #[test]
    fn malformed_wrapped_key_is_fatal() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();

        let mut sealed = seal(&publisher, &[recipient.public_key()], b"payload").unwrap();
        sealed.wrapped_keys.insert(0, vec![0u8; 5]);

        let result = open(&recipient, &publisher.public_key(), &sealed);
        assert!(matches!(result, Err(CryptoError::MalformedCiphertext(5))));
    }

    #[test]
    fn authenticated_but_invalid_key_is_a_protocol_error() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();

        // Craft a wrapped key that authenticates under the pairwise wrap
        // key but contains garbage instead of a payload key.
        let shared = publisher.diffie_hellman(&recipient.public_key());
        let wrap_key = derive_wrap_key(&shared);
        let bogus = encrypt_raw(&wrap_key, b"short").unwrap();

        let sealed = SealedPayload {
            ciphertext: encrypt_raw(&[7u8; KEY_SIZE], b"payload").unwrap(),
            wrapped_keys: vec![bogus],
        };

        let result = open(&recipient, &publisher.public_key(), &sealed);
        assert!(matches!(result, Err(CryptoError::EmptyRecoveredKey)));
    }

    #[test]
    fn sealed_payload_round_trips_through_bincode() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();

        let sealed = seal(&publisher, &[recipient.public_key()], b"wire").unwrap();
        let bytes = bincode::serialize(&sealed).unwrap();
        let restored: SealedPayload = bincode::deserialize(&bytes).unwrap();

        assert_eq!(sealed, restored);
        let opened = open(&recipient, &publisher.public_key(), &restored).unwrap();
        assert_eq!(opened.as_deref(), Some(b"wire".as_slice()));
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let publisher = IdentityPrivateKey::generate();
        let recipient = IdentityPrivateKey::generate();

        let sealed = seal(&publisher, &[recipient.public_key()], b"").unwrap();
        let opened = open(&recipient, &publisher.public_key(), &sealed).unwrap();
        assert_eq!(opened.as_deref(), Some(b"".as_slice()));
    }
}
