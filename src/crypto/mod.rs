//! Cryptographic primitives for showcase publication.
//!
//! The showcase protocol shares one serialized payload with many recipients
//! without a group key: each publication encrypts the payload under a fresh
//! symmetric key, then wraps that key once per recipient under a key derived
//! from a static-static X25519 exchange between the publisher's identity key
//! and the recipient's identity key.

pub mod envelope;
mod error;
pub mod keys;

pub use error::{CryptoError, Result};
