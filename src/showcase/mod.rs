//! Tiered-visibility profile showcase.
//!
//! A showcase is a partially-encrypted snapshot of what a user chooses to
//! reveal about themselves: communities, wallet accounts, collectibles,
//! and tokens, each pinned to an audience tier. The local side validates
//! and persists preferences, projects them per tier, and seals the
//! non-public tiers for their recipients; the receiving side opens what
//! it can, derives trust for community claims, and reconciles the result
//! into durable per-contact state.
//!
//! [`service::ShowcaseService`] is the only entry point callers need; the
//! submodules carry the individual stages.

pub mod collaborators;
mod error;
pub mod projector;
pub mod reconciler;
pub mod service;
pub mod storage;
pub mod types;
pub mod validator;

pub use error::{ProtocolError, Result, ShowcaseError, StoreError, ValidationError};
