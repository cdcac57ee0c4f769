//! Vitrine Core Library
//!
//! Core functionality for Vitrine - tiered-visibility profile showcase
//! sharing. A user curates which wallet accounts, communities, collectibles,
//! and tokens to reveal to each audience tier; this crate validates the
//! configuration, seals the non-public tiers for their recipient sets, and
//! reconciles showcases received from peers into per-contact state.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod crypto;
pub mod showcase;

pub use showcase::service::ShowcaseService;
