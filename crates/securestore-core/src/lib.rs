//! Primitives adapter, address/key derivation, canonical serialization,
//! and envelope codecs for the securestore end-to-end encrypted file
//! store.
//!
//! This crate has no notion of users, filenames, or sharing. It only
//! derives addresses and keys from credentials and seals/opens the two
//! envelope shapes those higher-level records are stored as. See
//! `securestore-client` for the object model built on top of it.

pub mod codec;
pub mod derivation;
pub mod envelope;
pub mod error;
pub mod params;
pub mod primitives;

pub use error::CoreError;
pub use params::Params;
