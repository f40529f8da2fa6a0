//! `credhash-core` — salted PBKDF2 password hashing and verification.
//!
//! Zero network, zero async, no global state. Every hash is stored as a
//! self-describing record (`algorithm:iterations:salt:key`) so cost
//! parameters can rise over time without invalidating existing hashes.
//!
//! ```
//! use credhash_core::{derive, verify, ParameterSet};
//!
//! let params = ParameterSet::with_iterations(1_000)?;
//! let record = derive(b"correct horse battery staple", &params)?;
//! let stored = record.encode();
//!
//! let record: credhash_core::EncodedRecord = stored.parse()?;
//! assert!(verify(b"correct horse battery staple", &record)?);
//! assert!(!verify(b"Tr0ub4dor&3", &record)?);
//! # Ok::<(), credhash_core::CredentialError>(())
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod params;

pub mod kdf;

pub mod hasher;
pub mod verifier;

pub mod record;

pub use error::CredentialError;
pub use hasher::{derive, derive_with_salt, hash_password};
pub use kdf::{calibrate, derive_key};
pub use params::{
    Algorithm, CostPreset, ParameterSet, DEFAULT_KEY_LEN, DEFAULT_SALT_LEN, MAX_KEY_LEN,
    MAX_SALT_LEN,
};
pub use record::{decode, encode, EncodedRecord};
pub use verifier::{needs_rehash, verify, verify_password};
