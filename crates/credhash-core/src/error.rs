//! Error types for `credhash-core`.

use thiserror::Error;

/// Errors produced by password hashing and verification.
///
/// Messages carry field names and numeric values only. Passwords, salts and
/// derived keys never appear in them.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The OS random source could not supply salt bytes.
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),

    /// Cost parameters are out of range (zero iterations, empty salt, ...).
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Encoded record failed structural or length validation.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The record names an algorithm this crate does not implement.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
