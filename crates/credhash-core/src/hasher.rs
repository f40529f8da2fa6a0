//! Password hash creation.
//!
//! [`derive`] draws a fresh salt from the OS CSPRNG on every call and
//! packages the result as an [`EncodedRecord`]. The plaintext password never
//! leaves the call: it is not logged, stored or echoed in errors.

use std::num::NonZeroU32;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::CredentialError;
use crate::kdf::derive_key;
use crate::params::ParameterSet;
use crate::record::EncodedRecord;

/// Hash `password` under `params` with a freshly generated salt.
///
/// The password is treated as raw bytes; no encoding is assumed. Password
/// policy (minimum length, complexity) is the caller's concern.
///
/// # Errors
///
/// - `CredentialError::InvalidParameters` if `params` fails validation. No
///   randomness is drawn and no derivation work is done in that case.
/// - `CredentialError::EntropyUnavailable` if the OS random source fails.
pub fn derive(password: &[u8], params: &ParameterSet) -> Result<EncodedRecord, CredentialError> {
    params.validate()?;
    let salt = generate_salt(params.salt_length)?;
    derive_record(password, salt, params)
}

/// Hash `password` under `params` with a caller-supplied salt.
///
/// Deterministic: identical inputs always produce an identical record. Meant
/// for known-answer tests and migration tooling; use [`derive`] for new
/// credentials.
///
/// # Errors
///
/// Returns `CredentialError::InvalidParameters` if `params` fails validation
/// or `salt.len()` differs from `params.salt_length`.
pub fn derive_with_salt(
    password: &[u8],
    salt: &[u8],
    params: &ParameterSet,
) -> Result<EncodedRecord, CredentialError> {
    params.validate()?;
    if salt.len() != params.salt_length {
        return Err(CredentialError::InvalidParameters(format!(
            "salt is {} bytes, parameter set requires {}",
            salt.len(),
            params.salt_length
        )));
    }
    derive_record(password, salt.to_vec(), params)
}

/// Hash `password` with the default parameter set and return the encoded
/// text, ready for storage.
///
/// # Errors
///
/// Returns `CredentialError::EntropyUnavailable` if the OS random source
/// fails.
pub fn hash_password(password: &[u8]) -> Result<String, CredentialError> {
    derive(password, &ParameterSet::default()).map(|record| record.encode())
}

/// Fill a new buffer of `len` bytes from the OS CSPRNG.
fn generate_salt(len: usize) -> Result<Vec<u8>, CredentialError> {
    let mut salt = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CredentialError::EntropyUnavailable(format!("CSPRNG fill failed: {e}")))?;
    Ok(salt)
}

/// Shared tail of [`derive`] and [`derive_with_salt`]; `params` is already
/// validated.
fn derive_record(
    password: &[u8],
    salt: Vec<u8>,
    params: &ParameterSet,
) -> Result<EncodedRecord, CredentialError> {
    let iterations = NonZeroU32::new(params.iterations).ok_or_else(|| {
        CredentialError::InvalidParameters("iterations must be greater than zero".into())
    })?;

    let mut key = Zeroizing::new(vec![0u8; params.derived_key_length]);
    derive_key(params.algorithm, iterations, &salt, password, &mut key)?;

    tracing::debug!(
        algorithm = %params.algorithm,
        iterations = params.iterations,
        key_len = params.derived_key_length,
        salt_len = params.salt_length,
        "derived password hash"
    );

    EncodedRecord::new(params.algorithm, params.iterations, salt, key.to_vec())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
