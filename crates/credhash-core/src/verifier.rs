//! Password verification against a stored record.
//!
//! The candidate key is always derived at the stored key's length, and the
//! comparison runs over that fixed length with `subtle`, so neither the
//! position of the first differing byte nor a length difference is visible
//! in timing.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::CredentialError;
use crate::kdf::derive_key;
use crate::params::ParameterSet;
use crate::record::{decode, EncodedRecord};

/// Check `password` against `record`.
///
/// Re-derives with the record's algorithm, salt and iteration count, never
/// with current defaults.
///
/// # Errors
///
/// Returns `CredentialError::InvalidParameters` only if the record's key
/// length cannot be derived, which record construction already rules out.
pub fn verify(password: &[u8], record: &EncodedRecord) -> Result<bool, CredentialError> {
    let expected = record.derived_key();
    let mut candidate = Zeroizing::new(vec![0u8; expected.len()]);
    derive_key(
        record.algorithm(),
        record.iterations(),
        record.salt(),
        password,
        &mut candidate,
    )?;

    let matched = constant_time_eq(expected, &candidate);

    tracing::debug!(
        algorithm = %record.algorithm(),
        iterations = record.iterations().get(),
        "password verification completed"
    );
    Ok(matched)
}

/// Decode `encoded` and check `password` against it.
///
/// # Errors
///
/// - `CredentialError::MalformedRecord` if `encoded` does not parse.
/// - `CredentialError::UnsupportedAlgorithm` if it names an unknown
///   algorithm. A record that cannot be checked is never reported as a
///   wrong password.
pub fn verify_password(password: &[u8], encoded: &str) -> Result<bool, CredentialError> {
    let record = decode(encoded)?;
    verify(password, &record)
}

/// Whether `record` should be re-hashed under `policy` after a successful
/// login.
///
/// True when the algorithm differs, the iteration count is lower, the key
/// length differs, or the salt is shorter than the policy asks for.
#[must_use]
pub fn needs_rehash(record: &EncodedRecord, policy: &ParameterSet) -> bool {
    let stale = record.algorithm() != policy.algorithm
        || record.iterations().get() < policy.iterations
        || record.derived_key().len() != policy.derived_key_length
        || record.salt().len() < policy.salt_length;

    if stale {
        tracing::debug!(
            from_algorithm = %record.algorithm(),
            from_iterations = record.iterations().get(),
            to_algorithm = %policy.algorithm,
            to_iterations = policy.iterations,
            "stored hash is below current policy"
        );
    }
    stale
}

/// Compare `candidate` to `expected` over exactly `expected.len()` bytes.
///
/// A candidate of a different length is copied into a zero-padded buffer of
/// the expected length and still compared in full; the length check is
/// folded in as a `Choice`, not a branch.
fn constant_time_eq(expected: &[u8], candidate: &[u8]) -> bool {
    let mut padded = Zeroizing::new(vec![0u8; expected.len()]);
    let n = core::cmp::min(expected.len(), candidate.len());
    if let (Some(dest), Some(src)) = (padded.get_mut(..n), candidate.get(..n)) {
        dest.copy_from_slice(src);
    }

    let len_equal = expected.len().ct_eq(&candidate.len());
    let content_equal = expected.ct_eq(padded.as_slice());
    (len_equal & content_equal).into()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
