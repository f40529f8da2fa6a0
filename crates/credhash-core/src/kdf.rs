//! PBKDF2 key derivation and iteration calibration.
//!
//! This module provides:
//! - [`derive_key`] — raw PBKDF2-HMAC derivation into a caller buffer
//! - [`calibrate`] — benchmark hardware and return a parameter set that hits
//!   a target derivation time
//!
//! Both the hasher and the verifier go through [`derive_key`], so a record
//! created on one side is always reproducible on the other.

use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use zeroize::Zeroize;

use crate::error::CredentialError;
use crate::params::{
    Algorithm, CostPreset, ParameterSet, DEFAULT_KEY_LEN, DEFAULT_SALT_LEN, MAX_KEY_LEN,
};

/// Iterations used for the calibration probe.
const PROBE_ITERATIONS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Core KDF
// ---------------------------------------------------------------------------

/// Derive `out.len()` bytes from `password` and `salt` with PBKDF2.
///
/// The output length is taken from `out`; the verifier sizes that buffer
/// from the stored key, never from the candidate.
///
/// # Errors
///
/// Returns `CredentialError::InvalidParameters` if `out` is empty or longer
/// than the crate-wide key length bound.
pub fn derive_key(
    algorithm: Algorithm,
    iterations: NonZeroU32,
    salt: &[u8],
    password: &[u8],
    out: &mut [u8],
) -> Result<(), CredentialError> {
    if out.is_empty() || out.len() > MAX_KEY_LEN {
        return Err(CredentialError::InvalidParameters(format!(
            "derived key length {} outside 1..={MAX_KEY_LEN}",
            out.len()
        )));
    }

    ring::pbkdf2::derive(
        algorithm.to_ring_algorithm(),
        iterations,
        salt,
        password,
        out,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// Benchmark the current hardware and return a parameter set whose
/// derivation takes roughly `target`.
///
/// A probe of 10 000 iterations is timed and scaled linearly. The result
/// never drops below [`CostPreset::Fast`].
///
/// # Errors
///
/// Returns `CredentialError::InvalidParameters` if `target` is zero.
pub fn calibrate(algorithm: Algorithm, target: Duration) -> Result<ParameterSet, CredentialError> {
    if target.is_zero() {
        return Err(CredentialError::InvalidParameters(
            "calibration target must be non-zero".into(),
        ));
    }

    let probe = NonZeroU32::new(PROBE_ITERATIONS).ok_or_else(|| {
        CredentialError::InvalidParameters("probe iterations must be non-zero".into())
    })?;
    let salt = [0u8; DEFAULT_SALT_LEN];
    let mut out = [0u8; DEFAULT_KEY_LEN];

    let start = Instant::now();
    derive_key(algorithm, probe, &salt, b"calibration_probe", &mut out)?;
    let elapsed = start.elapsed();
    out.zeroize();

    let iterations = scale_iterations(PROBE_ITERATIONS, elapsed, target)
        .max(CostPreset::Fast.iterations());

    tracing::debug!(
        algorithm = %algorithm,
        probe_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        target_ms = u64::try_from(target.as_millis()).unwrap_or(u64::MAX),
        iterations,
        "calibrated iteration count"
    );

    ParameterSet::new(algorithm, iterations, DEFAULT_KEY_LEN, DEFAULT_SALT_LEN)
}

/// Scale a probe iteration count from `elapsed` to `target`, saturating at
/// `u32::MAX`.
fn scale_iterations(probe: u32, elapsed: Duration, target: Duration) -> u32 {
    let elapsed_ns = elapsed.as_nanos().max(1);
    let scaled = u128::from(probe)
        .saturating_mul(target.as_nanos())
        .checked_div(elapsed_ns)
        .unwrap_or(u128::MAX);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
