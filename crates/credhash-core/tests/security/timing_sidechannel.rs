//! Timing side-channel validation for `verify`.
//!
//! Uses Welch's t-test to check that verification time does not depend on
//! where the stored key first differs from the candidate. Class A stores a
//! key whose first byte is wrong, class B a key whose last byte is wrong.
//! Both are the same length and both must be rejected.
//!
//! **Methodology:** simplified dudect-style analysis:
//! 1. Build two records that differ from the true key at byte 0 / byte 31
//! 2. Time N calls of `verify` for each, interleaved, alternating order
//! 3. Compute Welch's t-statistic on the two timing distributions
//! 4. Assert |t| < 4.5
//!
//! **Caveat:** statistical test. Scheduler noise can in rare cases push |t|
//! over the threshold. The iteration count is 1 so the comparison is a
//! large share of the measured time.

use std::time::Instant;

use credhash_core::{derive_with_salt, verify, EncodedRecord, ParameterSet};

/// Number of timing samples per class.
const SAMPLES: usize = 10_000;

/// Welch's t-test threshold. |t| < 4.5 means no detectable timing difference.
const T_THRESHOLD: f64 = 4.5;

const PASSWORD: &[u8] = b"timing-test-password";

#[inline(never)]
fn black_box_verify(record: &EncodedRecord) -> bool {
    let result = verify(PASSWORD, record).expect("verify should not error during timing test");
    std::hint::black_box(result)
}

fn time_once(record: &EncodedRecord) -> f64 {
    let start = Instant::now();
    let _ = black_box_verify(record);
    #[allow(clippy::cast_precision_loss)]
    let elapsed = start.elapsed().as_nanos() as f64;
    elapsed
}

/// Compute Welch's t-statistic for two independent samples.
///
/// `t = (mean_a - mean_b) / sqrt(var_a/n_a + var_b/n_b)`
#[allow(clippy::cast_precision_loss)]
fn welch_t_statistic(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 || b.len() < 2 {
        return f64::NAN;
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let mean_a: f64 = a.iter().sum::<f64>() / n_a;
    let mean_b: f64 = b.iter().sum::<f64>() / n_b;

    let var_a: f64 = a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>() / (n_a - 1.0);
    let var_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / (n_b - 1.0);

    let denominator = (var_a / n_a + var_b / n_b).sqrt();
    if denominator == 0.0 {
        return 0.0; // Both distributions are constant.
    }

    (mean_a - mean_b) / denominator
}

fn with_flipped_byte(record: &EncodedRecord, index: usize) -> EncodedRecord {
    let mut key = record.derived_key().to_vec();
    key[index] ^= 0xff;
    EncodedRecord::new(
        record.algorithm(),
        record.iterations().get(),
        record.salt().to_vec(),
        key,
    )
    .expect("tampered record is still well-formed")
}

#[test]
fn verify_first_vs_last_byte_mismatch_no_timing_leak() {
    let params = ParameterSet::with_iterations(1).expect("valid params");
    let genuine = derive_with_salt(PASSWORD, &[0x11; 16], &params).expect("derive");
    let last = genuine.derived_key().len() - 1;

    let first_wrong = with_flipped_byte(&genuine, 0);
    let last_wrong = with_flipped_byte(&genuine, last);
    assert!(!black_box_verify(&first_wrong));
    assert!(!black_box_verify(&last_wrong));

    // Warm up caches and branch predictors.
    for _ in 0..200 {
        black_box_verify(&first_wrong);
        black_box_verify(&last_wrong);
    }

    let mut times_a = Vec::with_capacity(SAMPLES);
    let mut times_b = Vec::with_capacity(SAMPLES);

    // Alternate which class goes first so ordering effects cancel out.
    for i in 0..SAMPLES {
        if i % 2 == 0 {
            times_a.push(time_once(&first_wrong));
            times_b.push(time_once(&last_wrong));
        } else {
            times_b.push(time_once(&last_wrong));
            times_a.push(time_once(&first_wrong));
        }
    }

    let abs_t = welch_t_statistic(&times_a, &times_b).abs();

    eprintln!(
        "Timing side-channel test: |t| = {abs_t:.2} (threshold: {T_THRESHOLD}), \
         samples = {SAMPLES} per class"
    );

    assert!(
        abs_t < T_THRESHOLD,
        "Timing side-channel detected: |t| = {abs_t:.2} exceeds threshold {T_THRESHOLD}. \
         verify may leak the position of the first differing byte."
    );
}

/// Two identical constant distributions should yield t = 0.
#[test]
fn welch_t_test_identical_distributions() {
    let a = vec![1.0; 100];
    let b = vec![1.0; 100];
    let t = welch_t_statistic(&a, &b);
    assert!(t.abs() < 0.001, "identical distributions should yield t ≈ 0, got {t}");
}

/// Mean 100 vs mean 200 with low variance should produce |t| >> 4.5.
#[test]
fn welch_t_test_different_distributions() {
    let a: Vec<f64> = (0..1000).map(|i| 100.0 + f64::from(i % 3)).collect();
    let b: Vec<f64> = (0..1000).map(|i| 200.0 + f64::from(i % 3)).collect();
    let t = welch_t_statistic(&a, &b);
    assert!(t.abs() > 100.0, "clearly different distributions should yield |t| >> 4.5, got {t:.2}");
}
