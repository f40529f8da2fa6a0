//! Algorithm identifiers and cost parameters.
//!
//! A [`ParameterSet`] is embedded in every encoded record, so raising the
//! default cost later never invalidates hashes that already exist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

/// Default derived key length in bytes (256 bits).
pub const DEFAULT_KEY_LEN: usize = 32;

/// Default salt length in bytes.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Upper bound on the derived key length accepted anywhere in the crate.
pub const MAX_KEY_LEN: usize = 1024;

/// Upper bound on the salt length accepted anywhere in the crate.
pub const MAX_SALT_LEN: usize = 1024;

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// Key-derivation construction named in an encoded record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// PBKDF2 with HMAC-SHA-256.
    #[default]
    #[serde(rename = "pbkdf2-sha256")]
    Pbkdf2Sha256,
    /// PBKDF2 with HMAC-SHA-384.
    #[serde(rename = "pbkdf2-sha384")]
    Pbkdf2Sha384,
    /// PBKDF2 with HMAC-SHA-512.
    #[serde(rename = "pbkdf2-sha512")]
    Pbkdf2Sha512,
}

impl Algorithm {
    /// Every supported algorithm, default first.
    pub const ALL: [Self; 3] = [Self::Pbkdf2Sha256, Self::Pbkdf2Sha384, Self::Pbkdf2Sha512];

    /// Text identifier used in the encoded record. Never contains `:`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 => "pbkdf2-sha256",
            Self::Pbkdf2Sha384 => "pbkdf2-sha384",
            Self::Pbkdf2Sha512 => "pbkdf2-sha512",
        }
    }

    /// Map to the corresponding `ring::pbkdf2::Algorithm`.
    pub(crate) fn to_ring_algorithm(self) -> ring::pbkdf2::Algorithm {
        match self {
            Self::Pbkdf2Sha256 => ring::pbkdf2::PBKDF2_HMAC_SHA256,
            Self::Pbkdf2Sha384 => ring::pbkdf2::PBKDF2_HMAC_SHA384,
            Self::Pbkdf2Sha512 => ring::pbkdf2::PBKDF2_HMAC_SHA512,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.id() == s)
            .ok_or_else(|| CredentialError::UnsupportedAlgorithm(format!("{s:?}")))
    }
}

// ---------------------------------------------------------------------------
// ParameterSet
// ---------------------------------------------------------------------------

/// Algorithm and cost parameters used to derive a password hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Key-derivation construction.
    pub algorithm: Algorithm,
    /// PBKDF2 iteration count (cost factor).
    pub iterations: u32,
    /// Output key length in bytes.
    pub derived_key_length: usize,
    /// Random salt length in bytes.
    pub salt_length: usize,
}

impl ParameterSet {
    /// Build a parameter set and validate it.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidParameters` if any field is out of
    /// range (see [`ParameterSet::validate`]).
    pub fn new(
        algorithm: Algorithm,
        iterations: u32,
        derived_key_length: usize,
        salt_length: usize,
    ) -> Result<Self, CredentialError> {
        let params = Self {
            algorithm,
            iterations,
            derived_key_length,
            salt_length,
        };
        params.validate()?;
        Ok(params)
    }

    /// `pbkdf2-sha256` with the given iteration count and default lengths.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidParameters` if `iterations` is zero.
    pub fn with_iterations(iterations: u32) -> Result<Self, CredentialError> {
        Self::new(
            Algorithm::Pbkdf2Sha256,
            iterations,
            DEFAULT_KEY_LEN,
            DEFAULT_SALT_LEN,
        )
    }

    /// Check `iterations > 0` and that both lengths are in `1..=1024`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidParameters` naming the first field
    /// that is out of range.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.iterations == 0 {
            return Err(CredentialError::InvalidParameters(
                "iterations must be greater than zero".into(),
            ));
        }
        if self.derived_key_length == 0 || self.derived_key_length > MAX_KEY_LEN {
            return Err(CredentialError::InvalidParameters(format!(
                "derived key length {} outside 1..={MAX_KEY_LEN}",
                self.derived_key_length
            )));
        }
        if self.salt_length == 0 || self.salt_length > MAX_SALT_LEN {
            return Err(CredentialError::InvalidParameters(format!(
                "salt length {} outside 1..={MAX_SALT_LEN}",
                self.salt_length
            )));
        }
        Ok(())
    }

    /// Load a parameter set from JSON configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidParameters` if the JSON does not
    /// describe a parameter set or the values are out of range.
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| CredentialError::InvalidParameters(format!("bad configuration: {e}")))?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        CostPreset::Balanced.params()
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Cost preset selector.
///
/// Use [`crate::kdf::calibrate`] to get an iteration count adapted to the
/// current hardware instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostPreset {
    /// 100 000 iterations. Floor for anything calibrated.
    Fast,
    /// 600 000 iterations. The default.
    Balanced,
    /// 1 200 000 iterations, for high-value accounts.
    Maximum,
}

impl CostPreset {
    /// PBKDF2-HMAC-SHA256 iteration count for this preset.
    #[must_use]
    pub const fn iterations(self) -> u32 {
        match self {
            Self::Fast => 100_000,
            Self::Balanced => 600_000,
            Self::Maximum => 1_200_000,
        }
    }

    /// Full `pbkdf2-sha256` parameter set for this preset.
    #[must_use]
    pub const fn params(self) -> ParameterSet {
        ParameterSet {
            algorithm: Algorithm::Pbkdf2Sha256,
            iterations: self.iterations(),
            derived_key_length: DEFAULT_KEY_LEN,
            salt_length: DEFAULT_SALT_LEN,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
