//! Encoded password-hash record.
//!
//! Text layout (fields separated by `:`):
//!
//! ```text
//! algorithm:iterations:base64(salt):base64(derived_key)
//! ```
//!
//! Example:
//!
//! ```text
//! pbkdf2-sha256:100000:AAAAAAAAAAAAAAAAAAAAAA==:DO3rTlmAfxAYnBmT12q5XiQXXWXkflbWZYNQQ8kAHzY=
//! ```
//!
//! The record is self-describing: nothing at decode time depends on the
//! current default parameters. Base64 is the padded RFC 4648 alphabet, which
//! never contains `:`.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use data_encoding::BASE64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CredentialError;
use crate::params::{Algorithm, ParameterSet, MAX_KEY_LEN, MAX_SALT_LEN};

/// Field separator in the encoded text.
pub const SEPARATOR: char = ':';

/// Number of `:`-separated fields in an encoded record.
const FIELD_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// EncodedRecord
// ---------------------------------------------------------------------------

/// Algorithm, iteration count, salt and derived key of one stored password.
///
/// Every constructor validates the length invariants, so a value of this
/// type is always verifiable. Salt and key are zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncodedRecord {
    #[zeroize(skip)]
    algorithm: Algorithm,
    #[zeroize(skip)]
    iterations: NonZeroU32,
    salt: Vec<u8>,
    derived_key: Vec<u8>,
}

impl EncodedRecord {
    /// Assemble a record from its parts.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::MalformedRecord` if `iterations` is zero or
    /// the salt or key is empty or longer than 1024 bytes.
    pub fn new(
        algorithm: Algorithm,
        iterations: u32,
        salt: Vec<u8>,
        derived_key: Vec<u8>,
    ) -> Result<Self, CredentialError> {
        let iterations = NonZeroU32::new(iterations)
            .ok_or_else(|| CredentialError::MalformedRecord("iterations must be non-zero".into()))?;
        check_len("salt", salt.len(), MAX_SALT_LEN)?;
        check_len("derived key", derived_key.len(), MAX_KEY_LEN)?;
        Ok(Self {
            algorithm,
            iterations,
            salt,
            derived_key,
        })
    }

    /// Key-derivation construction that produced this record.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Iteration count used at derivation time.
    #[must_use]
    pub const fn iterations(&self) -> NonZeroU32 {
        self.iterations
    }

    /// Salt bytes.
    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Stored derived key. Compare it only through the verifier.
    #[must_use]
    pub fn derived_key(&self) -> &[u8] {
        &self.derived_key
    }

    /// Parameter set this record was derived with.
    #[must_use]
    pub fn params(&self) -> ParameterSet {
        ParameterSet {
            algorithm: self.algorithm,
            iterations: self.iterations.get(),
            derived_key_length: self.derived_key.len(),
            salt_length: self.salt.len(),
        }
    }

    /// Text form of this record. Same as [`encode`].
    #[must_use]
    pub fn encode(&self) -> String {
        encode(self)
    }
}

fn check_len(field: &str, len: usize, max: usize) -> Result<(), CredentialError> {
    if len == 0 {
        return Err(CredentialError::MalformedRecord(format!("{field} is empty")));
    }
    if len > max {
        return Err(CredentialError::MalformedRecord(format!(
            "{field} is {len} bytes (maximum {max})"
        )));
    }
    Ok(())
}

impl PartialEq for EncodedRecord {
    fn eq(&self, other: &Self) -> bool {
        let key_equal = self.derived_key.len().ct_eq(&other.derived_key.len())
            & self.derived_key.as_slice().ct_eq(other.derived_key.as_slice());
        self.algorithm == other.algorithm
            && self.iterations == other.iterations
            && self.salt == other.salt
            && bool::from(key_equal)
    }
}

impl Eq for EncodedRecord {}

impl fmt::Debug for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedRecord")
            .field("algorithm", &self.algorithm.id())
            .field("iterations", &self.iterations.get())
            .field("salt_len", &self.salt.len())
            .field("derived_key", &"***")
            .finish()
    }
}

impl fmt::Display for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.algorithm.id(),
            self.iterations,
            BASE64.encode(&self.salt),
            BASE64.encode(&self.derived_key),
        )
    }
}

impl FromStr for EncodedRecord {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Serialize for EncodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EncodedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode(&text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Serialize a record to `algorithm:iterations:base64(salt):base64(key)`.
#[must_use]
pub fn encode(record: &EncodedRecord) -> String {
    record.to_string()
}

/// Parse and validate an encoded record.
///
/// # Errors
///
/// - `CredentialError::UnsupportedAlgorithm` if the algorithm identifier is
///   not recognised.
/// - `CredentialError::MalformedRecord` on a wrong field count, a
///   non-canonical or zero iteration count, invalid base64, or an empty or
///   oversized salt or key.
pub fn decode(text: &str) -> Result<EncodedRecord, CredentialError> {
    let fields: Vec<&str> = text.split(SEPARATOR).collect();
    let [algorithm, iterations, salt, derived_key] = fields.as_slice() else {
        return Err(CredentialError::MalformedRecord(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    };

    if algorithm.is_empty() {
        return Err(CredentialError::MalformedRecord(
            "algorithm identifier is empty".into(),
        ));
    }
    let algorithm: Algorithm = algorithm.parse()?;
    let iterations = parse_iterations(iterations)?;
    let salt = decode_base64("salt", salt, MAX_SALT_LEN)?;
    let derived_key = decode_base64("derived key", derived_key, MAX_KEY_LEN)?;

    EncodedRecord::new(algorithm, iterations, salt, derived_key)
}

/// Parse a canonical decimal iteration count: digits only, no sign, no
/// leading zeros, non-zero.
fn parse_iterations(field: &str) -> Result<u32, CredentialError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CredentialError::MalformedRecord(
            "iterations is not a decimal integer".into(),
        ));
    }
    if field.starts_with('0') {
        return Err(CredentialError::MalformedRecord(
            "iterations must be a positive integer without leading zeros".into(),
        ));
    }
    field
        .parse::<u32>()
        .map_err(|e| CredentialError::MalformedRecord(format!("iterations out of range: {e}")))
}

/// Decode one base64 field, rejecting empty and oversized results before
/// allocating.
fn decode_base64(field: &str, text: &str, max: usize) -> Result<Vec<u8>, CredentialError> {
    let len = BASE64
        .decode_len(text.len())
        .map_err(|e| CredentialError::MalformedRecord(format!("{field} is not valid base64: {e}")))?;
    if len > max.saturating_add(2) {
        return Err(CredentialError::MalformedRecord(format!(
            "{field} exceeds {max} bytes"
        )));
    }
    let bytes = BASE64
        .decode(text.as_bytes())
        .map_err(|e| CredentialError::MalformedRecord(format!("{field} is not valid base64: {e}")))?;
    check_len(field, bytes.len(), max)?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
