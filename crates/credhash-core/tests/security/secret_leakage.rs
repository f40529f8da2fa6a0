//! Secret material must never show up in errors, `Debug` output or the
//! parameter view of a record.

use credhash_core::{decode, derive, derive_with_salt, Algorithm, CredentialError, ParameterSet};

const PASSWORD: &[u8] = b"sup3r-s3cret-passw0rd";
const PASSWORD_STR: &str = "sup3r-s3cret-passw0rd";

#[test]
fn debug_output_masks_derived_key() {
    let params = ParameterSet::with_iterations(1).expect("params");
    let record = derive_with_salt(PASSWORD, &[0u8; 16], &params).expect("derive");
    let encoded = record.encode();
    let key_b64 = encoded.rsplit(':').next().expect("key field");

    let debug = format!("{record:?}");
    assert!(debug.contains("***"));
    assert!(!debug.contains(key_b64));
    assert!(!debug.contains(PASSWORD_STR));
}

#[test]
fn parameter_errors_never_echo_password() {
    let bad = [
        ParameterSet {
            algorithm: Algorithm::Pbkdf2Sha256,
            iterations: 0,
            derived_key_length: 32,
            salt_length: 16,
        },
        ParameterSet {
            algorithm: Algorithm::Pbkdf2Sha256,
            iterations: 1,
            derived_key_length: 0,
            salt_length: 16,
        },
        ParameterSet {
            algorithm: Algorithm::Pbkdf2Sha256,
            iterations: 1,
            derived_key_length: 32,
            salt_length: 0,
        },
    ];
    for params in bad {
        let err = derive(PASSWORD, &params).expect_err("invalid params must fail");
        assert!(matches!(err, CredentialError::InvalidParameters(_)));
        assert!(!err.to_string().contains(PASSWORD_STR));
        assert!(!format!("{err:?}").contains(PASSWORD_STR));
    }
}

#[test]
fn decode_errors_never_echo_key_material() {
    let key_b64 = "DO3rTlmAfxAYnBmT12q5XiQXXWXkflbWZYNQQ8kAHzY";
    let text = format!("pbkdf2-sha256:100000:AAAAAAAAAAAAAAAAAAAAAA==:{key_b64}");
    let err = decode(&text).expect_err("truncated key must fail");
    assert!(matches!(err, CredentialError::MalformedRecord(_)));
    assert!(!err.to_string().contains(key_b64));
}
