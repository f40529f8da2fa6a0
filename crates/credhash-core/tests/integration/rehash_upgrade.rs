//! Upgrading stored hashes when the cost policy rises.

use credhash_core::{derive, needs_rehash, verify, Algorithm, ParameterSet};

#[test]
fn login_flow_upgrades_weak_hash() {
    let old_policy = ParameterSet::with_iterations(5).expect("valid params");
    let new_policy = ParameterSet::new(Algorithm::Pbkdf2Sha512, 9, 64, 32).expect("valid params");

    let mut stored = derive(b"pw", &old_policy).expect("derive");

    // Successful login under the new policy triggers a rehash.
    assert!(verify(b"pw", &stored).expect("verify"));
    assert!(needs_rehash(&stored, &new_policy));
    stored = derive(b"pw", &new_policy).expect("rehash");

    assert_eq!(stored.params(), new_policy);
    assert!(!needs_rehash(&stored, &new_policy));
    assert!(verify(b"pw", &stored).expect("verify after rehash"));
}

#[test]
fn records_above_policy_are_left_alone() {
    let policy = ParameterSet::with_iterations(5).expect("valid params");
    let stored = derive(b"pw", &ParameterSet::with_iterations(50).expect("valid params"))
        .expect("derive");
    assert!(!needs_rehash(&stored, &policy));
}
