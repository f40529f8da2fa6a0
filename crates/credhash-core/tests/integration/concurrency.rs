//! Concurrent hashing and verification from many threads.

use std::collections::HashSet;
use std::thread;

use credhash_core::{derive, verify, EncodedRecord, ParameterSet};

#[test]
fn concurrent_derive_and_verify() {
    let params = ParameterSet::with_iterations(50).expect("valid params");

    let records: Vec<EncodedRecord> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let params = &params;
                s.spawn(move || {
                    let password = format!("thread-{i}");
                    let record = derive(password.as_bytes(), params).expect("derive");
                    assert!(verify(password.as_bytes(), &record).expect("verify"));
                    record
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect()
    });

    let salts: HashSet<Vec<u8>> = records.iter().map(|r| r.salt().to_vec()).collect();
    assert_eq!(salts.len(), records.len(), "every thread must get a fresh salt");
}

#[test]
fn records_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EncodedRecord>();
    assert_send_sync::<ParameterSet>();
}
