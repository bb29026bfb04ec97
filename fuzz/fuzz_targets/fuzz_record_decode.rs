//! Fuzz target: stored history decoding
//!
//! Feeds arbitrary bytes to the local store as the persisted history and
//! checks that decoding either fails cleanly with `Corrupted` or yields
//! records that survive a write/read cycle.
//!
//! cargo fuzz run fuzz_record_decode

#![no_main]

use geocheckin::adapters::kv::MemoryKv;
use geocheckin::adapters::local_store::LocalStore;
use geocheckin::app::ports::{HistoryStore, StorageError, StoragePort};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut kv = MemoryKv::new();
    kv.write("geocheckin", "checkins", data).unwrap();
    let mut store = LocalStore::new(kv);

    match store.list() {
        Ok(records) => {
            // Re-append into a fresh store; order must survive.
            let mut fresh = LocalStore::new(MemoryKv::new());
            for record in records.iter().rev() {
                fresh.append(record.clone()).unwrap();
            }
            assert_eq!(fresh.list().unwrap().len(), records.len());
            store.clear().unwrap();
            assert!(store.list().unwrap().is_empty());
        }
        Err(e) => assert_eq!(e, StorageError::Corrupted),
    }
});
