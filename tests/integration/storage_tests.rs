//! Integration tests for the storage backends.
//!
//! - File-backed local store survives a restart.
//! - Separate file stores on one directory never lose an append.
//! - Document backend never loses a concurrent append.

use std::thread;

use geocheckin::adapters::document::{DocumentBackend, MemoryDocumentStore};
use geocheckin::adapters::kv::FileKv;
use geocheckin::adapters::local_store::LocalStore;
use geocheckin::adapters::location::FixedLocationProvider;
use geocheckin::app::ports::{HistoryStore, StorageError, WorkspaceStore};
use geocheckin::app::service::CheckInService;
use geocheckin::auth::SharedCodeVerifier;
use geocheckin::config::ServiceConfig;
use geocheckin::geo::GeoPoint;
use geocheckin::history::CheckInRecord;
use geocheckin::{Error, Result};

use crate::mock_ports::{
    ADMIN_CODE, CHECKIN_CODE, RacingDocuments, RecordingSink, TickingClock, office, record,
};

fn verifier() -> SharedCodeVerifier {
    SharedCodeVerifier::new(CHECKIN_CODE, ADMIN_CODE, 1000, 1000).unwrap()
}

fn names(records: &[CheckInRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

// ── Local store on disk ───────────────────────────────────────

#[test]
fn file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = RecordingSink::new();
    let mut desk = FixedLocationProvider::new(GeoPoint::new(52.52, 13.405));

    {
        let kv = FileKv::open(dir.path()).unwrap();
        let mut service = CheckInService::new(LocalStore::new(kv), verifier(), TickingClock::new());
        service.save_workspace(ADMIN_CODE, office(), &mut sink).unwrap();
        for name in ["Ada", "Grace"] {
            service
                .check_in(name, CHECKIN_CODE, &mut desk, &mut sink)
                .unwrap();
        }
    }

    let kv = FileKv::open(dir.path()).unwrap();
    let mut service = CheckInService::new(LocalStore::new(kv), verifier(), TickingClock::new());
    assert_eq!(service.workspace(), Ok(Some(office())));

    let history = service.history(ADMIN_CODE, &mut sink).unwrap();
    assert_eq!(names(&history), ["Grace", "Ada"]);
    assert!(history[0].timestamp > history[1].timestamp);
}

#[test]
fn file_store_leaves_no_temporaries() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LocalStore::new(FileKv::open(dir.path()).unwrap());
    store.save_workspace(&office()).unwrap();
    store.append(record("Ada", 0)).unwrap();
    store.append(record("Grace", 1)).unwrap();

    let mut files: Vec<String> = std::fs::read_dir(dir.path().join("geocheckin"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, ["checkins", "workspace"]);
}

#[test]
fn cleared_history_stays_cleared_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = LocalStore::new(FileKv::open(dir.path()).unwrap());
        store.append(record("Ada", 0)).unwrap();
        store.clear().unwrap();
    }
    let store = LocalStore::new(FileKv::open(dir.path()).unwrap());
    assert_eq!(store.list(), Ok(Vec::new()));
}

#[test]
fn corrupted_history_file_surfaces_as_storage_error() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LocalStore::new(FileKv::open(dir.path())?);
    store.append(record("Ada", 0))?;
    std::fs::write(dir.path().join("geocheckin").join("checkins"), [0xff; 3]).unwrap();

    let mut service = CheckInService::new(store, verifier(), TickingClock::new());
    let mut sink = RecordingSink::new();
    assert_eq!(
        service.history(ADMIN_CODE, &mut sink),
        Err(Error::Storage(StorageError::Corrupted))
    );
    Ok(())
}

#[test]
fn concurrent_file_stores_never_lose_appends() {
    const CLIENTS: usize = 4;
    const PER_CLIENT: usize = 25;

    let dir = tempfile::tempdir().unwrap();
    let workers: Vec<_> = (0..CLIENTS)
        .map(|client| {
            let root = dir.path().to_path_buf();
            thread::spawn(move || {
                // One handle per worker, as with one CLI process per command.
                let mut store = LocalStore::new(FileKv::open(root).unwrap());
                for i in 0..PER_CLIENT {
                    store.append(record(&format!("c{client}-{i}"), 0)).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let history = LocalStore::new(FileKv::open(dir.path()).unwrap())
        .list()
        .unwrap();
    assert_eq!(history.len(), CLIENTS * PER_CLIENT);
    assert_newest_first_per_client(&history, CLIENTS, PER_CLIENT);
}

// ── Document backend ──────────────────────────────────────────

#[test]
fn two_clients_share_one_history() {
    let docs = MemoryDocumentStore::new();
    let mut sink = RecordingSink::new();
    let mut desk = FixedLocationProvider::new(GeoPoint::new(52.52, 13.405));

    let config = ServiceConfig::default();
    let mut front_desk = CheckInService::new(
        DocumentBackend::from_config(docs.clone(), &config),
        verifier(),
        TickingClock::new(),
    );
    let mut lobby = CheckInService::new(
        DocumentBackend::from_config(docs.clone(), &config),
        verifier(),
        TickingClock::new(),
    );

    front_desk.save_workspace(ADMIN_CODE, office(), &mut sink).unwrap();
    assert_eq!(lobby.workspace(), Ok(Some(office())));

    front_desk
        .check_in("Ada", CHECKIN_CODE, &mut desk, &mut sink)
        .unwrap();
    lobby
        .check_in("Grace", CHECKIN_CODE, &mut desk, &mut sink)
        .unwrap();

    let seen_by_desk = front_desk.history(ADMIN_CODE, &mut sink).unwrap();
    let seen_by_lobby = lobby.history(ADMIN_CODE, &mut sink).unwrap();
    assert_eq!(names(&seen_by_desk), ["Grace", "Ada"]);
    assert_eq!(seen_by_desk, seen_by_lobby);
}

#[test]
fn append_retries_past_a_rival_write() {
    let docs = MemoryDocumentStore::new();
    let racing = RacingDocuments::new(docs.clone(), vec![record("Rival1", 1), record("Rival2", 2)]);
    let mut backend = DocumentBackend::new(racing, 3);

    backend.append(record("Ours", 3)).unwrap();

    let history = DocumentBackend::new(docs, 1).list().unwrap();
    assert_eq!(names(&history), ["Ours", "Rival2", "Rival1"]);
}

#[test]
fn append_gives_up_after_configured_retries() {
    let docs = MemoryDocumentStore::new();
    let racing = RacingDocuments::new(docs.clone(), vec![record("Rival1", 1), record("Rival2", 2)]);
    let mut backend = DocumentBackend::new(racing, 2);

    assert_eq!(backend.append(record("Ours", 3)), Err(StorageError::Conflict));

    // The rival writes landed; ours did not.
    let history = DocumentBackend::new(docs, 1).list().unwrap();
    assert_eq!(names(&history), ["Rival2", "Rival1"]);
}

#[test]
fn concurrent_appends_are_never_lost() {
    const CLIENTS: usize = 4;
    const PER_CLIENT: usize = 25;

    let docs = MemoryDocumentStore::new();
    let workers: Vec<_> = (0..CLIENTS)
        .map(|client| {
            let docs = docs.clone();
            thread::spawn(move || {
                // More retries than there are rival writes in total.
                let mut backend = DocumentBackend::new(docs, 256);
                for i in 0..PER_CLIENT {
                    backend
                        .append(record(&format!("c{client}-{i}"), 0))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let history = DocumentBackend::new(docs, 1).list().unwrap();
    assert_eq!(history.len(), CLIENTS * PER_CLIENT);
    assert_newest_first_per_client(&history, CLIENTS, PER_CLIENT);
}

/// Each client's own appends stay newest first.
fn assert_newest_first_per_client(history: &[CheckInRecord], clients: usize, per_client: usize) {
    for client in 0..clients {
        let prefix = format!("c{client}-");
        let own: Vec<usize> = history
            .iter()
            .filter_map(|r| r.name.strip_prefix(prefix.as_str()))
            .map(|i| i.parse().unwrap())
            .collect();
        let expected: Vec<usize> = (0..per_client).rev().collect();
        assert_eq!(own, expected);
    }
}
