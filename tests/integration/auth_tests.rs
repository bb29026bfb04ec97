//! Integration tests for code checks through the service.
//!
//! Covers config-file codes, scope separation, and per-scope attempt rate
//! limiting.

use geocheckin::Error;
use geocheckin::adapters::config_file::JsonConfigFile;
use geocheckin::adapters::kv::MemoryKv;
use geocheckin::adapters::local_store::LocalStore;
use geocheckin::adapters::location::FixedLocationProvider;
use geocheckin::app::events::AppEvent;
use geocheckin::app::ports::{AccessError, ConfigPort};
use geocheckin::app::service::CheckInService;
use geocheckin::auth::{AccessScope, SharedCodeVerifier};
use geocheckin::config::ServiceConfig;
use geocheckin::geo::GeoPoint;

use crate::mock_ports::{ADMIN_CODE, CHECKIN_CODE, RecordingSink, TickingClock, office};

fn config(burst: u32) -> ServiceConfig {
    ServiceConfig {
        checkin_code: CHECKIN_CODE.into(),
        admin_code: ADMIN_CODE.into(),
        auth_attempts_per_sec: 1,
        auth_burst: burst,
        ..Default::default()
    }
}

#[test]
fn codes_from_config_file_gate_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let file = JsonConfigFile::new(dir.path().join("geocheckin.json"));
    file.save(&config(100)).unwrap();

    let loaded = file.load().unwrap();
    let mut service = CheckInService::new(
        LocalStore::new(MemoryKv::new()),
        SharedCodeVerifier::from_config(&loaded).unwrap(),
        TickingClock::new(),
    );
    let mut sink = RecordingSink::new();
    let mut desk = FixedLocationProvider::new(GeoPoint::new(52.52, 13.405));

    service.save_workspace(ADMIN_CODE, office(), &mut sink).unwrap();
    assert!(
        service
            .check_in("Ada", CHECKIN_CODE, &mut desk, &mut sink)
            .unwrap()
            .is_admitted()
    );
    assert_eq!(sink.access_denials(), 0);
}

#[test]
fn check_in_code_does_not_grant_admin() {
    let mut service = CheckInService::new(
        LocalStore::new(MemoryKv::new()),
        SharedCodeVerifier::from_config(&config(100)).unwrap(),
        TickingClock::new(),
    );
    let mut sink = RecordingSink::new();

    assert_eq!(
        service.history(CHECKIN_CODE, &mut sink),
        Err(Error::Access(AccessError::Denied))
    );
    assert_eq!(
        service.clear_history(CHECKIN_CODE, &mut sink),
        Err(Error::Access(AccessError::Denied))
    );
    assert_eq!(sink.access_denials(), 2);
}

#[test]
fn repeated_guesses_are_rate_limited() {
    let mut service = CheckInService::new(
        LocalStore::new(MemoryKv::new()),
        SharedCodeVerifier::from_config(&config(3)).unwrap(),
        TickingClock::new(),
    );
    let mut sink = RecordingSink::new();
    let mut desk = FixedLocationProvider::new(GeoPoint::new(52.52, 13.405));

    for guess in ["0000", "1111", "2222"] {
        assert_eq!(
            service.check_in("Mallory", guess, &mut desk, &mut sink),
            Err(Error::Access(AccessError::Denied))
        );
    }
    // Even the right code is refused once the bucket is empty.
    assert_eq!(
        service.check_in("Mallory", CHECKIN_CODE, &mut desk, &mut sink),
        Err(Error::Access(AccessError::RateLimited))
    );
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::AccessDenied {
            scope: AccessScope::CheckIn,
            reason: AccessError::RateLimited,
        })
    ));
}

#[test]
fn check_in_flood_does_not_lock_out_admin() {
    let mut service = CheckInService::new(
        LocalStore::new(MemoryKv::new()),
        SharedCodeVerifier::from_config(&config(3)).unwrap(),
        TickingClock::new(),
    );
    let mut sink = RecordingSink::new();
    let mut desk = FixedLocationProvider::new(GeoPoint::new(52.52, 13.405));

    for guess in ["0000", "1111", "2222", "3333"] {
        assert!(service.check_in("Mallory", guess, &mut desk, &mut sink).is_err());
    }
    assert_eq!(
        service.check_in("Mallory", CHECKIN_CODE, &mut desk, &mut sink),
        Err(Error::Access(AccessError::RateLimited))
    );

    service.save_workspace(ADMIN_CODE, office(), &mut sink).unwrap();
    assert_eq!(service.history(ADMIN_CODE, &mut sink), Ok(Vec::new()));
}
