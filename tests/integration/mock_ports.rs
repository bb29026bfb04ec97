//! Mock adapters for integration tests.
//!
//! A clock that ticks on every read, a sink that records every event, and
//! a document store that lets a rival client win the race on demand.

use std::cell::Cell;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use geocheckin::adapters::document::{DocumentBackend, MemoryDocumentStore};
use geocheckin::app::events::AppEvent;
use geocheckin::app::ports::{
    Clock, DocumentStore, EventSink, HistoryStore, Revision, Revisioned, StorageError,
};
use geocheckin::geo::{GeoPoint, Workspace};
use geocheckin::history::{CheckInRecord, validate_name};

pub const CHECKIN_CODE: &str = "join-42";
pub const ADMIN_CODE: &str = "s3cret";

/// 100 m zone around a Berlin office, no altitude reference.
pub fn office() -> Workspace {
    Workspace::new(GeoPoint::new(52.5200, 13.4050), 100.0, 0.0)
}

pub fn record(name: &str, minute: u32) -> CheckInRecord {
    CheckInRecord::from_reading(
        validate_name(name).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 17, 9, minute, 0).unwrap(),
        &GeoPoint::new(52.52, 13.405),
    )
}

// ── TickingClock ──────────────────────────────────────────────

/// Starts at 2024-05-17T09:00Z and advances one minute per read.
pub struct TickingClock {
    next: Cell<DateTime<Utc>>,
}

impl TickingClock {
    pub fn new() -> Self {
        Self {
            next: Cell::new(Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap()),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.next.get();
        self.next.set(now + TimeDelta::minutes(1));
        now
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn access_denials(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AccessDenied { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── RacingDocuments ───────────────────────────────────────────

/// Wraps a shared [`MemoryDocumentStore`]; before each of our puts a
/// rival client appends one of its queued records, so our put carries a
/// stale revision and must retry.
pub struct RacingDocuments {
    inner: MemoryDocumentStore,
    rival: DocumentBackend<MemoryDocumentStore>,
    queued: Vec<CheckInRecord>,
}

impl RacingDocuments {
    pub fn new(inner: MemoryDocumentStore, mut rival_records: Vec<CheckInRecord>) -> Self {
        rival_records.reverse();
        Self {
            rival: DocumentBackend::new(inner.clone(), 1),
            inner,
            queued: rival_records,
        }
    }
}

impl DocumentStore for RacingDocuments {
    fn fetch(&self, name: &str) -> Result<Option<Revisioned>, StorageError> {
        self.inner.fetch(name)
    }

    fn put(
        &mut self,
        name: &str,
        body: &[u8],
        expected: Option<Revision>,
    ) -> Result<Revision, StorageError> {
        if let Some(record) = self.queued.pop() {
            self.rival.append(record)?;
        }
        self.inner.put(name, body, expected)
    }
}
