//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CheckInService (domain)
//! ```
//!
//! Driven adapters (location sensor, stores, code verifier, clock, event
//! sinks) implement these traits.  The
//! [`CheckInService`](super::service::CheckInService) consumes them via
//! generics, so the domain core never touches devices, files or networks.
//!
//! ## Storage notes
//!
//! - **WorkspaceStore** implementations overwrite; there is no delete.
//! - **HistoryStore::append** MUST be atomic with respect to other
//!   appends on the same history: a concurrent writer may never cause a
//!   record to be lost.
//! - All port errors are typed — callers must handle every variant explicitly.

use chrono::{DateTime, Utc};

use crate::auth::AccessScope;
use crate::config::ServiceConfig;
use crate::geo::{GeoPoint, Workspace};
use crate::history::CheckInRecord;

// ───────────────────────────────────────────────────────────────
// Location port (driven adapter: device sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Source of the device's current position.
pub trait LocationProvider {
    fn current_position(&mut self) -> Result<GeoPoint, LocationError>;
}

// ───────────────────────────────────────────────────────────────
// Store ports (driven adapter: domain ↔ persistence)
// ───────────────────────────────────────────────────────────────

/// Persists the single admin-configured workspace.
pub trait WorkspaceStore {
    /// `Ok(None)` when no workspace has been saved yet.
    fn load_workspace(&self) -> Result<Option<Workspace>, StorageError>;

    /// Overwrite the stored workspace.
    fn save_workspace(&mut self, workspace: &Workspace) -> Result<(), StorageError>;
}

/// Ordered check-in history, newest first.
pub trait HistoryStore {
    /// Atomically prepend one record.
    fn append(&mut self, record: CheckInRecord) -> Result<(), StorageError>;

    /// All records, newest first.
    fn list(&self) -> Result<Vec<CheckInRecord>, StorageError>;

    /// Remove every record.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Namespaced key-value byte storage (local persistence).
///
/// Writes MUST be atomic per key — a reader never observes a partial
/// value.
pub trait StoragePort {
    /// Read a value, or [`StorageError::NotFound`].
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;

    /// Read-modify-write of one key, atomic with respect to every other
    /// writer of the same store.  `apply` gets the current value (`None`
    /// if absent) and returns the replacement, or `None` to delete.
    ///
    /// The default is only atomic for a single owner; stores shared
    /// between handles or processes MUST override it.
    fn update<F>(&mut self, namespace: &str, key: &str, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<Option<Vec<u8>>, StorageError>,
    {
        let current = match self.read(namespace, key) {
            Ok(bytes) => Some(bytes),
            Err(StorageError::NotFound) => None,
            Err(e) => return Err(e),
        };
        match apply(current)? {
            Some(bytes) => self.write(namespace, key, &bytes),
            None => self.delete(namespace, key),
        }
    }
}

/// Monotonic document revision used for conditional writes.
pub type Revision = u64;

/// A document body together with the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revisioned {
    pub revision: Revision,
    pub body: Vec<u8>,
}

/// Remote document storage with optimistic concurrency.
pub trait DocumentStore {
    /// Current body and revision, or `None` if the document doesn't exist.
    fn fetch(&self, name: &str) -> Result<Option<Revisioned>, StorageError>;

    /// Replace the document if its revision still equals `expected`
    /// (`None` = must not exist yet).  Returns the new revision, or
    /// [`StorageError::Conflict`] when someone else wrote first.
    fn put(
        &mut self,
        name: &str,
        body: &[u8],
        expected: Option<Revision>,
    ) -> Result<Revision, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Access port (driven adapter: domain → code verification)
// ───────────────────────────────────────────────────────────────

/// Verifies a presented code for a scope.
pub trait AccessVerifier {
    fn verify(&mut self, scope: AccessScope, presented: &str) -> Result<(), AccessError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock time for record timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists service configuration.
///
/// Implementations MUST validate before persisting and after loading,
/// rejecting bad values with [`ConfigError::ValidationFailed`] rather
/// than clamping them.
pub trait ConfigPort {
    fn load(&self) -> Result<ServiceConfig, ConfigError>;

    fn save(&self, config: &ServiceConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file found.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backend.
    IoError,
}

/// Errors from the store ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// A conditional write lost to a concurrent writer.
    Conflict,
    /// Stored bytes failed to decode.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

/// Errors from [`LocationProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// The sensor did not produce a fix.
    Unavailable,
    /// The user or platform refused location access.
    PermissionDenied,
    /// The device has no location capability.
    Unsupported,
}

/// Errors from [`AccessVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    Denied,
    /// No key material could be drawn; codes cannot be checked.
    Unavailable,
    /// Too many attempts; retry later.
    RateLimited,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Conflict => write!(f, "revision conflict"),
            Self::Corrupted => write!(f, "stored data corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for LocationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unable to retrieve your location"),
            Self::PermissionDenied => write!(f, "location permission denied"),
            Self::Unsupported => write!(f, "geolocation is not supported"),
        }
    }
}

impl core::fmt::Display for AccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Denied => write!(f, "incorrect code"),
            Self::Unavailable => write!(f, "code checks unavailable"),
            Self::RateLimited => write!(f, "too many attempts"),
        }
    }
}
