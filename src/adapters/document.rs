//! Remote document backend with optimistic concurrency.
//!
//! The workspace and the history are each one JSON document in a
//! [`DocumentStore`].  Every mutation is a read-modify-write closed by a
//! conditional put:
//!
//! ```text
//!   fetch (body, rev) ──▶ modify ──▶ put(body', expected = rev)
//!          ▲                                 │
//!          └──────── Conflict: retry ◀───────┘
//! ```
//!
//! A put only lands if nobody wrote in between, so concurrent appends from
//! independent clients never overwrite each other.  After
//! `retries` lost races the update gives up with
//! [`StorageError::Conflict`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::app::ports::{
    DocumentStore, HistoryStore, Revision, Revisioned, StorageError, WorkspaceStore,
};
use crate::config::ServiceConfig;
use crate::geo::Workspace;
use crate::history::CheckInRecord;

const WORKSPACE_DOC: &str = "workspace.json";
const HISTORY_DOC: &str = "checkins.json";

// ───────────────────────────────────────────────────────────────
// In-process document store
// ───────────────────────────────────────────────────────────────

/// Shared in-process [`DocumentStore`].  Clones are handles onto the same
/// document space, standing in for several clients of one remote API.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    docs: Arc<Mutex<HashMap<String, Revisioned>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch(&self, name: &str) -> Result<Option<Revisioned>, StorageError> {
        let docs = self.docs.lock().map_err(|_| StorageError::IoError)?;
        Ok(docs.get(name).cloned())
    }

    fn put(
        &mut self,
        name: &str,
        body: &[u8],
        expected: Option<Revision>,
    ) -> Result<Revision, StorageError> {
        let mut docs = self.docs.lock().map_err(|_| StorageError::IoError)?;
        let current = docs.get(name).map(|d| d.revision);
        if current != expected {
            return Err(StorageError::Conflict);
        }
        let revision = current.unwrap_or(0) + 1;
        docs.insert(
            name.to_owned(),
            Revisioned {
                revision,
                body: body.to_vec(),
            },
        );
        Ok(revision)
    }
}

// ───────────────────────────────────────────────────────────────
// Backend
// ───────────────────────────────────────────────────────────────

/// [`WorkspaceStore`] + [`HistoryStore`] over any [`DocumentStore`].
pub struct DocumentBackend<D> {
    docs: D,
    retries: u32,
}

impl<D: DocumentStore> DocumentBackend<D> {
    /// `retries` is the number of conditional-write attempts per update.
    pub fn new(docs: D, retries: u32) -> Self {
        Self {
            docs,
            retries: retries.max(1),
        }
    }

    /// Retry budget taken from [`ServiceConfig::append_retries`].
    pub fn from_config(docs: D, config: &ServiceConfig) -> Self {
        Self::new(docs, config.append_retries)
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<(T, Revision)>, StorageError> {
        let Some(doc) = self.docs.fetch(name)? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&doc.body).map_err(|e| {
            warn!("DocumentBackend: {name} failed to decode: {e}");
            StorageError::Corrupted
        })?;
        Ok(Some((value, doc.revision)))
    }

    /// Conditional read-modify-write of one document.
    fn update<T, F>(&mut self, name: &str, mut apply: F) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(Option<T>) -> T,
    {
        for attempt in 1..=self.retries {
            let (current, expected) = match self.read::<T>(name)? {
                Some((value, revision)) => (Some(value), Some(revision)),
                None => (None, None),
            };
            let body = serde_json::to_vec(&apply(current)).map_err(|_| StorageError::Corrupted)?;

            match self.docs.put(name, &body, expected) {
                Ok(revision) => {
                    debug!("DocumentBackend: {name} now at revision {revision}");
                    return Ok(());
                }
                Err(StorageError::Conflict) => {
                    warn!(
                        "DocumentBackend: {name} changed underneath us (attempt {attempt}/{})",
                        self.retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Err(StorageError::Conflict)
    }
}

impl<D: DocumentStore> WorkspaceStore for DocumentBackend<D> {
    fn load_workspace(&self) -> Result<Option<Workspace>, StorageError> {
        Ok(self.read(WORKSPACE_DOC)?.map(|(ws, _)| ws))
    }

    fn save_workspace(&mut self, workspace: &Workspace) -> Result<(), StorageError> {
        self.update(WORKSPACE_DOC, |_: Option<Workspace>| *workspace)
    }
}

impl<D: DocumentStore> HistoryStore for DocumentBackend<D> {
    fn append(&mut self, record: CheckInRecord) -> Result<(), StorageError> {
        self.update(HISTORY_DOC, |current: Option<Vec<CheckInRecord>>| {
            let mut records = current.unwrap_or_default();
            records.insert(0, record.clone());
            records
        })
    }

    fn list(&self) -> Result<Vec<CheckInRecord>, StorageError> {
        Ok(self
            .read(HISTORY_DOC)?
            .map(|(records, _)| records)
            .unwrap_or_default())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.update(HISTORY_DOC, |_: Option<Vec<CheckInRecord>>| Vec::new())
    }
}
