//! Local store — workspace and history on top of a [`StoragePort`].
//!
//! Values are encoded with `postcard`.  The whole history lives under a
//! single key; an append is one [`StoragePort::update`], so it is as
//! atomic as the storage makes that call.  [`FileKv`] holds its directory
//! lock across it, which keeps appends from separate CLI processes on one
//! data directory from overwriting each other.
//!
//! [`FileKv`]: super::kv::FileKv

use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::app::ports::{HistoryStore, StorageError, StoragePort, WorkspaceStore};
use crate::geo::Workspace;
use crate::history::CheckInRecord;

const NAMESPACE: &str = "geocheckin";
const WORKSPACE_KEY: &str = "workspace";
const HISTORY_KEY: &str = "checkins";

pub struct LocalStore<S> {
    storage: S,
}

impl<S: StoragePort> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn read_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.storage.read(NAMESPACE, key) {
            Ok(bytes) => decode(key, &bytes).map(Some),
            Err(StorageError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_value<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        self.storage.write(NAMESPACE, key, &encode(value)?)
    }
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, StorageError> {
    postcard::from_bytes(bytes).map_err(|e| {
        warn!("LocalStore: {key} failed to decode: {e}");
        StorageError::Corrupted
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    postcard::to_allocvec(value).map_err(|_| StorageError::Corrupted)
}

impl<S: StoragePort> WorkspaceStore for LocalStore<S> {
    fn load_workspace(&self) -> Result<Option<Workspace>, StorageError> {
        self.read_value(WORKSPACE_KEY)
    }

    fn save_workspace(&mut self, workspace: &Workspace) -> Result<(), StorageError> {
        self.write_value(WORKSPACE_KEY, workspace)
    }
}

impl<S: StoragePort> HistoryStore for LocalStore<S> {
    fn append(&mut self, record: CheckInRecord) -> Result<(), StorageError> {
        self.storage.update(NAMESPACE, HISTORY_KEY, |current| {
            let mut records: Vec<CheckInRecord> = match current {
                Some(bytes) => decode(HISTORY_KEY, &bytes)?,
                None => Vec::new(),
            };
            records.insert(0, record);
            encode(&records).map(Some)
        })
    }

    fn list(&self) -> Result<Vec<CheckInRecord>, StorageError> {
        Ok(self.read_value(HISTORY_KEY)?.unwrap_or_default())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.delete(NAMESPACE, HISTORY_KEY)?;
        info!("LocalStore: history cleared");
        Ok(())
    }
}
