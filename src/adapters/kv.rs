//! Key-value storage adapters.
//!
//! Implement [`StoragePort`] — the local-persistence primitive that
//! [`LocalStore`](super::local_store::LocalStore) builds on.
//!
//! - [`MemoryKv`] — process-local map; vanishes with the process.
//! - [`FileKv`] — one file per key under a data directory.  Each write
//!   lands in a fresh temporary file which is then renamed over the
//!   target, so readers only ever see a complete value.  Mutations are
//!   serialised across handles and processes by a directory lock.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::app::ports::{StorageError, StoragePort};

// ───────────────────────────────────────────────────────────────
// In-memory
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryKv {
    store: HashMap<String, Vec<u8>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }
}

impl StoragePort for MemoryKv {
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.store
            .get(&Self::composite_key(namespace, key))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .insert(Self::composite_key(namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&Self::composite_key(namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store
            .contains_key(&Self::composite_key(namespace, key))
    }
}

// ───────────────────────────────────────────────────────────────
// Directory-backed
// ───────────────────────────────────────────────────────────────

/// Lock file guarding every mutation under one data directory.
const LOCK_FILE: &str = ".lock";

/// Files live at `<root>/<namespace>/<key>`.
///
/// Several `FileKv`s (threads or processes) may share one directory:
/// mutations hold an exclusive lock on `<root>/.lock`, and each write goes
/// through a uniquely named temporary file.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open (and create if needed) the data directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| io_error("create data dir", &root, &e))?;
        info!("FileKv: data directory {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, namespace: &str, key: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_segment(namespace) || !is_plain_segment(key) {
            warn!("FileKv: rejected key {namespace}::{key}");
            return Err(StorageError::IoError);
        }
        Ok(self.root.join(namespace).join(key))
    }

    /// Handle on the directory lock; call `.write()` to acquire it.
    fn lock_file(&self) -> Result<RwLock<File>, StorageError> {
        let path = self.root.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io_error("open lock", &path, &e))?;
        Ok(RwLock::new(file))
    }

    fn read_unlocked(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path(namespace, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, &e)),
        }
    }

    fn write_unlocked(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path(namespace, key)?;
        let dir = self.root.join(namespace);
        fs::create_dir_all(&dir).map_err(|e| io_error("create namespace", &dir, &e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| io_error("create temp", &dir, &e))?;
        tmp.write_all(data)
            .map_err(|e| io_error("write", tmp.path(), &e))?;
        tmp.persist(&path)
            .map_err(|e| io_error("commit", &path, &e.error))?;
        debug!("FileKv: wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    fn delete_unlocked(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let path = self.path(namespace, key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete", &path, &e)),
        }
    }
}

impl StoragePort for FileKv {
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.read_unlocked(namespace, key)?
            .ok_or(StorageError::NotFound)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut lock = self.lock_file()?;
        let _held = lock.write().map_err(|e| io_error("lock", &self.root, &e))?;
        self.write_unlocked(namespace, key, data)
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let mut lock = self.lock_file()?;
        let _held = lock.write().map_err(|e| io_error("lock", &self.root, &e))?;
        self.delete_unlocked(namespace, key)
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.path(namespace, key).is_ok_and(|p| p.is_file())
    }

    fn update<F>(&mut self, namespace: &str, key: &str, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<Option<Vec<u8>>, StorageError>,
    {
        let mut lock = self.lock_file()?;
        let _held = lock.write().map_err(|e| io_error("lock", &self.root, &e))?;
        match apply(self.read_unlocked(namespace, key)?)? {
            Some(bytes) => self.write_unlocked(namespace, key, &bytes),
            None => self.delete_unlocked(namespace, key),
        }
    }
}

/// A single path component with no separators or dot-dot tricks.
fn is_plain_segment(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('.')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn io_error(op: &str, path: &Path, e: &io::Error) -> StorageError {
    warn!("FileKv: {op} {} failed: {e}", path.display());
    StorageError::IoError
}
