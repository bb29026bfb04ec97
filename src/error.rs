//! Unified error type for the check-in service.
//!
//! Every port error converts into [`Error`] so the service's public
//! operations can propagate with `?` and callers match on one type.
//! Proximity failures are NOT errors: the evaluator folds them into a
//! denial.

use core::fmt;

use crate::app::ports::{AccessError, ConfigError, LocationError, StorageError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A presented code was rejected.
    Access(AccessError),
    /// The device location could not be obtained.
    Location(LocationError),
    /// A store failed to read or write.
    Storage(StorageError),
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// Caller-supplied data failed validation.
    Validation(&'static str),
    /// No workspace has been saved yet.
    NotConfigured,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access(e) => write!(f, "access: {e}"),
            Self::Location(e) => write!(f, "location: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::NotConfigured => write!(f, "workspace not configured"),
        }
    }
}

impl std::error::Error for Error {}

impl From<AccessError> for Error {
    fn from(e: AccessError) -> Self {
        Self::Access(e)
    }
}

impl From<LocationError> for Error {
    fn from(e: LocationError) -> Self {
        Self::Location(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
