//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`].  The file is validated after every load and
//! before every save; a file that fails validation is never written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::{ServiceConfig, validate_config};

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file without validation, for callers that layer
    /// overrides (environment, flags) on top before validating.
    pub fn load_unchecked(&self) -> Result<ServiceConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => {
                warn!("config: reading {} failed: {e}", self.path.display());
                return Err(ConfigError::IoError);
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            warn!("config: {} is not valid JSON: {e}", self.path.display());
            ConfigError::Corrupted
        })
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ServiceConfig, ConfigError> {
        let config = self.load_unchecked()?;
        validate_config(&config)?;
        info!("config: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &ServiceConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("config: writing {} failed: {e}", self.path.display());
            ConfigError::IoError
        })?;
        info!("config: saved {}", self.path.display());
        Ok(())
    }
}
