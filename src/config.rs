//! Service configuration parameters
//!
//! Tunables and shared codes for the check-in service.  Codes are never
//! compiled in: they come from a config file or the environment and are
//! injected into the access verifier at startup.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Longest accepted access code, in bytes.
pub const MAX_CODE_LEN: usize = 128;

/// Core service configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    // --- Access ---
    /// Code shared in the check-in link.
    pub checkin_code: String,
    /// Code guarding workspace setup and history.
    pub admin_code: String,
    /// Sustained code-verification attempts per second.
    pub auth_attempts_per_sec: u32,
    /// Burst capacity of the attempt limiter.
    pub auth_burst: u32,

    // --- Storage ---
    /// Conditional-write attempts before a history update gives up.
    pub append_retries: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            // Access
            checkin_code: String::new(),
            admin_code: String::new(),
            auth_attempts_per_sec: 10,
            auth_burst: 10,

            // Storage
            append_retries: 8,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("checkin_code", &"<redacted>")
            .field("admin_code", &"<redacted>")
            .field("auth_attempts_per_sec", &self.auth_attempts_per_sec)
            .field("auth_burst", &self.auth_burst)
            .field("append_retries", &self.append_retries)
            .finish()
    }
}

/// Range-check every field.  Invalid values are rejected, never clamped.
pub fn validate_config(cfg: &ServiceConfig) -> Result<(), ConfigError> {
    if cfg.checkin_code.trim().is_empty() {
        return Err(ConfigError::ValidationFailed("checkin_code must be set"));
    }
    if cfg.admin_code.trim().is_empty() {
        return Err(ConfigError::ValidationFailed("admin_code must be set"));
    }
    if cfg.checkin_code.len() > MAX_CODE_LEN || cfg.admin_code.len() > MAX_CODE_LEN {
        return Err(ConfigError::ValidationFailed(
            "codes must be at most 128 bytes",
        ));
    }
    if !(1..=1000).contains(&cfg.auth_attempts_per_sec) {
        return Err(ConfigError::ValidationFailed(
            "auth_attempts_per_sec must be 1–1000",
        ));
    }
    if !(1..=1000).contains(&cfg.auth_burst) {
        return Err(ConfigError::ValidationFailed("auth_burst must be 1–1000"));
    }
    if !(1..=256).contains(&cfg.append_retries) {
        return Err(ConfigError::ValidationFailed(
            "append_retries must be 1–256",
        ));
    }
    Ok(())
}
