//! Shared-code access control.
//!
//! Two scopes exist: the code shared in a check-in link, and the admin
//! code guarding workspace setup and history.  Codes are injected from
//! configuration at construction and only their keyed tags are kept:
//!
//! 1. At startup a random 32-byte key is drawn from the OS CSPRNG.
//! 2. Each configured code is stored as `HMAC-SHA256(key, code)`.
//! 3. A presented code is checked with the constant-time HMAC verify.
//!
//! Each scope has its own token bucket bounding how fast its code can be
//! guessed, so a flood of check-in attempts never locks out the admin.
//! Buckets live in memory: the CLI runs one process per command and each
//! starts full, so the limit only bites inside a long-lived process that
//! keeps one verifier.

use burster::Limiter;
use core::fmt;
use core::time::Duration;
use log::{debug, error, warn};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::app::ports::{AccessError, AccessVerifier};
use crate::config::ServiceConfig;

/// What a code grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessScope {
    /// Recording a check-in via a shared link.
    CheckIn,
    /// Workspace setup and history management.
    Admin,
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckIn => write!(f, "check-in"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// [`AccessVerifier`] backed by codes held in memory as keyed tags.
pub struct SharedCodeVerifier {
    key: [u8; 32],
    checkin_tag: [u8; 32],
    admin_tag: [u8; 32],
    checkin_limiter: AttemptBucket,
    admin_limiter: AttemptBucket,
}

type AttemptBucket = burster::TokenBucket<fn() -> Duration>;

impl SharedCodeVerifier {
    /// Fails with [`AccessError::Unavailable`] if the OS has no entropy
    /// to give.
    pub fn new(
        checkin_code: &str,
        admin_code: &str,
        attempts_per_sec: u32,
        burst: u32,
    ) -> Result<Self, AccessError> {
        let mut key = [0u8; 32];
        OsRng.try_fill_bytes(&mut key).map_err(|e| {
            error!("auth: cannot draw key material: {e}");
            AccessError::Unavailable
        })?;
        let bucket = || -> AttemptBucket {
            burster::TokenBucket::new_with_time_provider(
                attempts_per_sec.into(),
                burst.into(),
                monotonic_now as fn() -> Duration,
            )
        };
        Ok(Self {
            key,
            checkin_tag: hmac_sha256::HMAC::mac(checkin_code.as_bytes(), key),
            admin_tag: hmac_sha256::HMAC::mac(admin_code.as_bytes(), key),
            checkin_limiter: bucket(),
            admin_limiter: bucket(),
        })
    }

    /// Build from a validated [`ServiceConfig`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AccessError> {
        Self::new(
            &config.checkin_code,
            &config.admin_code,
            config.auth_attempts_per_sec,
            config.auth_burst,
        )
    }

    fn tag(&self, scope: AccessScope) -> &[u8; 32] {
        match scope {
            AccessScope::CheckIn => &self.checkin_tag,
            AccessScope::Admin => &self.admin_tag,
        }
    }

    fn limiter(&mut self, scope: AccessScope) -> &mut AttemptBucket {
        match scope {
            AccessScope::CheckIn => &mut self.checkin_limiter,
            AccessScope::Admin => &mut self.admin_limiter,
        }
    }
}

impl AccessVerifier for SharedCodeVerifier {
    fn verify(&mut self, scope: AccessScope, presented: &str) -> Result<(), AccessError> {
        if self.limiter(scope).try_consume(1).is_err() {
            warn!("auth: {scope} attempt rate limited");
            return Err(AccessError::RateLimited);
        }

        if !hmac_sha256::HMAC::verify(presented.as_bytes(), self.key, self.tag(scope)) {
            warn!("auth: {scope} code rejected");
            return Err(AccessError::Denied);
        }

        debug!("auth: {scope} code accepted");
        Ok(())
    }
}

// ── Monotonic time for the rate limiters ─────────────────────

fn monotonic_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}

// ── Tests ────────────────────────────────────────────────────
