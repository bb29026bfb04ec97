//! System clock adapter.
//!
//! Provides wall-clock time for check-in timestamps.

use chrono::{DateTime, Utc};

use crate::app::ports::Clock;

/// [`Clock`] backed by the host's UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
