//! Outbound application events.
//!
//! The [`CheckInService`](super::service::CheckInService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — log them, forward them to
//! a dashboard, count them.

use crate::app::ports::AccessError;
use crate::auth::AccessScope;
use crate::geo::{ProximityReport, Workspace};
use crate::history::{CheckInRecord, Name};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The admin stored a new workspace.
    WorkspaceSaved(Workspace),

    /// A check-in was admitted and recorded.
    CheckedIn(CheckInRecord),

    /// A check-in was evaluated and refused; nothing was stored.
    CheckInDenied { name: Name, report: ProximityReport },

    /// A presented code was rejected.
    AccessDenied {
        scope: AccessScope,
        reason: AccessError,
    },

    /// The admin cleared the check-in history.
    HistoryCleared,
}
