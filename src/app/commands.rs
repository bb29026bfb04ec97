//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (CLI, a web
//! handler, a test harness) that the
//! [`CheckInService`](super::service::CheckInService) interprets and
//! acts upon.

use crate::geo::{GeoPoint, Workspace};
use crate::history::CheckInRecord;

use super::service::CheckInOutcome;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Store the workspace (admin only).
    SaveWorkspace {
        admin_code: String,
        workspace: Workspace,
    },

    /// Read back the stored workspace.
    ShowWorkspace,

    /// Read the device location to pre-fill the workspace center.
    AutoLocate,

    /// Attempt a check-in with the link's shared code.
    CheckIn { name: String, code: String },

    /// List check-ins, newest first (admin only).
    ViewHistory { admin_code: String },

    /// Erase every check-in (admin only).
    ClearHistory { admin_code: String },
}

/// Result of a successfully handled [`AppCommand`].
#[derive(Debug, Clone)]
pub enum CommandReply {
    WorkspaceSaved,
    Workspace(Option<Workspace>),
    Located(GeoPoint),
    CheckIn(CheckInOutcome),
    History(Vec<CheckInRecord>),
    HistoryCleared,
}
