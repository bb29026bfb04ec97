//! Application service — the hexagonal core.
//!
//! [`CheckInService`] owns the store, the access verifier and the clock.
//! It exposes a clean, device-agnostic API.  The location provider and
//! the event sink are injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  LocationProvider ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                       │     CheckInService       │
//!  Workspace +     ◀──▶ │  access · proximity      │
//!  HistoryStore         │  records                 │
//!                       └─────────────────────────┘
//! ```

use log::{info, warn};

use crate::auth::AccessScope;
use crate::error::{Error, Result};
use crate::geo::{self, GeoPoint, ProximityReport, Workspace};
use crate::history::{self, CheckInRecord};

use super::commands::{AppCommand, CommandReply};
use super::events::AppEvent;
use super::ports::{
    AccessVerifier, Clock, EventSink, HistoryStore, LocationProvider, WorkspaceStore,
};

/// What happened to a check-in attempt that passed the code check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
    /// Inside the zone; the stored record is returned.
    Admitted(CheckInRecord),
    /// Outside the zone (or bad reading); nothing was stored.
    Denied(ProximityReport),
}

impl CheckInOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }
}

// ───────────────────────────────────────────────────────────────
// CheckInService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
///
/// The store satisfies **both** [`WorkspaceStore`] and [`HistoryStore`]:
/// every backend keeps the workspace and the history side by side.
pub struct CheckInService<S, A, C> {
    store: S,
    access: A,
    clock: C,
    admitted: u64,
    denied: u64,
}

impl<S, A, C> CheckInService<S, A, C>
where
    S: WorkspaceStore + HistoryStore,
    A: AccessVerifier,
    C: Clock,
{
    pub fn new(store: S, access: A, clock: C) -> Self {
        Self {
            store,
            access,
            clock,
            admitted: 0,
            denied: 0,
        }
    }

    // ── Admin ─────────────────────────────────────────────────

    /// Validate and store the workspace, replacing any previous one.
    pub fn save_workspace(
        &mut self,
        admin_code: &str,
        workspace: Workspace,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.authorize(AccessScope::Admin, admin_code, sink)?;
        validate_workspace(&workspace)?;
        self.store.save_workspace(&workspace)?;
        info!(
            "Workspace saved: center={} radius={}m tolerance={}m",
            workspace.center, workspace.radius_m, workspace.vertical_tolerance_m
        );
        sink.emit(&AppEvent::WorkspaceSaved(workspace));
        Ok(())
    }

    /// The stored workspace, or `None` when not configured.
    pub fn workspace(&self) -> Result<Option<Workspace>> {
        Ok(self.store.load_workspace()?)
    }

    /// Read the device position for pre-filling the workspace center,
    /// rounded the way the setup form displays it.
    pub fn auto_locate(&self, location: &mut impl LocationProvider) -> Result<GeoPoint> {
        let position = location.current_position()?;
        position
            .validate()
            .map_err(|e| Error::Validation(e.message()))?;
        Ok(position.rounded())
    }

    /// Check-ins, newest first.
    pub fn history(
        &mut self,
        admin_code: &str,
        sink: &mut impl EventSink,
    ) -> Result<Vec<CheckInRecord>> {
        self.authorize(AccessScope::Admin, admin_code, sink)?;
        Ok(self.store.list()?)
    }

    /// Erase every check-in.
    pub fn clear_history(&mut self, admin_code: &str, sink: &mut impl EventSink) -> Result<()> {
        self.authorize(AccessScope::Admin, admin_code, sink)?;
        self.store.clear()?;
        info!("Check-in history cleared");
        sink.emit(&AppEvent::HistoryCleared);
        Ok(())
    }

    // ── Check-in ──────────────────────────────────────────────

    /// Run one check-in attempt: code → name → workspace → location →
    /// proximity gate → record.
    ///
    /// A denial is a normal outcome, not an error; errors are reserved
    /// for rejected codes, bad names, missing setup, and I/O.
    pub fn check_in(
        &mut self,
        name: &str,
        code: &str,
        location: &mut impl LocationProvider,
        sink: &mut impl EventSink,
    ) -> Result<CheckInOutcome> {
        self.authorize(AccessScope::CheckIn, code, sink)?;
        let name = history::validate_name(name)?;
        let workspace = self.store.load_workspace()?.ok_or(Error::NotConfigured)?;
        let position = location.current_position()?;

        let report = geo::assess(&position, &workspace);
        if !report.admission().is_admitted() {
            self.denied += 1;
            info!("Check-in denied for '{}': {}", name, report.verdict);
            sink.emit(&AppEvent::CheckInDenied { name, report });
            return Ok(CheckInOutcome::Denied(report));
        }

        let record = CheckInRecord::from_reading(name, self.clock.now(), &position);
        self.store.append(record.clone())?;
        self.admitted += 1;
        info!(
            "Check-in admitted for '{}' at {:.1}m",
            record.name,
            report.horizontal_m.unwrap_or_default()
        );
        sink.emit(&AppEvent::CheckedIn(record.clone()));
        Ok(CheckInOutcome::Admitted(record))
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        location: &mut impl LocationProvider,
        sink: &mut impl EventSink,
    ) -> Result<CommandReply> {
        match cmd {
            AppCommand::SaveWorkspace {
                admin_code,
                workspace,
            } => {
                self.save_workspace(&admin_code, workspace, sink)?;
                Ok(CommandReply::WorkspaceSaved)
            }
            AppCommand::ShowWorkspace => Ok(CommandReply::Workspace(self.workspace()?)),
            AppCommand::AutoLocate => Ok(CommandReply::Located(self.auto_locate(location)?)),
            AppCommand::CheckIn { name, code } => Ok(CommandReply::CheckIn(
                self.check_in(&name, &code, location, sink)?,
            )),
            AppCommand::ViewHistory { admin_code } => {
                Ok(CommandReply::History(self.history(&admin_code, sink)?))
            }
            AppCommand::ClearHistory { admin_code } => {
                self.clear_history(&admin_code, sink)?;
                Ok(CommandReply::HistoryCleared)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Admitted check-ins since this service was constructed.
    pub fn admitted_count(&self) -> u64 {
        self.admitted
    }

    /// Denied check-ins since this service was constructed.
    pub fn denied_count(&self) -> u64 {
        self.denied
    }

    /// Borrow the backing store (read-back in tests and tooling).
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Internal ──────────────────────────────────────────────

    fn authorize(
        &mut self,
        scope: AccessScope,
        code: &str,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.access.verify(scope, code).map_err(|reason| {
            warn!("Access denied ({scope}): {reason}");
            sink.emit(&AppEvent::AccessDenied { scope, reason });
            Error::Access(reason)
        })
    }
}

/// Setup-time checks, stricter than the evaluator's: the radius must be
/// strictly positive.
pub fn validate_workspace(workspace: &Workspace) -> Result<()> {
    workspace
        .validate()
        .map_err(|e| Error::Validation(e.message()))?;
    if workspace.radius_m <= 0.0 {
        return Err(Error::Validation("radius must be greater than zero"));
    }
    Ok(())
}
