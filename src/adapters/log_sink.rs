//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  A dashboard or webhook adapter would implement the
//! same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::WorkspaceSaved(ws) => {
                info!(
                    "WORKSPACE | center={} | radius={:.1}m | tolerance={:.1}m",
                    ws.center, ws.radius_m, ws.vertical_tolerance_m
                );
            }
            AppEvent::CheckedIn(record) => {
                info!("CHECKIN | {}", record);
            }
            AppEvent::CheckInDenied { name, report } => {
                info!(
                    "DENIED | {} | {} | horizontal={} vertical={}",
                    name,
                    report.verdict,
                    fmt_metres(report.horizontal_m),
                    fmt_metres(report.vertical_m),
                );
            }
            AppEvent::AccessDenied { scope, reason } => {
                warn!("ACCESS | {} code refused: {}", scope, reason);
            }
            AppEvent::HistoryCleared => {
                info!("HISTORY | cleared");
            }
        }
    }
}

fn fmt_metres(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.1}m"))
}
