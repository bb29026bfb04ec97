//! GeoCheckin — command-line front end
//!
//! Wires the adapters to the service and maps subcommands onto
//! [`AppCommand`]s.  Location flags stand in for the device sensor.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  FixedLocation   LogEventSink   LocalStore<FileKv>  SystemClock│
//! │  (Location)      (EventSink)    (Workspace+History) (Clock)    │
//! │  SharedCodeVerifier             JsonConfigFile                 │
//! │  (AccessVerifier)               (ConfigPort)                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            CheckInService (pure logic)                 │    │
//! │  │  access · proximity gate · records                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use geocheckin::Error;
use geocheckin::adapters::config_file::JsonConfigFile;
use geocheckin::adapters::kv::FileKv;
use geocheckin::adapters::local_store::LocalStore;
use geocheckin::adapters::location::FixedLocationProvider;
use geocheckin::adapters::log_sink::LogEventSink;
use geocheckin::adapters::time::SystemClock;
use geocheckin::app::commands::{AppCommand, CommandReply};
use geocheckin::app::ports::ConfigError;
use geocheckin::app::service::{CheckInOutcome, CheckInService};
use geocheckin::auth::SharedCodeVerifier;
use geocheckin::config::{ServiceConfig, validate_config};
use geocheckin::geo::{GeoPoint, Workspace};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service configuration (JSON).
    #[arg(long, global = true, default_value = "geocheckin.json")]
    config: PathBuf,

    /// Directory holding the workspace and check-in history.
    #[arg(long, global = true, default_value = ".geocheckin")]
    data_dir: PathBuf,

    /// Overrides `checkin_code` from the config file.
    #[arg(long, global = true, env = "GEOCHECKIN_CHECKIN_CODE", hide_env_values = true)]
    service_checkin_code: Option<String>,

    /// Overrides `admin_code` from the config file.
    #[arg(long, global = true, env = "GEOCHECKIN_ADMIN_CODE", hide_env_values = true)]
    service_admin_code: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Configure the workspace zone
    SetWorkspace {
        #[arg(long)]
        admin_code: String,
        #[command(flatten)]
        center: Reading,
        /// Horizontal radius in metres
        #[arg(long)]
        radius: f64,
        /// Allowed altitude difference in metres
        #[arg(long, default_value_t = 0.0)]
        tolerance: f64,
    },
    /// Print the configured workspace
    ShowWorkspace,
    /// Round a device reading for use as the workspace center
    AutoLocate {
        #[command(flatten)]
        reading: Reading,
    },
    /// Check in from the given position
    CheckIn {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        reading: Reading,
    },
    /// List check-ins, newest first
    History {
        #[arg(long)]
        admin_code: String,
    },
    /// Erase all check-ins
    ClearHistory {
        #[arg(long)]
        admin_code: String,
    },
}

/// A simulated geolocation reading.
#[derive(Args, Clone, Copy)]
struct Reading {
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
    /// Altitude in metres, when the device reports one
    #[arg(long, allow_negative_numbers = true)]
    alt: Option<f64>,
}

impl Reading {
    fn point(self) -> GeoPoint {
        GeoPoint {
            latitude: self.lat,
            longitude: self.lng,
            altitude: self.alt,
        }
    }
}

impl Command {
    /// Split into the service command and the location the device reports.
    fn into_parts(self) -> (AppCommand, FixedLocationProvider) {
        match self {
            Self::SetWorkspace {
                admin_code,
                center,
                radius,
                tolerance,
            } => (
                AppCommand::SaveWorkspace {
                    admin_code,
                    workspace: Workspace::new(center.point(), radius, tolerance),
                },
                FixedLocationProvider::unavailable(),
            ),
            Self::ShowWorkspace => (
                AppCommand::ShowWorkspace,
                FixedLocationProvider::unavailable(),
            ),
            Self::AutoLocate { reading } => (
                AppCommand::AutoLocate,
                FixedLocationProvider::new(reading.point()),
            ),
            Self::CheckIn {
                code,
                name,
                reading,
            } => (
                AppCommand::CheckIn { name, code },
                FixedLocationProvider::new(reading.point()),
            ),
            Self::History { admin_code } => (
                AppCommand::ViewHistory { admin_code },
                FixedLocationProvider::unavailable(),
            ),
            Self::ClearHistory { admin_code } => (
                AppCommand::ClearHistory { admin_code },
                FixedLocationProvider::unavailable(),
            ),
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("GeoCheckin v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let kv = FileKv::open(&cli.data_dir)
        .map_err(Error::from)
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    let verifier = SharedCodeVerifier::from_config(&config)
        .map_err(Error::from)
        .context("preparing code checks")?;
    let mut service = CheckInService::new(LocalStore::new(kv), verifier, SystemClock);
    let mut sink = LogEventSink::new();

    let (cmd, mut location) = cli.command.into_parts();
    let reply = service.handle_command(cmd, &mut location, &mut sink)?;
    Ok(print_reply(&reply))
}

/// Config file (if any), then flag/env overrides, then validation.
fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    let file = JsonConfigFile::new(&cli.config);
    let mut config = match file.load_unchecked() {
        Ok(config) => config,
        Err(ConfigError::NotFound) => {
            info!("No config at {}, using defaults", file.path().display());
            ServiceConfig::default()
        }
        Err(e) => return Err(Error::from(e)).context("loading config"),
    };

    if let Some(code) = &cli.service_checkin_code {
        config.checkin_code.clone_from(code);
    }
    if let Some(code) = &cli.service_admin_code {
        config.admin_code.clone_from(code);
    }

    validate_config(&config)
        .map_err(Error::from)
        .context("invalid configuration")?;
    Ok(config)
}

fn print_reply(reply: &CommandReply) -> ExitCode {
    match reply {
        CommandReply::WorkspaceSaved => println!("Workspace settings saved."),
        CommandReply::Workspace(None) => {
            println!("No workspace configured.");
            return ExitCode::FAILURE;
        }
        CommandReply::Workspace(Some(ws)) => {
            println!("Center:    {}", ws.center);
            println!("Radius:    {} m", ws.radius_m);
            println!("Tolerance: {} m", ws.vertical_tolerance_m);
        }
        CommandReply::Located(point) => println!("Location: {point}"),
        CommandReply::CheckIn(CheckInOutcome::Admitted(record)) => {
            println!("Checked in: {record}");
        }
        CommandReply::CheckIn(CheckInOutcome::Denied(report)) => {
            println!("Check-in denied: {}", report.verdict);
            if let Some(d) = report.horizontal_m {
                println!("  distance from workspace: {d:.1} m");
            }
            if let Some(v) = report.vertical_m {
                println!("  altitude difference: {v:.1} m");
            }
            return ExitCode::from(2);
        }
        CommandReply::History(records) if records.is_empty() => println!("No check-ins found."),
        CommandReply::History(records) => {
            for record in records {
                println!("{record}");
            }
        }
        CommandReply::HistoryCleared => println!("History cleared."),
    }
    ExitCode::SUCCESS
}
