//! GeoCheckin library.
//!
//! Location-gated check-ins: an admin sets a workspace (center, radius,
//! vertical tolerance); users present a shared code and their position,
//! and the proximity gate in [`geo`] decides admission.  The
//! [`app`] layer drives the flows through port traits; [`adapters`]
//! provides the concrete backends.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod geo;
pub mod history;

pub use error::{Error, Result};
