//! Location provider adapters.
//!
//! [`FixedLocationProvider`] answers every request with the same reading
//! (or the same failure).  The CLI builds one from `--lat/--lng/--alt`,
//! and tests use it to place a user anywhere on the globe.

use log::debug;

use crate::app::ports::{LocationError, LocationProvider};
use crate::geo::GeoPoint;

#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    reading: Result<GeoPoint, LocationError>,
}

impl FixedLocationProvider {
    pub fn new(position: GeoPoint) -> Self {
        Self {
            reading: Ok(position),
        }
    }

    /// A provider that always fails with `error`.
    pub fn failing(error: LocationError) -> Self {
        Self { reading: Err(error) }
    }

    /// A provider for flows that should never need a position.
    pub fn unavailable() -> Self {
        Self::failing(LocationError::Unavailable)
    }

    /// Move the device.
    pub fn set(&mut self, position: GeoPoint) {
        self.reading = Ok(position);
    }
}

impl LocationProvider for FixedLocationProvider {
    fn current_position(&mut self) -> Result<GeoPoint, LocationError> {
        debug!("location: {:?}", self.reading);
        self.reading
    }
}
