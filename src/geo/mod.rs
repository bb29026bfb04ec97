//! Geographic primitives — points, great-circle distance, proximity gate.
//!
//! Everything in here is pure and synchronous.  Nothing allocates, nothing
//! panics on bad input, and every type is `Copy`, so the evaluator can be
//! called from any number of threads without coordination.

pub mod proximity;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use proximity::{Admission, ProximityReport, Verdict, Workspace, assess, evaluate};

/// Mean Earth radius in metres (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Decimal places kept for latitude/longitude in stored records and UI.
pub const COORD_DECIMALS: i32 = 5;

/// Decimal places kept for altitude in stored records.
pub const ALTITUDE_DECIMALS: i32 = 2;

// ───────────────────────────────────────────────────────────────
// GeoPoint
// ───────────────────────────────────────────────────────────────

/// A position on the Earth's surface as reported by a location sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Degrees, −90..=90.
    pub latitude: f64,
    /// Degrees, −180..=180.
    pub longitude: f64,
    /// Metres above the reference ellipsoid, when the sensor reports one.
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    #[must_use]
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Check that every component is finite and inside its range.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(InvalidInput::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InvalidInput::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InvalidInput::LongitudeOutOfRange);
        }
        if self.altitude.is_some_and(|a| !a.is_finite()) {
            return Err(InvalidInput::NonFiniteAltitude);
        }
        Ok(())
    }

    /// Copy with latitude/longitude rounded to [`COORD_DECIMALS`].
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            latitude: round_to(self.latitude, COORD_DECIMALS),
            longitude: round_to(self.longitude, COORD_DECIMALS),
            altitude: self.altitude,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5}", self.latitude, self.longitude)?;
        if let Some(alt) = self.altitude {
            write!(f, ", {alt:.2}m")?;
        }
        write!(f, ")")
    }
}

// ───────────────────────────────────────────────────────────────
// Invalid input taxonomy
// ───────────────────────────────────────────────────────────────

/// Why an input to the evaluator was rejected.  Never surfaces as an
/// error: the evaluator folds every variant into a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    NonFiniteCoordinate,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    NonFiniteAltitude,
    /// Radius is negative or not finite.
    InvalidRadius,
    /// Vertical tolerance is negative or not finite.
    InvalidTolerance,
}

impl InvalidInput {
    pub const fn message(self) -> &'static str {
        match self {
            Self::NonFiniteCoordinate => "coordinate is not finite",
            Self::LatitudeOutOfRange => "latitude outside -90..=90",
            Self::LongitudeOutOfRange => "longitude outside -180..=180",
            Self::NonFiniteAltitude => "altitude is not finite",
            Self::InvalidRadius => "radius must be a finite non-negative number",
            Self::InvalidTolerance => "vertical tolerance must be a finite non-negative number",
        }
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ───────────────────────────────────────────────────────────────
// Distance
// ───────────────────────────────────────────────────────────────

/// Great-circle distance in metres between two points (Haversine).
///
/// Altitude is ignored.  Inputs are not validated; non-finite coordinates
/// propagate as NaN, which [`assess`] treats as invalid input.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Round `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
