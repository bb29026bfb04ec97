//! Proximity gate: is an observed position inside a workspace?
//!
//! ```text
//!   observed ──┐
//!              ├──▶ assess ──▶ ProximityReport ──▶ Admission
//!   workspace ─┘
//! ```
//!
//! Both comparisons are inclusive.  Any malformed input resolves to
//! [`Admission::Denied`] so that bad upstream data fails closed.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{GeoPoint, InvalidInput, haversine_distance};

/// Admin-configured check-in zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Zone center.  Its altitude, when set, is the vertical reference.
    pub center: GeoPoint,
    /// Horizontal radius in metres.
    pub radius_m: f64,
    /// Allowed absolute altitude difference in metres.
    pub vertical_tolerance_m: f64,
}

impl Workspace {
    pub const fn new(center: GeoPoint, radius_m: f64, vertical_tolerance_m: f64) -> Self {
        Self {
            center,
            radius_m,
            vertical_tolerance_m,
        }
    }

    /// Bounds the evaluator needs: valid center, finite non-negative
    /// radius and tolerance.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        self.center.validate()?;
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(InvalidInput::InvalidRadius);
        }
        if !self.vertical_tolerance_m.is_finite() || self.vertical_tolerance_m < 0.0 {
            return Err(InvalidInput::InvalidTolerance);
        }
        Ok(())
    }
}

/// Binary outcome of a proximity evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Denied,
}

impl Admission {
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::Admitted)
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admitted => write!(f, "admitted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Why the gate decided the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Inside the radius and, when applicable, the vertical tolerance.
    Within,
    OutsideRadius,
    OutsideVerticalTolerance,
    /// The workspace has a reference altitude but the reading had none.
    MissingAltitude,
    InvalidInput(InvalidInput),
}

impl Verdict {
    pub const fn admission(self) -> Admission {
        match self {
            Self::Within => Admission::Admitted,
            _ => Admission::Denied,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Within => write!(f, "within range"),
            Self::OutsideRadius => write!(f, "outside radius"),
            Self::OutsideVerticalTolerance => write!(f, "outside vertical tolerance"),
            Self::MissingAltitude => write!(f, "reading has no altitude"),
            Self::InvalidInput(e) => write!(f, "invalid input: {e}"),
        }
    }
}

/// Full result of [`assess`]: measured distances plus the verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityReport {
    /// Great-circle distance to the center; `None` for invalid input.
    pub horizontal_m: Option<f64>,
    /// Absolute altitude difference; `None` when the vertical gate did
    /// not apply.
    pub vertical_m: Option<f64>,
    pub verdict: Verdict,
}

impl ProximityReport {
    const fn invalid(reason: InvalidInput) -> Self {
        Self {
            horizontal_m: None,
            vertical_m: None,
            verdict: Verdict::InvalidInput(reason),
        }
    }

    pub const fn admission(&self) -> Admission {
        self.verdict.admission()
    }
}

/// Evaluate `observed` against `workspace`, keeping the measurements.
pub fn assess(observed: &GeoPoint, workspace: &Workspace) -> ProximityReport {
    if let Err(reason) = observed.validate().and_then(|()| workspace.validate()) {
        return ProximityReport::invalid(reason);
    }

    let horizontal = haversine_distance(observed, &workspace.center);
    if !horizontal.is_finite() {
        return ProximityReport::invalid(InvalidInput::NonFiniteCoordinate);
    }

    let vertical = match (workspace.center.altitude, observed.altitude) {
        (None, _) => None,
        (Some(_), None) => {
            return ProximityReport {
                horizontal_m: Some(horizontal),
                vertical_m: None,
                verdict: Verdict::MissingAltitude,
            };
        }
        (Some(reference), Some(altitude)) => Some((altitude - reference).abs()),
    };

    let verdict = if horizontal > workspace.radius_m {
        Verdict::OutsideRadius
    } else if vertical.is_some_and(|v| v > workspace.vertical_tolerance_m) {
        Verdict::OutsideVerticalTolerance
    } else {
        Verdict::Within
    };

    ProximityReport {
        horizontal_m: Some(horizontal),
        vertical_m: vertical,
        verdict,
    }
}

/// Admission decision for `observed` against `workspace`.  Total: never
/// panics, and every malformed input yields [`Admission::Denied`].
pub fn evaluate(observed: &GeoPoint, workspace: &Workspace) -> Admission {
    assess(observed, workspace).admission()
}
