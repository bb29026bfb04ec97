//! Fuzz target: proximity gate (`geo::assess`)
//!
//! Reads a flag byte choosing which altitudes are present, then eight
//! `f64`s (observed lat/lng/alt, center lat/lng/alt, radius, tolerance).
//!
//! Invariants checked:
//! - No panics for any bit pattern, NaN and infinities included
//! - Admission only for inputs that pass validation
//! - An admitted report's distances respect the workspace limits
//!
//! cargo fuzz run fuzz_evaluate

#![no_main]

use geocheckin::geo::{GeoPoint, Workspace, assess};
use libfuzzer_sys::fuzz_target;

fn take_f64(data: &mut &[u8]) -> Option<f64> {
    let (head, rest) = data.split_first_chunk::<8>()?;
    *data = rest;
    Some(f64::from_le_bytes(*head))
}

fuzz_target!(|data: &[u8]| {
    let Some((&flags, mut data)) = data.split_first() else {
        return;
    };
    let mut values = [0.0f64; 8];
    for v in &mut values {
        match take_f64(&mut data) {
            Some(x) => *v = x,
            None => return,
        }
    }
    let [lat, lng, alt, c_lat, c_lng, c_alt, radius, tolerance] = values;

    let observed = GeoPoint {
        latitude: lat,
        longitude: lng,
        altitude: (flags & 1 != 0).then_some(alt),
    };
    let center = GeoPoint {
        latitude: c_lat,
        longitude: c_lng,
        altitude: (flags & 2 != 0).then_some(c_alt),
    };
    let workspace = Workspace::new(center, radius, tolerance);

    let report = assess(&observed, &workspace);
    if report.admission().is_admitted() {
        assert!(observed.validate().is_ok(), "admitted invalid reading");
        assert!(workspace.validate().is_ok(), "admitted against invalid workspace");

        let horizontal = report.horizontal_m.expect("admitted without a distance");
        assert!(horizontal <= radius);
        if let Some(vertical) = report.vertical_m {
            assert!(vertical <= tolerance);
        }
    }
});
