//! Check-in records.
//!
//! A record is created once, at a successful check-in, and never mutated.
//! Coordinates are rounded when the record is built so that every backend
//! stores and displays the same values.

use core::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{ALTITUDE_DECIMALS, COORD_DECIMALS, GeoPoint, round_to};

/// Maximum participant name length in bytes.
pub const NAME_CAPACITY: usize = 64;

/// Bounded participant name.
pub type Name = heapless::String<NAME_CAPACITY>;

/// One admitted check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub name: Name,
    /// UTC instant, serialised as ISO-8601.
    pub timestamp: DateTime<Utc>,
    /// Degrees, 5 decimals.
    pub latitude: f64,
    /// Degrees, 5 decimals.
    pub longitude: f64,
    /// Metres, 2 decimals; 0 when the reading had no altitude.
    pub altitude: f64,
}

impl CheckInRecord {
    pub fn from_reading(name: Name, timestamp: DateTime<Utc>, point: &GeoPoint) -> Self {
        Self {
            name,
            timestamp,
            latitude: round_to(point.latitude, COORD_DECIMALS),
            longitude: round_to(point.longitude, COORD_DECIMALS),
            altitude: round_to(point.altitude.unwrap_or(0.0), ALTITUDE_DECIMALS),
        }
    }
}

impl fmt::Display for CheckInRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} [Lat: {:.5}, Lng: {:.5}, Alt: {:.2}]",
            self.name,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.latitude,
            self.longitude,
            self.altitude,
        )
    }
}

/// Trim `raw` and check it fits a record.
pub fn validate_name(raw: &str) -> Result<Name> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("name must not be empty"));
    }
    let mut name = Name::new();
    name.push_str(trimmed)
        .map_err(|()| Error::Validation("name longer than 64 bytes"))?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn record_rounds_coordinates() {
        let point = GeoPoint::new(52.520_008_4, 13.404_954_2).with_altitude(34.127);
        let rec = CheckInRecord::from_reading(validate_name("Ada").unwrap(), noon(), &point);
        assert!((rec.latitude - 52.520_01).abs() < 1e-9);
        assert!((rec.longitude - 13.404_95).abs() < 1e-9);
        assert!((rec.altitude - 34.13).abs() < 1e-9);
    }

    #[test]
    fn missing_altitude_is_recorded_as_zero() {
        let rec = CheckInRecord::from_reading(
            validate_name("Ada").unwrap(),
            noon(),
            &GeoPoint::new(1.0, 2.0),
        );
        assert_eq!(rec.altitude, 0.0);
    }

    #[test]
    fn display_matches_history_listing() {
        let point = GeoPoint::new(52.52, 13.405).with_altitude(34.0);
        let rec = CheckInRecord::from_reading(validate_name("Ada").unwrap(), noon(), &point);
        assert_eq!(
            rec.to_string(),
            "Ada - 2024-05-17T12:00:00.000Z [Lat: 52.52000, Lng: 13.40500, Alt: 34.00]"
        );
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("  Grace  ").unwrap().as_str(), "Grace");
        assert!(matches!(validate_name("   "), Err(Error::Validation(_))));
        assert!(validate_name(&"x".repeat(NAME_CAPACITY)).is_ok());
        assert!(matches!(
            validate_name(&"x".repeat(NAME_CAPACITY + 1)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn json_timestamp_is_iso8601() {
        let rec = CheckInRecord::from_reading(
            validate_name("Ada").unwrap(),
            noon(),
            &GeoPoint::new(1.0, 2.0),
        );
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"timestamp\":\"2024-05-17T12:00:00Z\""), "{json}");
    }
}
