//! Date/time utilities for Daily Digest.
//!
//! Timestamps are stored in UTC as `YYYY-MM-DD HH:MM:SS` strings and only
//! converted to a user's timezone when a local hour or date is needed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::{DigestError, Result};

/// Storage format for UTC timestamps.
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an IANA timezone name (e.g., "America/New_York").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DigestError::Timezone(name.to_string()))
}

/// Convert a UTC instant into the given timezone.
pub fn to_local(dt: &DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    dt.with_timezone(&tz)
}

/// Calendar date of a UTC instant as seen in the given timezone.
pub fn local_date(dt: &DateTime<Utc>, tz: Tz) -> NaiveDate {
    to_local(dt, tz).date_naive()
}

/// Format a UTC instant for storage.
pub fn to_db_string(dt: &DateTime<Utc>) -> String {
    dt.format(DB_DATETIME_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// Accepts the storage format and RFC3339, both interpreted as UTC.
pub fn parse_db_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, DB_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("America/New_York").is_ok());
        assert!(parse_timezone("UTC").is_ok());
        assert!(parse_timezone(" Asia/Tokyo ").is_ok());

        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, DigestError::Timezone(_)));
    }

    #[test]
    fn test_to_local_new_york_winter() {
        let tz = parse_timezone("America/New_York").unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap();
        let local = to_local(&utc, tz);
        assert_eq!(local.hour(), 8);
    }

    #[test]
    fn test_to_local_new_york_summer() {
        let tz = parse_timezone("America/New_York").unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(to_local(&utc, tz).hour(), 8);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        assert_eq!(
            local_date(&utc, tz),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
    }

    #[test]
    fn test_db_string_round_trip() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 13, 5, 0).unwrap();
        let stored = to_db_string(&utc);
        assert_eq!(stored, "2024-01-15 13:05:00");
        assert_eq!(parse_db_datetime(&stored), Some(utc));
    }

    #[test]
    fn test_parse_db_datetime_rfc3339() {
        let parsed = parse_db_datetime("2024-01-15T08:05:00-05:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 13, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_db_datetime_invalid() {
        assert!(parse_db_datetime("yesterday").is_none());
    }
}
