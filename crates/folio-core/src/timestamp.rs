//! Normalization of the timestamp shapes clients and backends hand us.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

/// The representations a timestamp may arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp<'a> {
    Native(DateTime<Utc>),
    /// Seconds since the Unix epoch.
    EpochSeconds(f64),
    Text(&'a str),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Value is not a valid DateTime: {0}")]
pub struct TimestampError(pub String);

/// Convert any supported representation into a UTC instant.
pub fn normalize(raw: RawTimestamp<'_>) -> Result<DateTime<Utc>, TimestampError> {
    match raw {
        RawTimestamp::Native(at) => Ok(at),
        RawTimestamp::EpochSeconds(secs) => {
            if !secs.is_finite() {
                return Err(TimestampError(secs.to_string()));
            }
            let floor = secs.floor();
            let mut whole = floor as i64;
            // The fraction is measured up from the floor, so it is never negative.
            let mut nanos = ((secs - floor) * 1_000_000_000.0).round() as u32;
            if nanos >= 1_000_000_000 {
                whole += 1;
                nanos -= 1_000_000_000;
            }
            Utc.timestamp_opt(whole, nanos)
                .single()
                .ok_or_else(|| TimestampError(secs.to_string()))
        }
        RawTimestamp::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at.with_timezone(&Utc));
    }
    // Zone-less ISO forms are read as UTC.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(TimestampError(text.to_string()))
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2025-01-31T09:15:00.000Z`.
pub fn to_iso(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shapes_normalize_to_same_instant() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 31, 9, 15, 0).unwrap();

        let from_native = normalize(RawTimestamp::Native(expected)).unwrap();
        let from_epoch = normalize(RawTimestamp::EpochSeconds(expected.timestamp() as f64)).unwrap();
        let from_iso = normalize(RawTimestamp::Text("2025-01-31T09:15:00Z")).unwrap();
        let from_offset = normalize(RawTimestamp::Text("2025-01-31T10:15:00+01:00")).unwrap();
        let from_naive = normalize(RawTimestamp::Text("2025-01-31 09:15:00")).unwrap();

        for value in [from_native, from_epoch, from_iso, from_offset, from_naive] {
            assert_eq!(value, expected);
        }
        assert_eq!(to_iso(&expected), "2025-01-31T09:15:00.000Z");
    }

    #[test]
    fn test_negative_fractional_epoch_moves_backwards() {
        let at = normalize(RawTimestamp::EpochSeconds(-1.5)).unwrap();
        assert_eq!(to_iso(&at), "1969-12-31T23:59:58.500Z");

        let at = normalize(RawTimestamp::EpochSeconds(1_700_000_000.25)).unwrap();
        assert_eq!(to_iso(&at), "2023-11-14T22:13:20.250Z");

        // Fractions that round up to a full second carry over.
        let at = normalize(RawTimestamp::EpochSeconds(-0.000_000_000_1)).unwrap();
        assert_eq!(to_iso(&at), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(normalize(RawTimestamp::Text("yesterday")).is_err());
        assert!(normalize(RawTimestamp::EpochSeconds(f64::NAN)).is_err());
    }
}
