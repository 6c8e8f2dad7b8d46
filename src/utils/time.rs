//! Time and timestamp utilities

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Current UTC instant
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a producer timestamp
///
/// Producers write RFC 3339 (`2024-05-01T12:00:00.123456+00:00`). A naive
/// ISO-8601 value without an offset is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format an instant the way producers write it
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Milliseconds from `start` to `end`, floored at zero
pub fn millis_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> u64 {
    (*end - *start).num_milliseconds().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-05-01T12:00:00.250+00:00").unwrap();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let expected = base + chrono::Duration::milliseconds(250);
        assert_eq!(ts, expected);
    }

    #[test]
    fn test_parse_converts_offset_to_utc() {
        let ts = parse_timestamp("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = parse_timestamp("2024-05-01T12:00:00.5").unwrap();
        assert_eq!(ts.timestamp_millis() % 1000, 500);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_format_round_trips() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&format_timestamp(&ts)), Some(ts));
    }

    #[test]
    fn test_millis_between_never_negative() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(120);
        assert_eq!(millis_between(&a, &b), 120);
        assert_eq!(millis_between(&b, &a), 0);
    }
}
