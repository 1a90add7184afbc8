use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};

/// Current UTC instant
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Fixed-width ISO 8601 (microseconds, `Z` suffix) so that SQLite text
/// comparison matches chronological order.
pub fn to_sqlite(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Rows written without an offset are UTC.
pub fn from_sqlite(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match s.parse::<DateTime<Utc>>() {
        Ok(dt) => Ok(dt),
        Err(e) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| e),
    }
}

/// Usage-counter bucket: calendar year and ISO week number, e.g. `2024-39`.
pub fn week_key(dt: &DateTime<Utc>) -> String {
    format!("{}-{}", dt.year(), dt.iso_week().week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_roundtrip() {
        let dt = now();
        let s = to_sqlite(&dt);
        let parsed = from_sqlite(&s).unwrap();
        assert_eq!(dt.timestamp_micros(), parsed.timestamp_micros());
    }

    #[test]
    fn test_fixed_width_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let late = early + chrono::Duration::microseconds(1);
        assert!(to_sqlite(&early) < to_sqlite(&late));
        assert_eq!(to_sqlite(&early).len(), to_sqlite(&late).len());
    }

    #[test]
    fn test_legacy_naive_timestamp() {
        let parsed = from_sqlite("2024-09-29T14:03:11.123456").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 9, 29, 14, 3, 11).unwrap()
            + chrono::Duration::microseconds(123_456));
    }

    #[test]
    fn test_week_key() {
        let dt = Utc.with_ymd_and_hms(2024, 9, 29, 12, 0, 0).unwrap();
        assert_eq!(week_key(&dt), "2024-39");
    }
}
