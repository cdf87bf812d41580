use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// Parse a timestamp written by SQLite's `datetime('now')`.
///
/// SQLite stores "YYYY-MM-DD HH:MM:SS" without a timezone; treat it as UTC.
/// RFC 3339 strings written by callers that set timestamps explicitly also
/// parse. A corrupt value falls back to the epoch rather than failing the
/// whole response.
pub fn parse_sqlite_timestamp(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", s, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_format_as_utc() {
        let ts = parse_sqlite_timestamp("2007-03-01 12:30:00");
        assert_eq!(ts.to_rfc3339(), "2007-03-01T12:30:00+00:00");
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse_sqlite_timestamp("2007-03-01T12:30:00Z");
        assert_eq!(ts.to_rfc3339(), "2007-03-01T12:30:00+00:00");
    }

    #[test]
    fn corrupt_value_falls_back_to_epoch() {
        assert_eq!(parse_sqlite_timestamp("not a date"), DateTime::<Utc>::default());
    }
}
