//! Time and timestamp helpers.

use chrono::{DateTime, FixedOffset};

/// Timestamp carrying the dispatcher's UTC offset.
///
/// Scheduling dates are entered in local time; the offset is kept as-is so a
/// stored request reads back exactly as it was written.
pub type ZonedTimestamp = DateTime<FixedOffset>;

/// Parse an RFC 3339 timestamp, preserving its offset.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `text` is not valid RFC 3339.
pub fn parse_rfc3339(text: &str) -> Result<ZonedTimestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_preserve_offset_when_parsing() {
        let ts = parse_rfc3339("2024-05-10T08:30:00-05:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(ts.to_rfc3339(), "2024-05-10T08:30:00-05:00");
    }

    #[test]
    fn should_reject_malformed_timestamp() {
        assert!(parse_rfc3339("10/05/2024").is_err());
    }
}
