use crate::error::TimestampError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Parses a timestamp string into UTC.
/// Supports RFC 3339, the classic Twitter `created_at` format, SQLite
/// datetimes and bare dates; anything else is handed to `dateparser`.
pub fn parse_timestamp(timestamp_str: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = timestamp_str.trim();
    if trimmed.is_empty() {
        return Err(TimestampError(timestamp_str.to_string()));
    }

    // ISO 8601 with timezone (e.g., "2020-04-19T18:58:46Z" or "2020-04-19T18:58:46+02:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Twitter API v1.1 (e.g., "Sun Apr 19 18:58:46 +0000 2020")
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%a %b %d %H:%M:%S %z %Y") {
        return Ok(dt.with_timezone(&Utc));
    }

    // No timezone: assume UTC
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive_dt.and_utc());
        }
    }

    // Date only - treat as midnight UTC
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive_dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive_dt.and_utc());
        }
    }

    // Zone-less inputs are read as UTC here too
    dateparser::parse_with_timezone(trimmed, &Utc)
        .map_err(|_| TimestampError(timestamp_str.to_string()))
}

/// Renders a UTC timestamp in the local timezone
pub fn format_timestamp_to_local(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Sanitizes a string for use in a filename
/// Replaces invalid filename characters with hyphens
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 4, 19, 18, 58, 46).unwrap()
    }

    #[test]
    fn test_parse_timestamp_empty() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("   ").is_err());
    }

    #[test]
    fn test_parse_timestamp_rfc3339_with_z() {
        assert_eq!(parse_timestamp("2020-04-19T18:58:46Z").unwrap(), expected());
    }

    #[test]
    fn test_parse_timestamp_rfc3339_with_offset() {
        assert_eq!(parse_timestamp("2020-04-19T20:58:46+02:00").unwrap(), expected());
    }

    #[test]
    fn test_parse_timestamp_twitter_format() {
        assert_eq!(parse_timestamp("Sun Apr 19 18:58:46 +0000 2020").unwrap(), expected());
    }

    #[test]
    fn test_parse_timestamp_iso8601_no_timezone() {
        assert_eq!(parse_timestamp("2020-04-19T18:58:46").unwrap(), expected());
    }

    #[test]
    fn test_parse_timestamp_sqlite_format() {
        assert_eq!(parse_timestamp("2020-04-19 18:58:46").unwrap(), expected());
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        assert_eq!(
            parse_timestamp("2020-04-19").unwrap(),
            Utc.with_ymd_and_hms(2020, 4, 19, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_zoneless_fallback_is_utc() {
        assert_eq!(parse_timestamp("2020/04/19 18:58:46").unwrap(), expected());
        assert_eq!(
            parse_timestamp("2020/04/19 18:58:46").unwrap(),
            parse_timestamp("2020-04-19 18:58:46").unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        let err = parse_timestamp("not-a-timestamp").unwrap_err();
        assert_eq!(err, TimestampError("not-a-timestamp".to_string()));
    }

    #[test]
    fn test_format_timestamp_to_local() {
        let result = format_timestamp_to_local(expected());
        // Local timezone varies, only the shape is stable
        assert!(result.starts_with("2020-04-"));
        assert!(result.contains(':'));
    }

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("posts per country"), "posts per country");
    }

    #[test]
    fn test_sanitize_filename_with_slashes() {
        assert_eq!(sanitize_filename("deniers/acceptors"), "deniers-acceptors");
        assert_eq!(sanitize_filename("deniers\\acceptors"), "deniers-acceptors");
    }

    #[test]
    fn test_sanitize_filename_with_special_chars() {
        assert_eq!(sanitize_filename("a*b?c\"d<e>f|g:h"), "a-b-c-d-e-f-g-h");
    }

    #[test]
    fn test_sanitize_filename_with_whitespace() {
        assert_eq!(sanitize_filename("  world map  "), "world map");
    }

    #[test]
    fn test_sanitize_filename_empty() {
        assert_eq!(sanitize_filename(""), "");
    }
}
