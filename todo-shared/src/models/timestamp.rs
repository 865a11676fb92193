/// Lenient timestamp parsing for request bodies and query strings
///
/// Clients send dates in several shapes: full RFC 3339 strings from
/// `Date.toISOString()`, naive local date-times from `<input type="datetime-local">`,
/// and bare dates in filter query strings. All of them are normalized to UTC.
///
/// Accepted formats:
///
/// ```text
/// 2024-01-15T10:30:00Z          RFC 3339 (any offset)
/// 2024-01-15T10:30:00.123+02:00 RFC 3339 with fraction
/// 2024-01-15T10:30:00           naive, read as UTC
/// 2024-01-15T10:30              naive without seconds, read as UTC
/// 2024-01-15                    midnight UTC
/// ```
///
/// Responses always serialize as RFC 3339 through chrono's serde support.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Error returned when a string matches none of the accepted formats
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid timestamp '{0}': expected an ISO-8601 date or date-time")]
pub struct TimestampError(pub String);

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a timestamp in any of the accepted formats
///
/// # Example
///
/// ```
/// use todo_shared::models::timestamp::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-20").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-01-20T00:00:00+00:00");
/// ```
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let value = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError(raw.to_string()))
}

/// Serde adapter for `Option<DateTime<Utc>>` fields
///
/// `null`, a missing field (with `#[serde(default)]`) and an empty string all
/// deserialize to `None`.
pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(value) if value.trim().is_empty() => Ok(None),
            Some(value) => parse_timestamp(&value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_zulu_with_fraction() {
        let ts = parse_timestamp("2024-01-15T10:00:00.500Z").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_parse_naive_datetime_is_utc() {
        let ts = parse_timestamp("2024-02-15T08:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 15, 8, 30, 0).unwrap());

        let ts = parse_timestamp("2024-02-15T08:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let ts = parse_timestamp("2024-01-20").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("next tuesday").is_err());
        assert!(parse_timestamp("2024-13-45").is_err());
    }

    #[test]
    fn test_option_adapter() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default, deserialize_with = "option::deserialize")]
            at: Option<DateTime<Utc>>,
        }

        let wrapper: Wrapper = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(wrapper.at.is_none());

        let wrapper: Wrapper = serde_json::from_str(r#"{}"#).unwrap();
        assert!(wrapper.at.is_none());

        let wrapper: Wrapper = serde_json::from_str(r#"{"at": ""}"#).unwrap();
        assert!(wrapper.at.is_none());

        let wrapper: Wrapper = serde_json::from_str(r#"{"at": "2024-01-15"}"#).unwrap();
        assert!(wrapper.at.is_some());

        assert!(serde_json::from_str::<Wrapper>(r#"{"at": "soon"}"#).is_err());
    }
}
