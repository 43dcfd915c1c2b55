//! Lenient timestamp parsing for request bodies and query strings.
//!
//! Accepted forms, all normalised to UTC:
//! - RFC 3339 with offset (`2024-02-01T10:00:00+02:00`, `...Z`)
//! - naive date-time, read as UTC (`2024-02-01T10:00:00`, optional fraction)
//! - plain date, read as midnight UTC (`2024-02-01`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

pub fn parse_flexible(input: &str) -> Result<DateTime<Utc>, String> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(format!(
        "invalid date '{s}': expected RFC 3339 timestamp or YYYY-MM-DD"
    ))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_flexible(&s).map_err(de::Error::custom)
}

pub mod option {
    use super::*;

    /// Missing, `null` and empty strings all decode to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_flexible(&s).map(Some).map_err(de::Error::custom),
        }
    }
}
