//! Timestamp parsing and formatting shared by the CSV files and the JSON API.
//!
//! Timestamps are naive local date-times with second precision. They are always
//! written as `YYYY-MM-DDTHH:MM:SS`; on input the minute form and a bare date
//! (treated as midnight) are accepted as well.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{DatebookError, DatebookResult};

pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const INPUT_FORMATS: &[&str] = &[FORMAT, "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a timestamp, accepting a date-only value as midnight.
pub fn parse(input: &str) -> DatebookResult<NaiveDateTime> {
    let input = input.trim();

    for format in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }

    parse_date(input)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| DatebookError::invalid("timestamp", input))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> DatebookResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| DatebookError::invalid("date", input))
}

pub fn format(dt: &NaiveDateTime) -> String {
    dt.format(FORMAT).to_string()
}

pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Serde adapter for an optional `YYYY-MM-DD` date.
///
/// Empty strings and the literals `null`/`none` read as absent, so files
/// written by older clients still load.
pub mod optional_date {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) if s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none") => Ok(None),
            Some(s) => parse_date(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
