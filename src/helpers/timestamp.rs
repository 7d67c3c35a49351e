//! Serde support for content API timestamps
//!
//! The API emits `2021-03-15T19:25:28+0000` (no colon in the offset);
//! RFC 3339 is accepted as well.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serializer};

const API_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a timestamp in API or RFC 3339 form
pub fn parse(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, API_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
}

pub fn serialize<S>(date: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&date.format(API_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(s) => parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
        None => Ok(None),
    }
}
