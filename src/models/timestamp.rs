//! Serde codec for the backend's timestamp format.
//!
//! The service writes ISO-8601 timestamps with fractional seconds
//! (`yyyy-MM-dd'T'HH:mm:ss.SSS` plus offset) but older rows carry the plain
//! form without a fraction. Decoding tries the fractional pattern first and
//! falls back to plain ISO-8601; anything else is a decoding error.
//! Encoding always emits the fractional form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

/// Fractional-seconds pattern, offset included
const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, false))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, FRACTIONAL_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
}
