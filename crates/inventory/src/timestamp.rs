//! Timestamp codec for the wire and for display.
//!
//! Timestamps cross the wire as ISO-8601 strings. Outgoing values are RFC 3339
//! in UTC with millisecond precision (`2024-01-01T00:00:00.000Z`). Incoming
//! values may carry an offset, or may be naive (`2024-01-01T00:00:00.123456`);
//! naive values are read as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};

use invtrack_core::{DomainError, DomainResult};

/// Display pattern used by front-ends: `dd/mm/yyyy, HH:MM:SS`.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Zone every timestamp is shown in, whatever the machine's own zone.
pub const DISPLAY_ZONE: Tz = chrono_tz::Europe::Skopje;

/// Parse an ISO-8601 timestamp received from the remote store.
pub fn parse(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| DomainError::validation(format!("invalid timestamp {raw:?}: {e}")))
}

/// Render a timestamp for the wire.
pub fn to_wire(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a timestamp as Europe/Skopje wall-clock time (CET/CEST).
pub fn to_display(ts: &DateTime<Utc>) -> String {
    to_display_in(ts, &DISPLAY_ZONE)
}

/// Render a timestamp in an explicit time zone.
pub fn to_display_in<Tz>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    ts.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

/// `#[serde(with = "timestamp")]` support.
pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_wire(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}
