//! Timestamp parsing and human-readable time labels.
//!
//! The backend is not consistent about timestamp shape: some endpoints
//! return RFC 3339 (`2026-10-18T09:15:00.000Z`), others a bare SQL
//! datetime (`2026-10-18 09:15:00`) or just a date. Everything funnels
//! through [`parse_timestamp`], which treats naive values as UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse any timestamp shape the backend emits. Returns UTC-naive.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// serde helper for required timestamp fields.
pub fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
}

/// serde helper for nullable timestamp fields. Unparsable strings become `None`.
pub fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(parse_timestamp)
        .map(|naive| Utc.from_utc_datetime(&naive)))
}

/// Long-form header label, e.g. `Sunday, October 18, 2026 at 9:15 AM`.
pub fn format_date_time<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dt.format("%A, %B %-d, %Y at %-I:%M %p").to_string()
}

/// [`format_date_time`] applied to the local clock.
pub fn format_current_date_time() -> String {
    format_date_time(&Local::now())
}

/// Relative label for feed entries and activity rows.
///
/// Future timestamps (clock skew between client and backend) read as
/// "Just now". Anything older than a week falls back to a short date.
pub fn get_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "Just now".to_string();
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return plural(days, "day");
    }
    then.format("%b %-d, %Y").to_string()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
