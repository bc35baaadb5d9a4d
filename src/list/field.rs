use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;

use crate::format::parse_timestamp;

/// Largest magnitude below which every whole f64 converts to i64 exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Declared type of a list column. Drives how filter values are matched
/// and how rows are ordered when the column is the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Date,
}

/// A single primitive value read out of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT => write!(f, "{}", *n as i64),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(d: NaiveDateTime) -> Self {
        FieldValue::Date(d)
    }
}

impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for FieldValue {
    fn from(d: chrono::DateTime<Tz>) -> Self {
        FieldValue::Date(d.naive_utc())
    }
}

impl FieldValue {
    /// Case-insensitive substring test used by free-text search.
    /// `needle_lower` must already be lowercased.
    pub fn contains_lower(&self, needle_lower: &str) -> bool {
        self.to_string().to_lowercase().contains(needle_lower)
    }

    /// Does this value satisfy an equality filter of the given kind?
    pub fn matches_filter(&self, kind: FieldKind, wanted: &str) -> bool {
        match kind {
            FieldKind::Text => self.to_string() == wanted,
            FieldKind::Number => match (self.as_number(), wanted.trim().parse::<f64>()) {
                (Some(have), Ok(want)) => have == want,
                _ => false,
            },
            FieldKind::Bool => match (self.as_bool(), parse_bool(wanted)) {
                (Some(have), Some(want)) => have == want,
                _ => false,
            },
            FieldKind::Date => match (self.as_date(), parse_timestamp(wanted)) {
                (Some(have), Some(want)) => have.date() == want.date(),
                _ => false,
            },
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Date(_) => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Number(n) => Some(*n != 0.0),
            FieldValue::Text(s) => parse_bool(s),
            FieldValue::Date(_) => None,
        }
    }

    fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Normalised ordering key. `Missing` covers absent fields and values that
/// cannot be read as the declared kind; it orders before everything else.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl SortKey {
    pub(crate) fn from_value(value: Option<FieldValue>, kind: FieldKind) -> Self {
        let Some(value) = value else {
            return SortKey::Missing;
        };
        let key = match kind {
            FieldKind::Text => Some(SortKey::Text(value.to_string().to_lowercase())),
            FieldKind::Number => value.as_number().map(SortKey::Number),
            FieldKind::Bool => value.as_bool().map(SortKey::Bool),
            FieldKind::Date => value.as_date().map(SortKey::Date),
        };
        key.unwrap_or(SortKey::Missing)
    }

    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Less,
            (_, SortKey::Missing) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            // Keys are built from one declared kind, so mixed pairs never occur.
            _ => Ordering::Equal,
        }
    }
}
