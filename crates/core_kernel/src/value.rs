//! Cell values
//!
//! Every table cell is a [`Value`]. Raw flat-file fields are typed on ingest
//! with [`Value::parse_raw`]; the cleaning pass later replaces `Missing` cells
//! with the `Unknown` sentinel and turns date text into `Date` or
//! `Unparseable`.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Placeholder substituted for absent fields
pub const UNKNOWN_SENTINEL: &str = "Unknown";

/// Marker written for date fields whose text could not be parsed
pub const UNPARSEABLE_MARKER: &str = "Unparseable";

/// Source spellings treated as an absent field
const NA_SPELLINGS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A"];

/// A single table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent in the source row
    Missing,
    /// The `Unknown` sentinel
    Unknown,
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    /// Date text that could not be parsed; the raw text is kept for display
    Unparseable(String),
}

impl Value {
    /// Types a raw flat-file field
    ///
    /// Empty and NA-like fields become `Missing`, integral fields `Integer`,
    /// other numeric fields `Decimal`, everything else `Text`.
    pub fn parse_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NA_SPELLINGS.contains(&trimmed) {
            return Value::Missing;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Integer(n);
        }
        if let Ok(d) = Decimal::from_str(trimmed) {
            return Value::Decimal(d);
        }
        Value::Text(trimmed.to_string())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Numeric view of the cell; `None` for anything not stored as a number
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Unknown => f.write_str(UNKNOWN_SENTINEL),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d.normalize()),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Unparseable(_) => f.write_str(UNPARSEABLE_MARKER),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Decimal(d) => match d.to_f64() {
                Some(f) => serializer.serialize_f64(f),
                None => serializer.serialize_str(&d.to_string()),
            },
            other => serializer.collect_str(other),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}
